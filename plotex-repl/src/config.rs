use plotex_graph::Viewport;

/// The environment variable holding the viewport, as `lowx,highx,lowy,highy`.
pub const VIEWPORT_VAR: &str = "PLOTEX_VIEWPORT";

/// Parses a viewport written as `lowx,highx,lowy,highy`.
pub fn parse_viewport(value: &str) -> Option<Viewport> {
    let bounds = value.split(',')
        .map(|bound| bound.trim().parse::<f64>().ok().filter(|bound| bound.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    match bounds[..] {
        [low_x, high_x, low_y, high_y] if low_x < high_x && low_y < high_y => {
            Some(Viewport::new(low_x, high_x, low_y, high_y))
        },
        _ => None,
    }
}

/// Reads the viewport from the environment, falling back to the default viewport.
pub fn viewport_from_env() -> Viewport {
    match std::env::var(VIEWPORT_VAR) {
        Ok(value) => parse_viewport(&value).unwrap_or_else(|| {
            log::warn!("ignoring invalid {}={:?}, expected `lowx,highx,lowy,highy`", VIEWPORT_VAR, value);
            Viewport::default()
        }),
        Err(_) => Viewport::default(),
    }
}
