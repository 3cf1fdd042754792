//! Coalescing of repeated requests to recompute a curve.

use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct State<P> {
    /// Whether a computation is in flight.
    running: bool,

    /// The parameters of the latest request that arrived while a computation was in flight.
    pending: Option<P>,
}

/// Runs at most one computation at a time, plus at most one follow-up.
///
/// While the view is being panned, requests to recompute a curve arrive much faster than they
/// can be served. Every request made while a computation is in flight overwrites the pending
/// one, and when the computation finishes, exactly one more computation runs with the latest
/// parameters. Requests are never queued beyond that.
#[derive(Debug)]
pub struct Coalescer<P> {
    state: Mutex<State<P>>,
}

impl<P> Default for Coalescer<P> {
    fn default() -> Self {
        Self {
            state: Mutex::new(State { running: false, pending: None }),
        }
    }
}

impl<P> Coalescer<P> {
    /// Creates an idle coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if a computation is in flight.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Returns true if a follow-up computation is waiting for the current one to finish.
    pub fn has_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Requests a computation with the given parameters.
    ///
    /// If a computation is already in flight, the parameters replace any pending ones and this
    /// returns `false` immediately; the thread running the computation will pick them up.
    /// Otherwise, `compute` runs on the calling thread and its result is passed to `deliver`,
    /// repeating for as long as new parameters arrived in the meantime. Returns `true` once
    /// nothing is pending.
    pub fn run<R>(
        &self,
        params: P,
        mut compute: impl FnMut(P) -> R,
        mut deliver: impl FnMut(R),
    ) -> bool {
        {
            let mut state = self.lock();
            if state.running {
                state.pending = Some(params);
                return false;
            }
            state.running = true;
        }

        let mut params = params;
        loop {
            deliver(compute(params));

            let mut state = self.lock();
            match state.pending.take() {
                Some(next) => params = next,
                None => {
                    state.running = false;
                    return true;
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::{sync::mpsc, thread};
    use super::*;

    #[test]
    fn idle_runs_once() {
        let coalescer = Coalescer::new();
        let mut delivered = Vec::new();
        assert!(coalescer.run(4, |p| p * 2, |r| delivered.push(r)));
        assert_eq!(delivered, vec![8]);
        assert!(!coalescer.is_running());
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn latest_request_wins() {
        let coalescer = Coalescer::new();
        let mut delivered = Vec::new();
        let done = coalescer.run(1, |p| {
            if p == 1 {
                assert!(coalescer.is_running());
                assert!(!coalescer.run(2, |p| p, |_| unreachable!()));
                assert!(!coalescer.run(3, |p| p, |_| unreachable!()));
                assert!(coalescer.has_pending());
            }
            p * 10
        }, |r| delivered.push(r));

        assert!(done);
        assert_eq!(delivered, vec![10, 30]);
        assert!(!coalescer.is_running());
    }

    #[test]
    fn requests_from_other_threads() {
        let coalescer = Coalescer::new();
        let (started_tx, started_rx) = mpsc::channel();
        let (go_tx, go_rx) = mpsc::channel();
        let mut delivered = Vec::new();

        thread::scope(|scope| {
            let coalescer = &coalescer;
            scope.spawn(move || {
                started_rx.recv().unwrap();
                for p in 2..=5 {
                    assert!(!coalescer.run(p, |p| p, |_| unreachable!()));
                }
                go_tx.send(()).unwrap();
            });

            let done = coalescer.run(1, |p| {
                if p == 1 {
                    started_tx.send(()).unwrap();
                    go_rx.recv().unwrap();
                }
                p
            }, |r| delivered.push(r));
            assert!(done);
        });

        assert_eq!(delivered, vec![1, 5]);
    }
}
