/// A frame in the call stack of the [`Vm`](crate::Vm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Index of the chunk being executed.
    pub chunk: usize,

    /// Index of the next instruction to execute in the chunk.
    pub pc: usize,

    /// Index in the value stack of the frame's first argument. Values below it belong to the
    /// caller.
    pub base: usize,
}

impl Frame {
    /// Creates a frame that starts executing the given chunk, with its arguments starting at
    /// `base` in the value stack.
    pub fn new(chunk: usize, base: usize) -> Self {
        Self { chunk, pc: 0, base }
    }
}
