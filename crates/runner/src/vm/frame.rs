use crate::vm::state::FrameState;

/// One pending or resumed invocation of the Fibonacci recurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Argument of this invocation.
    pub n: u32,
    /// Which sub-call this frame is waiting on.
    pub state: FrameState,
    /// Sum of the sub-results completed so far.
    pub partial_result: i32,
}

impl Frame {
    /// Creates a frame for `fib(n)` that has not issued any sub-call yet.
    pub const fn new(n: u32) -> Self {
        Self {
            n,
            state: FrameState::Init,
            partial_result: 0,
        }
    }

    /// Whether this frame resolves without issuing sub-calls.
    pub const fn is_base_case(&self) -> bool {
        self.n <= 1
    }
}
