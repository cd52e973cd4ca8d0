/// Phase of a single frame of `fib(n) = fib(n - 1) + fib(n - 2)`.
///
/// A frame is visited once per state. The state it carries when it is popped
/// tells the evaluator which sub-result the result register currently holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// Freshly pushed, no sub-call issued yet.
    #[default]
    Init,
    /// Waiting on `fib(n - 1)`.
    AwaitingFirst,
    /// Waiting on `fib(n - 2)`.
    AwaitingSecond,
}

impl FrameState {
    /// All states, in transition order.
    pub const ALL: [Self; 3] = [Self::Init, Self::AwaitingFirst, Self::AwaitingSecond];

    /// Successor state once the frame has issued its next sub-call.
    ///
    /// Returns `None` for [`FrameState::AwaitingSecond`]: a frame in that
    /// state resolves and is never pushed back.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::AwaitingFirst),
            Self::AwaitingFirst => Some(Self::AwaitingSecond),
            Self::AwaitingSecond => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Stable numeric code, used by the binary trace format.
    pub const fn code(self) -> u32 {
        match self {
            Self::Init => 0,
            Self::AwaitingFirst => 1,
            Self::AwaitingSecond => 2,
        }
    }
}
