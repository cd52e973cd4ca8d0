pub mod frame;
pub mod state;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::trace;

use crate::memory::{FrameStack, StackError};
use crate::vm::frame::Frame;
use crate::vm::state::FrameState;
use crate::RunnerOptions;

/// Custom error type for VM operations.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("VM stack error: {0}")]
    Stack(#[from] StackError),
    #[error("Result of fib({n}) does not fit in a 32-bit signed integer")]
    Overflow { n: u32 },
    #[error("Frame for fib({n}) cannot be in state {state:?}")]
    InvalidFrame { n: u32, state: FrameState },
    #[error("VM I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A single entry in the trace: the frame popped by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    /// Argument of the visited frame.
    pub n: u32,
    /// State of the frame when it was popped.
    pub state: FrameState,
    /// Number of frames left on the stack after the pop.
    pub depth: usize,
}

/// The frame-stack evaluator.
///
/// ## Fields
///
/// - `stack`: Explicit call stack replacing native recursion
/// - `result`: Result register, the value of the most recently resolved frame
/// - `steps`: Number of frames popped so far
/// - `trace`: Execution trace, only filled when requested in [`RunnerOptions`]
#[derive(Debug, Default)]
pub struct VM {
    pub(crate) stack: FrameStack,
    pub(crate) result: i32,
    pub(crate) steps: usize,
    pub(crate) trace: Vec<TraceEntry>,
    record_trace: bool,
}

impl VM {
    /// Creates a VM ready to evaluate `fib(n)`.
    ///
    /// The stack is reserved for the worst case of `n + 1` live frames and
    /// seeded with a single [`Frame`] for `n`.
    ///
    /// ## Errors
    ///
    /// Returns a [`VmError::Stack`] if `n + 1` exceeds `options.max_depth` or
    /// if the reservation fails.
    pub fn new(n: u32, options: &RunnerOptions) -> Result<Self, VmError> {
        let capacity = (n as usize).saturating_add(1);
        let mut stack = FrameStack::with_capacity(capacity, options.max_depth)?;
        stack.push(Frame::new(n))?;

        Ok(Self {
            stack,
            result: 0,
            steps: 0,
            trace: vec![],
            record_trace: options.record_trace,
        })
    }

    /// Pops the top frame and acts on its state.
    ///
    /// Does nothing on an empty stack.
    ///
    /// ## Errors
    ///
    /// Returns a [`VmError`] if:
    /// - Pushing a frame back or pushing a child fails ([`VmError::Stack`])
    /// - The accumulated sum overflows ([`VmError::Overflow`])
    /// - A resumed frame has no child to issue ([`VmError::InvalidFrame`])
    fn step(&mut self) -> Result<(), VmError> {
        let Some(mut frame) = self.stack.pop() else {
            return Ok(());
        };
        self.steps += 1;

        let depth = self.stack.len();
        trace!(n = frame.n, state = ?frame.state, depth, "step");
        if self.record_trace {
            self.trace.push(TraceEntry {
                n: frame.n,
                state: frame.state,
                depth,
            });
        }

        match frame.state {
            FrameState::Init => {
                if frame.is_base_case() {
                    // n is 0 or 1 here
                    self.result = frame.n as i32;
                } else {
                    let child = Self::child(&frame, 1)?;
                    frame.state = FrameState::AwaitingFirst;
                    self.stack.push(frame)?;
                    self.stack.push(child)?;
                }
            }
            FrameState::AwaitingFirst => {
                let child = Self::child(&frame, 2)?;
                frame.partial_result = self.accumulate(&frame)?;
                frame.state = FrameState::AwaitingSecond;
                self.stack.push(frame)?;
                self.stack.push(child)?;
            }
            FrameState::AwaitingSecond => {
                self.result = self.accumulate(&frame)?;
            }
        }

        Ok(())
    }

    /// Frame for `fib(parent.n - offset)`.
    fn child(parent: &Frame, offset: u32) -> Result<Frame, VmError> {
        parent
            .n
            .checked_sub(offset)
            .map(Frame::new)
            .ok_or(VmError::InvalidFrame {
                n: parent.n,
                state: parent.state,
            })
    }

    /// Adds the result register into the frame's partial result.
    fn accumulate(&self, frame: &Frame) -> Result<i32, VmError> {
        frame
            .partial_result
            .checked_add(self.result)
            .ok_or(VmError::Overflow { n: frame.n })
    }

    /// Runs the VM until the frame stack is empty and returns the result register.
    ///
    /// ## Errors
    ///
    /// Returns the first [`VmError`] raised by a step. The stack is left as it
    /// was at the failing step.
    pub fn execute(&mut self) -> Result<i32, VmError> {
        while !self.stack.is_empty() {
            self.step()?;
        }

        Ok(self.result)
    }
}

/// Serializes trace entries to a flat byte vector.
///
/// Each entry is three little-endian `u32`: the frame argument `n`, the
/// [`FrameState::code`] of the state on visit, and the depth after the pop.
pub fn serialize_trace(trace: &[TraceEntry]) -> Vec<u8> {
    trace
        .iter()
        .flat_map(|entry| [entry.n, entry.state.code(), entry.depth as u32])
        .flat_map(u32::to_le_bytes)
        .collect()
}

/// Writes [`serialize_trace`] output for `trace` to the file at `path`.
///
/// ## Errors
///
/// Returns a [`VmError::Io`] if:
/// - The file cannot be created or opened for writing
/// - Writing to the file fails
pub fn write_binary_trace<P: AsRef<Path>>(trace: &[TraceEntry], path: P) -> Result<(), VmError> {
    let serialized_trace = serialize_trace(trace);
    let mut file = File::create(path)?;
    file.write_all(&serialized_trace)?;
    Ok(())
}


#[cfg(test)]
pub mod test_utils {
    // Helper macros for common patterns in tests
    macro_rules! frame {
        ($n:expr) => {
            $crate::vm::frame::Frame::new($n)
        };
        ($n:expr, $state:ident, $partial:expr) => {
            $crate::vm::frame::Frame {
                n: $n,
                state: $crate::vm::state::FrameState::$state,
                partial_result: $partial,
            }
        };
    }

    macro_rules! assert_stack {
        ($vm:expr, [$($frame:expr),* $(,)?]) => {
            assert_eq!($vm.stack.frames(), &[$($frame),*][..]);
        };
    }

    /// Naive doubly-recursive definition, used as the reference.
    pub fn fib_recursive(n: u32) -> i32 {
        if n <= 1 {
            n as i32
        } else {
            fib_recursive(n - 1) + fib_recursive(n - 2)
        }
    }

    // Export macros
    pub(crate) use {assert_stack, frame};
}
