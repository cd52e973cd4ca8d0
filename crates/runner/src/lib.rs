//! Fibonacci evaluated on an explicit, heap-allocated frame stack.
//!
//! The recursion `fib(n) = fib(n - 1) + fib(n - 2)` is simulated by a
//! [`VM`] that pops frames off a [`FrameStack`](memory::FrameStack) and
//! drives each through a three-state machine instead of using native
//! recursion.

pub mod memory;
pub mod vm;

use std::path::Path;

use tracing::debug;
use vm::{TraceEntry, VmError, VM};

/// Result type for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Default upper bound on the number of live frames.
pub const DEFAULT_MAX_DEPTH: usize = 1 << 20;

/// Errors that can occur during evaluation
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Fibonacci is undefined for negative input {0}")]
    NegativeInput(i32),

    #[error("VM error: {0}")]
    VmError(#[from] VmError),
}

/// Options for evaluating a Fibonacci number
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// The maximum number of frames live at once, [`DEFAULT_MAX_DEPTH`] by default.
    pub max_depth: usize,
    /// Record one [`TraceEntry`] per step.
    pub record_trace: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            record_trace: false,
        }
    }
}

/// Result of evaluating a Fibonacci number
#[derive(Debug, Clone, Default)]
pub struct RunnerOutput {
    /// `fib(n)`
    pub return_value: i32,
    /// Number of frames popped. Zero when the base case short-circuits.
    pub steps: usize,
    /// Highest number of frames live at once. Zero when no stack was allocated.
    pub peak_depth: usize,
    /// Execution trace, empty unless [`RunnerOptions::record_trace`] was set.
    pub trace: Vec<TraceEntry>,
}

impl RunnerOutput {
    /// Writes the execution trace in the binary format of [`vm::serialize_trace`].
    pub fn write_binary_trace<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(vm::write_binary_trace(&self.trace, path)?)
    }
}

/// Computes `fib(n)` on an explicit frame stack.
///
/// ## Arguments
/// * `n` - The Fibonacci index, must be non-negative
/// * `options` - Execution options (depth limit, tracing)
///
/// ## Returns
/// `RunnerOutput` containing the value and execution statistics
///
/// ## Errors
/// * [`RunnerError::NegativeInput`] if `n < 0`
/// * [`RunnerError::VmError`] if the stack cannot be allocated, the depth
///   limit is hit, or the result overflows `i32`
pub fn run_fibonacci(n: i32, options: RunnerOptions) -> Result<RunnerOutput> {
    let n = u32::try_from(n).map_err(|_| RunnerError::NegativeInput(n))?;

    // Base cases resolve without touching the heap
    if n <= 1 {
        return Ok(RunnerOutput {
            return_value: n as i32,
            ..Default::default()
        });
    }

    debug!(n, max_depth = options.max_depth, "evaluating on frame stack");
    let mut vm = VM::new(n, &options)?;
    let return_value = vm.execute()?;
    debug!(
        n,
        return_value,
        steps = vm.steps,
        peak_depth = vm.stack.peak_depth(),
        "frame stack drained"
    );

    Ok(RunnerOutput {
        return_value,
        steps: vm.steps,
        peak_depth: vm.stack.peak_depth(),
        trace: std::mem::take(&mut vm.trace),
    })
}

/// Computes `fib(n)` with the default [`RunnerOptions`].
///
/// ```
/// assert_eq!(framestack_runner::evaluate(10).unwrap(), 55);
/// ```
pub fn evaluate(n: i32) -> Result<i32> {
    Ok(run_fibonacci(n, RunnerOptions::default())?.return_value)
}
