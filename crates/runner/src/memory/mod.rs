use std::collections::TryReserveError;

use thiserror::Error;

use crate::vm::frame::Frame;

/// Errors raised while acquiring or growing the frame stack.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("Failed to allocate a frame stack of {frames} frames: {source}")]
    AllocationFailed {
        frames: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("Frame stack depth limit of {limit} frames exceeded")]
    DepthExceeded { limit: usize },
}

/// The explicit call stack of one evaluation.
///
/// Frames are only ever pushed and popped at the tail. Storage is reserved
/// fallibly so that resource exhaustion is reported as a [`StackError`]
/// instead of aborting the process.
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
    /// Maximum number of frames allowed to be live at once.
    limit: usize,
    /// Highest number of frames live at any point so far.
    peak_depth: usize,
}

impl FrameStack {
    /// Creates an empty stack with room for `frames` frames, refusing to ever
    /// hold more than `limit`.
    ///
    /// # Errors
    ///
    /// - [`StackError::DepthExceeded`] if `frames > limit`.
    /// - [`StackError::AllocationFailed`] if the reservation fails.
    pub fn with_capacity(frames: usize, limit: usize) -> Result<Self, StackError> {
        if frames > limit {
            return Err(StackError::DepthExceeded { limit });
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(frames)
            .map_err(|source| StackError::AllocationFailed { frames, source })?;

        Ok(Self {
            frames: storage,
            limit,
            peak_depth: 0,
        })
    }

    /// Pushes a frame on top of the stack.
    ///
    /// Growth past the initial reservation goes through `try_reserve`.
    ///
    /// # Errors
    ///
    /// - [`StackError::DepthExceeded`] if the stack already holds `limit` frames.
    /// - [`StackError::AllocationFailed`] if growing the storage fails.
    pub(crate) fn push(&mut self, frame: Frame) -> Result<(), StackError> {
        if self.frames.len() >= self.limit {
            return Err(StackError::DepthExceeded { limit: self.limit });
        }
        if self.frames.len() == self.frames.capacity() {
            let frames = self.frames.len() + 1;
            self.frames
                .try_reserve(1)
                .map_err(|source| StackError::AllocationFailed { frames, source })?;
        }

        self.frames.push(frame);
        self.peak_depth = self.peak_depth.max(self.frames.len());
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub const fn peak_depth(&self) -> usize {
        self.peak_depth
    }

    /// Live frames, bottom to top.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
