//! Recoverable error types for the Ember engine.
//!
//! Most failure conditions in this crate are fatal by design (see the
//! `engine_bail!`/`engine_panic!` macros in [`crate::log`]): a ref-count
//! underflow or an unknown texture format triple signals a programming
//! error, not a condition a caller can meaningfully recover from. The
//! handful of conditions that are genuinely recoverable - backend plugin
//! lookup, swapchain-suboptimal retry - use this `Result`-based surface
//! instead.

use std::fmt;

/// Result type for recoverable Ember engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Recoverable Ember engine errors, grouped by who can act on them: the
/// caller (missing/invalid resource, bad setup), the render backend
/// itself, or the swapchain.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// A `RenderBackend` implementation reported a failure of its own.
    BackendError(String),
    /// The backend refused an allocation because the GPU is out of memory.
    OutOfMemory,
    /// A resource handle or descriptor didn't hold up (texture, buffer,
    /// shader, ...).
    InvalidResource(String),
    /// Engine, renderer, or subsystem setup didn't complete.
    InitializationFailed(String),
    /// No backend plugin is registered under the requested name.
    UnknownBackendPlugin(String),
    /// The swapchain or surface is suboptimal/out-of-date; recreate and
    /// retry rather than treating this as a hard failure.
    SwapchainSuboptimal,
}

impl EngineError {
    /// Short, lowercase category tag, independent of any message payload.
    /// Useful for metrics/log grouping without matching on the full enum.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::BackendError(_) => "backend",
            EngineError::OutOfMemory => "out-of-memory",
            EngineError::InvalidResource(_) => "invalid-resource",
            EngineError::InitializationFailed(_) => "initialization",
            EngineError::UnknownBackendPlugin(_) => "unknown-plugin",
            EngineError::SwapchainSuboptimal => "swapchain-suboptimal",
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            EngineError::BackendError(detail)
            | EngineError::InvalidResource(detail)
            | EngineError::InitializationFailed(detail)
            | EngineError::UnknownBackendPlugin(detail) => Some(detail),
            EngineError::OutOfMemory | EngineError::SwapchainSuboptimal => None,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = match self {
            EngineError::BackendError(_) => "render backend error",
            EngineError::OutOfMemory => "out of GPU memory",
            EngineError::InvalidResource(_) => "invalid resource",
            EngineError::InitializationFailed(_) => "initialization failed",
            EngineError::UnknownBackendPlugin(_) => "no backend plugin registered",
            EngineError::SwapchainSuboptimal => "swapchain is suboptimal, recreate and retry",
        };

        match self.detail() {
            Some(detail) => write!(f, "{headline}: {detail}"),
            None => f.write_str(headline),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
