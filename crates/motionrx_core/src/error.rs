use core::time::Duration;

/// The error channel carried by every [`Completion`].
///
/// [`Completion`]: crate::completion::Completion
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// The target view left the toolkit before (or while) it was
    /// animated.
    #[error("view `{view}` is not attached to the toolkit")]
    Detached { view: String },
    /// The toolkit dropped the completion callback without firing it.
    #[error("animation `{label}` ended without reporting completion")]
    Interrupted { label: &'static str },
    /// The completion was cancelled through its [`CancelHandle`].
    ///
    /// [`CancelHandle`]: crate::completion::CancelHandle
    #[error("animation was cancelled")]
    Cancelled,
    /// A driver gave up waiting for the completion.
    #[error("animation did not complete within {0:?}")]
    TimedOut(Duration),
    /// Any other failure reported by the host toolkit.
    #[error("toolkit error: {0}")]
    Toolkit(String),
}

impl AnimationError {
    /// Shorthand for [`AnimationError::Detached`] using the debug
    /// representation of the view.
    pub fn detached(view: impl core::fmt::Debug) -> Self {
        Self::Detached {
            view: format!("{view:?}"),
        }
    }
}

pub type AnimationResult = Result<(), AnimationError>;
