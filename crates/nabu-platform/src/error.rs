//! Platform error types.

use thiserror::Error;

use crate::backend::BackendKind;
use crate::env::EnvError;

/// Failures raised while bringing up or driving a backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The protocol's client library is not installed on this host.
    ///
    /// This is the only error the selector answers with a fallback.
    #[error("{backend} client library {library} could not be loaded")]
    LibraryNotFound {
        backend: BackendKind,
        library: &'static str,
    },

    /// Connecting to the display server or building the event loop failed.
    #[error("failed to connect to the {backend} display server: {message}")]
    Connect {
        backend: BackendKind,
        message: String,
    },

    #[error("failed to create window: {0:#}")]
    WindowCreation(anyhow::Error),

    /// Native handles could not be read from the window.
    #[error("native handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    /// The session produced handles of another protocol than requested.
    #[error("{backend} backend received a {found} handle")]
    HandleMismatch {
        backend: BackendKind,
        found: &'static str,
    },

    /// The native event loop stopped.
    #[error("native event loop exited with code {0}")]
    Closed(i32),
}

/// Errors surfaced by [`Platform`](crate::Platform).
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
