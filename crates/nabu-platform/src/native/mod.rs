//! Native windowing seam.
//!
//! Backends never talk to a windowing library directly: a [`Connector`]
//! probes for a protocol's client libraries and opens a [`Session`] bound to
//! that protocol. The production connector drives winit; tests substitute
//! their own.

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::backend::BackendKind;
use crate::error::BackendError;
use crate::event::CoreHandle;
use crate::options::{CursorMode, CursorShape, DisplayMode, Size, WindowAttributes};

mod libs;
#[cfg(target_os = "linux")]
mod translate;
#[cfg(target_os = "linux")]
mod winit_session;

pub use libs::probe_libraries;
#[cfg(target_os = "linux")]
pub use winit_session::WinitConnector;

/// Opens native windowing sessions.
pub trait Connector {
    /// Checks that every client library of `kind` can be loaded.
    ///
    /// Must fail with [`BackendError::LibraryNotFound`] when one is missing,
    /// without opening any connection.
    fn probe(&self, kind: BackendKind, libraries: &[&'static str]) -> Result<(), BackendError>;

    /// Connects to the display server of `kind` and opens a window.
    ///
    /// `core` receives every event the session produces.
    fn open(
        &mut self,
        kind: BackendKind,
        attrs: &WindowAttributes,
        core: CoreHandle,
    ) -> Result<Box<dyn Session>, BackendError>;
}

/// A live display-server connection with one window.
pub trait Session {
    fn raw_display_handle(&self) -> Result<RawDisplayHandle, BackendError>;

    fn raw_window_handle(&self) -> Result<RawWindowHandle, BackendError>;

    /// Whether the native queue has to be drained by [`Session::pump`] each frame.
    fn requires_pump(&self) -> bool;

    /// Drains pending native events into the core handle without blocking.
    fn pump(&mut self) -> Result<(), BackendError>;

    /// Current window size in logical pixels.
    fn inner_size(&self) -> Size;

    /// Refresh rate of the monitor showing the window, in Hz.
    fn refresh_rate(&self) -> Option<u32>;

    fn set_title(&mut self, title: &str);

    fn set_size(&mut self, size: Size);

    fn set_border(&mut self, border: bool);

    fn set_display_mode(&mut self, mode: DisplayMode);

    fn set_cursor_mode(&mut self, mode: CursorMode);

    fn set_cursor_shape(&mut self, shape: CursorShape);

    /// Destroys the window, then the connection.
    fn close(self: Box<Self>);
}

pub(crate) fn display_handle_name(handle: &RawDisplayHandle) -> &'static str {
    match handle {
        RawDisplayHandle::Xlib(_) => "xlib",
        RawDisplayHandle::Xcb(_) => "xcb",
        RawDisplayHandle::Wayland(_) => "wayland",
        _ => "foreign",
    }
}

pub(crate) fn window_handle_name(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::Xlib(_) => "xlib",
        RawWindowHandle::Xcb(_) => "xcb",
        RawWindowHandle::Wayland(_) => "wayland",
        _ => "foreign",
    }
}
