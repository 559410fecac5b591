use std::ffi::{c_int, c_ulong, c_void};
use std::fmt;
use std::ptr::NonNull;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::BackendKind;
use crate::error::BackendError;
use crate::event::CoreHandle;
use crate::native::{Connector, Session, display_handle_name, window_handle_name};
use crate::options::WindowAttributes;

/// X11 backend: an Xlib display connection and one top-level window.
pub struct X11Backend {
    session: Box<dyn Session>,
    display: NonNull<c_void>,
    screen: c_int,
    window: c_ulong,
}

impl X11Backend {
    /// Libraries winit's X11 platform loads at runtime.
    pub const CLIENT_LIBRARIES: &'static [&'static str] =
        &["libX11.so.6", "libX11-xcb.so.1", "libxkbcommon-x11.so.0"];

    pub fn init(
        connector: &mut dyn Connector,
        core: CoreHandle,
        attrs: &WindowAttributes,
    ) -> Result<Self, BackendError> {
        connector.probe(BackendKind::X11, Self::CLIENT_LIBRARIES)?;
        let session = connector.open(BackendKind::X11, attrs, core)?;

        match xlib_handles(session.as_ref()) {
            Ok((display, screen, window)) => {
                log::info!("x11: window {window:#x} on screen {screen}");
                Ok(Self {
                    session,
                    display,
                    screen,
                    window,
                })
            }
            Err(e) => {
                session.close();
                Err(e)
            }
        }
    }

    /// Xlib `Display*`.
    pub fn display(&self) -> NonNull<c_void> {
        self.display
    }

    pub fn screen(&self) -> c_int {
        self.screen
    }

    /// Window XID.
    pub fn window(&self) -> c_ulong {
        self.window
    }

    /// Drains the X event queue.
    pub fn update(&mut self) -> Result<(), BackendError> {
        if !self.session.requires_pump() {
            return Ok(());
        }
        self.session.pump()
    }

    pub fn deinit(self) {
        log::debug!("x11: destroying window {:#x}", self.window);
        self.session.close();
    }

    pub(crate) fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }
}

fn xlib_handles(
    session: &dyn Session,
) -> Result<(NonNull<c_void>, c_int, c_ulong), BackendError> {
    let display = session.raw_display_handle()?;
    let window = session.raw_window_handle()?;

    let RawDisplayHandle::Xlib(display) = display else {
        return Err(BackendError::HandleMismatch {
            backend: BackendKind::X11,
            found: display_handle_name(&display),
        });
    };
    let RawWindowHandle::Xlib(window) = window else {
        return Err(BackendError::HandleMismatch {
            backend: BackendKind::X11,
            found: window_handle_name(&window),
        });
    };

    let Some(ptr) = display.display else {
        return Err(BackendError::WindowCreation(anyhow::anyhow!(
            "x11 session reported no Display connection"
        )));
    };

    Ok((ptr, display.screen, window.window))
}

impl fmt::Debug for X11Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11Backend")
            .field("display", &self.display)
            .field("screen", &self.screen)
            .field("window", &format_args!("{:#x}", self.window))
            .finish_non_exhaustive()
    }
}
