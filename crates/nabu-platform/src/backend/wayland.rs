use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::BackendKind;
use crate::error::BackendError;
use crate::event::CoreHandle;
use crate::native::{Connector, Session, display_handle_name, window_handle_name};
use crate::options::WindowAttributes;

/// Wayland backend: a `wl_display` connection and the window's `wl_surface`.
pub struct WaylandBackend {
    session: Box<dyn Session>,
    display: NonNull<c_void>,
    surface: NonNull<c_void>,
}

impl WaylandBackend {
    /// Libraries winit's Wayland platform loads at runtime.
    pub const CLIENT_LIBRARIES: &'static [&'static str] =
        &["libwayland-client.so.0", "libxkbcommon.so.0"];

    pub fn init(
        connector: &mut dyn Connector,
        core: CoreHandle,
        attrs: &WindowAttributes,
    ) -> Result<Self, BackendError> {
        connector.probe(BackendKind::Wayland, Self::CLIENT_LIBRARIES)?;
        let session = connector.open(BackendKind::Wayland, attrs, core)?;

        match wayland_handles(session.as_ref()) {
            Ok((display, surface)) => {
                log::info!("wayland: surface {surface:p} on display {display:p}");
                Ok(Self {
                    session,
                    display,
                    surface,
                })
            }
            Err(e) => {
                session.close();
                Err(e)
            }
        }
    }

    /// `wl_display*`.
    pub fn display(&self) -> NonNull<c_void> {
        self.display
    }

    /// `wl_surface*` of the window.
    pub fn surface(&self) -> NonNull<c_void> {
        self.surface
    }

    /// Dispatches pending Wayland events when the session needs it.
    pub fn update(&mut self) -> Result<(), BackendError> {
        if !self.session.requires_pump() {
            return Ok(());
        }
        self.session.pump()
    }

    pub fn deinit(self) {
        log::debug!("wayland: destroying surface {:p}", self.surface);
        self.session.close();
    }

    pub(crate) fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }
}

fn wayland_handles(
    session: &dyn Session,
) -> Result<(NonNull<c_void>, NonNull<c_void>), BackendError> {
    let display = session.raw_display_handle()?;
    let window = session.raw_window_handle()?;

    let RawDisplayHandle::Wayland(display) = display else {
        return Err(BackendError::HandleMismatch {
            backend: BackendKind::Wayland,
            found: display_handle_name(&display),
        });
    };
    let RawWindowHandle::Wayland(window) = window else {
        return Err(BackendError::HandleMismatch {
            backend: BackendKind::Wayland,
            found: window_handle_name(&window),
        });
    };

    Ok((display.display, window.surface))
}

impl fmt::Debug for WaylandBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaylandBackend")
            .field("display", &self.display)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
