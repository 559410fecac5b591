//! GPU surface descriptors.
//!
//! The GPU layer attaches to a window through a [`SurfaceDescriptor`] built
//! from the active backend's native handles.

use std::ffi::{c_int, c_ulong, c_void};
use std::ptr::NonNull;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WaylandDisplayHandle, WaylandWindowHandle, WindowHandle, XlibDisplayHandle,
    XlibWindowHandle,
};
use thiserror::Error;

use crate::backend::{Backend, BackendKind};

/// Native target for a GPU surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceDescriptor {
    /// Window-system window: Xlib display connection and window XID.
    XlibWindow {
        display: NonNull<c_void>,
        screen: c_int,
        window: c_ulong,
    },

    /// Display-server surface: `wl_display` and `wl_surface`.
    WaylandSurface {
        display: NonNull<c_void>,
        surface: NonNull<c_void>,
    },
}

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error(transparent)]
    Handle(#[from] HandleError),

    #[error("failed to create wgpu surface: {0}")]
    Create(#[from] wgpu::CreateSurfaceError),
}

/// Builds the descriptor for the backend's window.
pub fn derive_surface_descriptor(backend: &Backend) -> SurfaceDescriptor {
    match backend {
        Backend::X11(b) => SurfaceDescriptor::XlibWindow {
            display: b.display(),
            screen: b.screen(),
            window: b.window(),
        },
        Backend::Wayland(b) => SurfaceDescriptor::WaylandSurface {
            display: b.display(),
            surface: b.surface(),
        },
    }
}

impl SurfaceDescriptor {
    pub fn backend(&self) -> BackendKind {
        match self {
            SurfaceDescriptor::XlibWindow { .. } => BackendKind::X11,
            SurfaceDescriptor::WaylandSurface { .. } => BackendKind::Wayland,
        }
    }

    pub fn raw_display_handle(&self) -> RawDisplayHandle {
        match *self {
            SurfaceDescriptor::XlibWindow { display, screen, .. } => {
                RawDisplayHandle::Xlib(XlibDisplayHandle::new(Some(display), screen))
            }
            SurfaceDescriptor::WaylandSurface { display, .. } => {
                RawDisplayHandle::Wayland(WaylandDisplayHandle::new(display))
            }
        }
    }

    pub fn raw_window_handle(&self) -> RawWindowHandle {
        match *self {
            SurfaceDescriptor::XlibWindow { window, .. } => {
                RawWindowHandle::Xlib(XlibWindowHandle::new(window))
            }
            SurfaceDescriptor::WaylandSurface { surface, .. } => {
                RawWindowHandle::Wayland(WaylandWindowHandle::new(surface))
            }
        }
    }

    /// Converts into a wgpu surface target.
    ///
    /// # Safety
    ///
    /// The backend this descriptor was derived from must stay alive for as
    /// long as any surface created from the target.
    pub unsafe fn wgpu_target(&self) -> Result<wgpu::SurfaceTargetUnsafe, HandleError> {
        // SAFETY: forwarded to the caller.
        unsafe { wgpu::SurfaceTargetUnsafe::from_window(&NativeHandles(*self)) }
    }
}

/// Borrowable view over a descriptor's raw handles.
struct NativeHandles(SurfaceDescriptor);

impl HasDisplayHandle for NativeHandles {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        // SAFETY: validity is guaranteed by `SurfaceDescriptor::wgpu_target`'s caller.
        Ok(unsafe { DisplayHandle::borrow_raw(self.0.raw_display_handle()) })
    }
}

impl HasWindowHandle for NativeHandles {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        // SAFETY: as above.
        Ok(unsafe { WindowHandle::borrow_raw(self.0.raw_window_handle()) })
    }
}
