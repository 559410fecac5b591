//! Windowing backends.
//!
//! [`Backend`] is a closed set: every dispatch site matches on it
//! exhaustively, so adding a protocol means handling it everywhere.

use std::fmt;

use crate::error::BackendError;
use crate::event::CoreHandle;
use crate::native::{Connector, Session};
use crate::options::{Size, WindowAttributes};

mod select;
mod wayland;
mod x11;

pub use select::{SelectError, Selection, SelectionState, desired_backend, select_and_init};
pub use wayland::WaylandBackend;
pub use x11::X11Backend;

/// Native windowing protocol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BackendKind {
    X11,
    Wayland,
}

impl BackendKind {
    /// Used when no override is set.
    pub const DEFAULT: BackendKind = BackendKind::Wayland;

    pub const ALL: [BackendKind; 2] = [BackendKind::X11, BackendKind::Wayland];

    pub const fn name(self) -> &'static str {
        match self {
            BackendKind::X11 => "x11",
            BackendKind::Wayland => "wayland",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// The backend tried when this one's client library is missing.
    pub const fn fallback(self) -> Self {
        match self {
            BackendKind::X11 => BackendKind::Wayland,
            BackendKind::Wayland => BackendKind::X11,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The live backend of a platform.
pub enum Backend {
    X11(X11Backend),
    Wayland(WaylandBackend),
}

impl Backend {
    /// Initializes the backend for `kind`.
    pub fn init(
        kind: BackendKind,
        connector: &mut dyn Connector,
        core: CoreHandle,
        attrs: &WindowAttributes,
    ) -> Result<Self, BackendError> {
        match kind {
            BackendKind::X11 => X11Backend::init(connector, core, attrs).map(Backend::X11),
            BackendKind::Wayland => {
                WaylandBackend::init(connector, core, attrs).map(Backend::Wayland)
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::X11(_) => BackendKind::X11,
            Backend::Wayland(_) => BackendKind::Wayland,
        }
    }

    /// Per-frame pump.
    pub fn update(&mut self) -> Result<(), BackendError> {
        match self {
            Backend::X11(b) => b.update(),
            Backend::Wayland(b) => b.update(),
        }
    }

    pub fn requires_pump(&self) -> bool {
        self.session().requires_pump()
    }

    pub fn size(&self) -> Size {
        self.session().inner_size()
    }

    pub fn refresh_rate(&self) -> Option<u32> {
        self.session().refresh_rate()
    }

    pub fn deinit(self) {
        match self {
            Backend::X11(b) => b.deinit(),
            Backend::Wayland(b) => b.deinit(),
        }
    }

    pub(crate) fn session(&self) -> &dyn Session {
        match self {
            Backend::X11(b) => b.session(),
            Backend::Wayland(b) => b.session(),
        }
    }

    pub(crate) fn session_mut(&mut self) -> &mut dyn Session {
        match self {
            Backend::X11(b) => b.session_mut(),
            Backend::Wayland(b) => b.session_mut(),
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::X11(b) => f.debug_tuple("X11").field(b).finish(),
            Backend::Wayland(b) => f.debug_tuple("Wayland").field(b).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_case_insensitively() {
        for name in ["x11", "X11"] {
            assert_eq!(BackendKind::from_name(name), Some(BackendKind::X11));
        }
        for name in ["wayland", "Wayland", "WAYLAND", "wAyLaNd"] {
            assert_eq!(BackendKind::from_name(name), Some(BackendKind::Wayland));
        }
    }

    #[test]
    fn unknown_and_padded_names_are_rejected() {
        for name in ["", "xorg", "win32", " x11", "wayland "] {
            assert_eq!(BackendKind::from_name(name), None, "{name:?}");
        }
    }

    #[test]
    fn fallback_is_the_other_backend() {
        assert_eq!(BackendKind::X11.fallback(), BackendKind::Wayland);
        assert_eq!(BackendKind::Wayland.fallback(), BackendKind::X11);
    }

    #[test]
    fn default_prefers_wayland() {
        assert_eq!(BackendKind::DEFAULT, BackendKind::Wayland);
    }
}
