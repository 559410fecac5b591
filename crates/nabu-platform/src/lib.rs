//! nabu platform runtime.
//!
//! One window, its GPU surface descriptor and its event pump, over whichever
//! Linux windowing protocol is available (Wayland preferred, X11 as the
//! fallback).
//!
//! ```ignore
//! use nabu_platform::{EventQueue, InitOptions, Platform};
//!
//! let events = EventQueue::new();
//! let mut platform = Platform::init(events.clone(), &InitOptions::default())?;
//! loop {
//!     platform.update()?;
//!     for event in events.drain() { /* ... */ }
//! }
//! ```

pub mod backend;
pub mod env;
pub mod error;
pub mod event;
pub mod gamemode;
pub mod input;
pub mod logging;
pub mod native;
pub mod options;
pub mod platform;
pub mod surface;

#[cfg(test)]
mod testing;

pub use backend::{Backend, BackendKind};
pub use error::{BackendError, PlatformError, Result};
pub use event::{CoreHandle, Event, EventQueue, EventSink};
pub use gamemode::HookState;
pub use options::{CursorMode, CursorShape, DisplayMode, InitOptions, Size, VSyncMode};
pub use platform::{Capability, Mutator, Platform, PlatformServices, capability};
pub use surface::{SurfaceDescriptor, SurfaceError};
