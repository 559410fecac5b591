//! winit-backed sessions.
//!
//! Each session owns a winit event loop forced onto one protocol and the
//! single window created on it. Events are drained with `pump_app_events`
//! so the platform keeps control of the frame loop.

use std::time::Duration;

use anyhow::anyhow;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::platform::wayland::EventLoopBuilderExtWayland;
use winit::platform::x11::EventLoopBuilderExtX11;
use winit::window::{CursorGrabMode, CursorIcon, Fullscreen, Window, WindowId};

use super::translate::translate_window_event;
use super::{Connector, Session, probe_libraries};
use crate::backend::BackendKind;
use crate::error::BackendError;
use crate::event::{CoreHandle, Event};
use crate::input::InputState;
use crate::options::{CursorMode, CursorShape, DisplayMode, Size, WindowAttributes};

/// Upper bound on zero-timeout pumps while waiting for the first `resumed`.
const STARTUP_PUMPS: usize = 16;

/// Connector for the host's X11 or Wayland display server, via winit.
///
/// winit permits a single event loop per process, so only one session can be
/// opened over the lifetime of the process.
#[derive(Debug, Default)]
pub struct WinitConnector;

impl Connector for WinitConnector {
    fn probe(&self, kind: BackendKind, libraries: &[&'static str]) -> Result<(), BackendError> {
        probe_libraries(kind, libraries)
    }

    fn open(
        &mut self,
        kind: BackendKind,
        attrs: &WindowAttributes,
        core: CoreHandle,
    ) -> Result<Box<dyn Session>, BackendError> {
        Ok(Box::new(WinitSession::open(kind, attrs, core)?))
    }
}

/// Handler state driven by the event loop.
struct SessionState {
    attrs: WindowAttributes,
    core: CoreHandle,
    input: InputState,
    scale_factor: f64,

    started: bool,
    created: Option<Window>,
    error: Option<BackendError>,
}

impl ApplicationHandler for SessionState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        let attributes = Window::default_attributes()
            .with_title(self.attrs.title.clone())
            .with_inner_size(LogicalSize::new(self.attrs.size.width, self.attrs.size.height))
            .with_decorations(self.attrs.border)
            .with_visible(self.attrs.visible);

        match event_loop.create_window(attributes) {
            Ok(window) => {
                self.scale_factor = window.scale_factor();
                self.created = Some(window);
            }
            Err(e) => self.error = Some(BackendError::WindowCreation(anyhow!("{e}"))),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => self.core.push(Event::CloseRequested),
            WindowEvent::Resized(size) => self.core.push(Event::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }
            _ => {}
        }

        if let Some(ev) = translate_window_event(self.scale_factor, &self.input, &event) {
            self.input.apply_event(&ev);
            self.core.push(Event::Input(ev));
        }
    }
}

/// Field order is drop order: the window goes before its event loop.
struct WinitSession {
    kind: BackendKind,
    window: Window,
    state: SessionState,
    event_loop: EventLoop<()>,
}

impl WinitSession {
    fn open(
        kind: BackendKind,
        attrs: &WindowAttributes,
        core: CoreHandle,
    ) -> Result<Self, BackendError> {
        let mut builder = EventLoop::builder();
        match kind {
            BackendKind::X11 => {
                builder.with_x11();
            }
            BackendKind::Wayland => {
                builder.with_wayland();
            }
        }

        let mut event_loop = builder.build().map_err(|e| BackendError::Connect {
            backend: kind,
            message: e.to_string(),
        })?;

        let mut state = SessionState {
            attrs: attrs.clone(),
            core,
            input: InputState::default(),
            scale_factor: 1.0,
            started: false,
            created: None,
            error: None,
        };

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut state);
            if let PumpStatus::Exit(code) = status {
                return Err(BackendError::Closed(code));
            }
            if let Some(err) = state.error.take() {
                return Err(err);
            }
            if state.created.is_some() {
                break;
            }
        }

        let Some(window) = state.created.take() else {
            return Err(BackendError::WindowCreation(anyhow!(
                "{kind} event loop did not resume after {STARTUP_PUMPS} pumps"
            )));
        };

        log::debug!("{kind}: window {:?} created", window.id());

        Ok(Self {
            kind,
            window,
            state,
            event_loop,
        })
    }
}

impl Session for WinitSession {
    fn raw_display_handle(&self) -> Result<RawDisplayHandle, BackendError> {
        Ok(self.window.display_handle()?.as_raw())
    }

    fn raw_window_handle(&self) -> Result<RawWindowHandle, BackendError> {
        Ok(self.window.window_handle()?.as_raw())
    }

    fn requires_pump(&self) -> bool {
        true
    }

    fn pump(&mut self) -> Result<(), BackendError> {
        if let PumpStatus::Exit(code) =
            self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state)
        {
            return Err(BackendError::Closed(code));
        }

        match self.state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn inner_size(&self) -> Size {
        let logical = self.window.inner_size().to_logical::<u32>(self.window.scale_factor());
        Size::new(logical.width, logical.height)
    }

    fn refresh_rate(&self) -> Option<u32> {
        self.window
            .current_monitor()
            .and_then(|m| m.refresh_rate_millihertz())
            .map(|mhz| (mhz + 500) / 1000)
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_size(&mut self, size: Size) {
        let _ = self
            .window
            .request_inner_size(LogicalSize::new(size.width, size.height));
    }

    fn set_border(&mut self, border: bool) {
        self.window.set_decorations(border);
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        let fullscreen = match mode {
            DisplayMode::Windowed => None,
            DisplayMode::Borderless => Some(Fullscreen::Borderless(None)),
            // Wayland compositors do not grant exclusive modes.
            DisplayMode::Fullscreen if self.kind == BackendKind::Wayland => {
                Some(Fullscreen::Borderless(None))
            }
            DisplayMode::Fullscreen => Some(
                self.window
                    .current_monitor()
                    .and_then(|m| m.video_modes().next())
                    .map(Fullscreen::Exclusive)
                    .unwrap_or(Fullscreen::Borderless(None)),
            ),
        };

        self.window.set_fullscreen(fullscreen);
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        let (visible, grab) = match mode {
            CursorMode::Normal => (true, CursorGrabMode::None),
            CursorMode::Hidden => (false, CursorGrabMode::None),
            CursorMode::Disabled => (false, CursorGrabMode::Locked),
        };

        self.window.set_cursor_visible(visible);

        let result = self.window.set_cursor_grab(grab).or_else(|e| match grab {
            // X11 has no pointer lock; confinement is the closest match.
            CursorGrabMode::Locked => self.window.set_cursor_grab(CursorGrabMode::Confined),
            _ => Err(e),
        });

        if let Err(e) = result {
            log::warn!("{}: cursor grab {grab:?} rejected: {e}", self.kind);
        }
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.window.set_cursor(cursor_icon(shape));
    }

    fn close(self: Box<Self>) {
        let WinitSession {
            kind,
            window,
            state,
            event_loop,
        } = *self;

        drop(window);
        drop(state);
        drop(event_loop);

        log::debug!("{kind}: session closed");
    }
}

fn cursor_icon(shape: CursorShape) -> CursorIcon {
    match shape {
        CursorShape::Arrow => CursorIcon::Default,
        CursorShape::IBeam => CursorIcon::Text,
        CursorShape::Crosshair => CursorIcon::Crosshair,
        CursorShape::PointingHand => CursorIcon::Pointer,
        CursorShape::ResizeEw => CursorIcon::EwResize,
        CursorShape::ResizeNs => CursorIcon::NsResize,
        CursorShape::ResizeNwse => CursorIcon::NwseResize,
        CursorShape::ResizeNesw => CursorIcon::NeswResize,
        CursorShape::ResizeAll => CursorIcon::Move,
        CursorShape::NotAllowed => CursorIcon::NotAllowed,
    }
}
