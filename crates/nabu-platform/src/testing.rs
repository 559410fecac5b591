//! Fakes shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{OsString, c_void};
use std::os::unix::ffi::OsStringExt;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Once;

use raw_window_handle::{
    RawDisplayHandle, RawWindowHandle, WaylandDisplayHandle, WaylandWindowHandle,
    XlibDisplayHandle, XlibWindowHandle,
};

use crate::backend::BackendKind;
use crate::env::{EnvError, EnvSource};
use crate::error::BackendError;
use crate::event::{CoreHandle, Event};
use crate::gamemode::{HookError, PerfHook};
use crate::native::{Connector, Session};
use crate::options::{CursorMode, CursorShape, DisplayMode, Size, WindowAttributes};

pub(crate) const REFUSED: &str = "connection refused";
pub(crate) const FAKE_XID: u64 = 0x2a;

/// Observable side effects, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Probe(BackendKind),
    Open(BackendKind),
    Pump(BackendKind),
    Close(BackendKind),
    SetTitle(String),
    SetSize(Size),
    SetBorder(bool),
    SetDisplayMode(DisplayMode),
    SetCursorMode(CursorMode),
    SetCursorShape(CursorShape),
    HookStart,
    HookEnd,
}

/// Environment holding a single variable whose bytes are not UTF-8.
pub(crate) struct NonUnicodeEnv {
    name: &'static str,
}

impl NonUnicodeEnv {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl EnvSource for NonUnicodeEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        if name != self.name {
            return Ok(None);
        }
        Err(EnvError::NotUnicode {
            name: name.to_string(),
            value: OsString::from_vec(b"wayl\xffnd".to_vec()),
        })
    }
}

pub(crate) type Journal = Rc<RefCell<Vec<Call>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) struct FakeConnector {
    journal: Journal,
    missing: Vec<BackendKind>,
    refused: Vec<BackendKind>,
    handles: HashMap<BackendKind, BackendKind>,
    pump: bool,
    fail_pump: bool,
    emit: Vec<Event>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self {
            journal: journal(),
            missing: Vec::new(),
            refused: Vec::new(),
            handles: HashMap::new(),
            pump: true,
            fail_pump: false,
            emit: Vec::new(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Client library of `kind` is absent.
    pub fn missing(mut self, kind: BackendKind) -> Self {
        self.missing.push(kind);
        self
    }

    /// Library present but the display server refuses connections.
    pub fn refuse(mut self, kind: BackendKind) -> Self {
        self.refused.push(kind);
        self
    }

    /// Sessions for `kind` report handles of `reported`.
    pub fn handles_of(mut self, kind: BackendKind, reported: BackendKind) -> Self {
        self.handles.insert(kind, reported);
        self
    }

    pub fn without_pump(mut self) -> Self {
        self.pump = false;
        self
    }

    pub fn failing_pump(mut self) -> Self {
        self.fail_pump = true;
        self
    }

    /// Events every pump delivers to the core.
    pub fn emit(mut self, event: Event) -> Self {
        self.emit.push(event);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }
}

impl Connector for FakeConnector {
    fn probe(&self, kind: BackendKind, _libraries: &[&'static str]) -> Result<(), BackendError> {
        self.journal.borrow_mut().push(Call::Probe(kind));
        if self.missing.contains(&kind) {
            return Err(BackendError::LibraryNotFound {
                backend: kind,
                library: "libfake.so.0",
            });
        }
        Ok(())
    }

    fn open(
        &mut self,
        kind: BackendKind,
        attrs: &WindowAttributes,
        core: CoreHandle,
    ) -> Result<Box<dyn Session>, BackendError> {
        self.journal.borrow_mut().push(Call::Open(kind));
        if self.refused.contains(&kind) {
            return Err(BackendError::Connect {
                backend: kind,
                message: REFUSED.to_string(),
            });
        }

        Ok(Box::new(FakeSession {
            kind,
            reported: self.handles.get(&kind).copied().unwrap_or(kind),
            journal: self.journal.clone(),
            core,
            size: attrs.size,
            pump: self.pump,
            fail_pump: self.fail_pump,
            emit: self.emit.clone(),
        }))
    }
}

struct FakeSession {
    kind: BackendKind,
    reported: BackendKind,
    journal: Journal,
    core: CoreHandle,
    size: Size,
    pump: bool,
    fail_pump: bool,
    emit: Vec<Event>,
}

impl FakeSession {
    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }
}

impl Session for FakeSession {
    fn raw_display_handle(&self) -> Result<RawDisplayHandle, BackendError> {
        Ok(match self.reported {
            BackendKind::X11 => RawDisplayHandle::Xlib(XlibDisplayHandle::new(
                Some(NonNull::<c_void>::dangling()),
                0,
            )),
            BackendKind::Wayland => {
                RawDisplayHandle::Wayland(WaylandDisplayHandle::new(NonNull::dangling()))
            }
        })
    }

    fn raw_window_handle(&self) -> Result<RawWindowHandle, BackendError> {
        Ok(match self.reported {
            BackendKind::X11 => RawWindowHandle::Xlib(XlibWindowHandle::new(FAKE_XID as _)),
            BackendKind::Wayland => {
                RawWindowHandle::Wayland(WaylandWindowHandle::new(NonNull::dangling()))
            }
        })
    }

    fn requires_pump(&self) -> bool {
        self.pump
    }

    fn pump(&mut self) -> Result<(), BackendError> {
        self.record(Call::Pump(self.kind));
        if self.fail_pump {
            return Err(BackendError::Closed(1));
        }
        for event in &self.emit {
            if let Event::Resized { width, height } = event {
                self.size = Size::new(*width, *height);
            }
            self.core.push(event.clone());
        }
        Ok(())
    }

    fn inner_size(&self) -> Size {
        self.size
    }

    fn refresh_rate(&self) -> Option<u32> {
        Some(144)
    }

    fn set_title(&mut self, title: &str) {
        self.record(Call::SetTitle(title.to_string()));
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.record(Call::SetSize(size));
    }

    fn set_border(&mut self, border: bool) {
        self.record(Call::SetBorder(border));
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        self.record(Call::SetDisplayMode(mode));
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.record(Call::SetCursorMode(mode));
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.record(Call::SetCursorShape(shape));
    }

    fn close(self: Box<Self>) {
        self.record(Call::Close(self.kind));
    }
}

/// Perf hook whose request result and observed state are set independently.
pub(crate) struct FakeHook {
    journal: Journal,
    request_ok: bool,
    becomes_active: bool,
    active: bool,
}

impl FakeHook {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            request_ok: true,
            becomes_active: true,
            active: false,
        }
    }

    pub fn request_fails(mut self) -> Self {
        self.request_ok = false;
        self
    }

    pub fn never_active(mut self) -> Self {
        self.becomes_active = false;
        self
    }
}

impl PerfHook for FakeHook {
    fn request_start(&mut self) -> Result<(), HookError> {
        self.journal.borrow_mut().push(Call::HookStart);
        self.active = self.becomes_active;
        if self.request_ok {
            Ok(())
        } else {
            Err(HookError::Request("daemon unreachable".to_string()))
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn request_end(&mut self) -> Result<(), HookError> {
        self.journal.borrow_mut().push(Call::HookEnd);
        self.active = false;
        Ok(())
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records log lines per thread, so parallel tests do not see each other.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Starts capturing log lines for the current thread.
pub(crate) fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub(crate) fn logged(level: log::Level) -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}

pub(crate) fn warnings() -> Vec<String> {
    logged(log::Level::Warn)
}
