//! Feral gamemode integration.
//!
//! Gamemode is best-effort: the runtime asks for it once at init and hands
//! it back at deinit, and a host without the daemon or library simply runs
//! without it.

use std::ffi::{CStr, c_char, c_int};

use thiserror::Error;

use crate::env::{EnvError, EnvSource, GAMEMODE_VAR};

/// Whether gamemode was requested for this runtime and with what outcome.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum HookState {
    /// Never attempted: app contexts, or disabled through the environment.
    #[default]
    NotRequested,
    Active,
    /// Requested, but not observed active afterwards.
    Inactive,
}

#[derive(Error, Debug)]
pub enum HookError {
    #[error("failed to load {library}: {source}")]
    Library {
        library: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("gamemode request failed: {0}")]
    Request(String),
}

/// OS performance mode that can be requested for the process.
pub trait PerfHook {
    fn request_start(&mut self) -> Result<(), HookError>;

    /// Observed state, which can differ from what the request reported.
    fn is_active(&self) -> bool;

    fn request_end(&mut self) -> Result<(), HookError>;
}

/// Reads the gamemode override. Unset or any value other than `off`/`false`
/// (case-insensitive) enables it.
pub fn want_gamemode(env: &dyn EnvSource) -> Result<bool, EnvError> {
    Ok(match env.var(GAMEMODE_VAR)? {
        None => true,
        Some(value) => {
            !(value.eq_ignore_ascii_case("off") || value.eq_ignore_ascii_case("false"))
        }
    })
}

/// Requests the hook and reports whether it is actually active.
pub fn activate(hook: &mut dyn PerfHook) -> bool {
    if let Err(e) = hook.request_start() {
        log::debug!("gamemode: {e}");
    }

    let active = hook.is_active();
    if active {
        log::info!("gamemode: activated");
    }
    active
}

/// Releases the hook. Only valid after [`activate`] returned `true`.
pub fn deactivate(hook: &mut dyn PerfHook) {
    match hook.request_end() {
        Ok(()) => log::info!("gamemode: deactivated"),
        Err(e) => log::warn!("gamemode: {e}"),
    }
}

const LIBRARY: &str = "libgamemode.so.0";

/// gamemode_query_status: active and registered for this process.
const STATUS_ACTIVE_REGISTERED: c_int = 2;

type RequestFn = unsafe extern "C" fn() -> c_int;
type ErrorStringFn = unsafe extern "C" fn() -> *const c_char;

struct GamemodeLib {
    request_start: RequestFn,
    request_end: RequestFn,
    query_status: RequestFn,
    error_string: ErrorStringFn,
    // Keeps the function pointers above valid.
    _lib: libloading::Library,
}

impl GamemodeLib {
    fn load() -> Result<Self, HookError> {
        let err = |source| HookError::Library {
            library: LIBRARY,
            source,
        };

        // SAFETY: libgamemode has no load-time side effects beyond symbol
        // resolution, and each symbol is read with its C signature.
        unsafe {
            let lib = libloading::Library::new(LIBRARY).map_err(err)?;
            let request_start = *lib
                .get::<RequestFn>(b"real_gamemode_request_start\0")
                .map_err(err)?;
            let request_end = *lib
                .get::<RequestFn>(b"real_gamemode_request_end\0")
                .map_err(err)?;
            let query_status = *lib
                .get::<RequestFn>(b"real_gamemode_query_status\0")
                .map_err(err)?;
            let error_string = *lib
                .get::<ErrorStringFn>(b"real_gamemode_error_string\0")
                .map_err(err)?;

            Ok(Self {
                request_start,
                request_end,
                query_status,
                error_string,
                _lib: lib,
            })
        }
    }

    fn last_error(&self) -> String {
        // SAFETY: returns a pointer to a static, NUL-terminated buffer.
        let ptr = unsafe { (self.error_string)() };
        if ptr.is_null() {
            return "unknown error".to_string();
        }
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    fn call(&self, f: RequestFn) -> Result<c_int, HookError> {
        // SAFETY: gamemode entry points take no arguments.
        let status = unsafe { f() };
        if status < 0 {
            return Err(HookError::Request(self.last_error()));
        }
        Ok(status)
    }
}

/// Gamemode through the system's `libgamemode`.
///
/// The library is loaded on the first request, so constructing this is free.
#[derive(Default)]
pub struct Gamemode {
    lib: Option<GamemodeLib>,
}

impl Gamemode {
    pub fn new() -> Self {
        Self::default()
    }

    fn lib(&mut self) -> Result<&GamemodeLib, HookError> {
        let lib = match self.lib.take() {
            Some(lib) => lib,
            None => GamemodeLib::load()?,
        };
        Ok(self.lib.insert(lib))
    }
}

impl PerfHook for Gamemode {
    fn request_start(&mut self) -> Result<(), HookError> {
        let lib = self.lib()?;
        lib.call(lib.request_start).map(drop)
    }

    fn is_active(&self) -> bool {
        let Some(lib) = &self.lib else {
            return false;
        };
        matches!(lib.call(lib.query_status), Ok(STATUS_ACTIVE_REGISTERED))
    }

    fn request_end(&mut self) -> Result<(), HookError> {
        let lib = self.lib()?;
        lib.call(lib.request_end).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use crate::testing::{self, Call, FakeHook};

    fn want(value: Option<&str>) -> bool {
        let env = match value {
            Some(v) => MapEnv::new().with(GAMEMODE_VAR, v),
            None => MapEnv::new(),
        };
        want_gamemode(&env).unwrap()
    }

    #[test]
    fn enabled_when_unset() {
        assert!(want(None));
    }

    #[test]
    fn disabled_by_off_or_false_in_any_case() {
        for value in ["off", "OFF", "Off", "false", "FALSE", "fAlSe"] {
            assert!(!want(Some(value)), "{value}");
        }
    }

    #[test]
    fn any_other_value_enables() {
        for value in ["on", "true", "1", "0", "no", "", "offf"] {
            assert!(want(Some(value)), "{value:?}");
        }
    }

    #[test]
    fn activation_reports_observed_state_not_request_result() {
        let journal = testing::journal();

        let mut failed_but_active = FakeHook::new(journal.clone()).request_fails();
        assert!(activate(&mut failed_but_active));

        let mut requested_but_idle = FakeHook::new(journal.clone()).never_active();
        assert!(!activate(&mut requested_but_idle));

        assert_eq!(*journal.borrow(), vec![Call::HookStart, Call::HookStart]);
    }

    #[test]
    fn state_changes_log_at_info() {
        testing::capture_logs();
        let mut hook = FakeHook::new(testing::journal());

        assert!(activate(&mut hook));
        deactivate(&mut hook);

        assert_eq!(
            testing::logged(log::Level::Info),
            vec!["gamemode: activated".to_string(), "gamemode: deactivated".to_string()]
        );
    }

    #[test]
    fn unloaded_gamemode_is_inactive() {
        assert!(!Gamemode::new().is_active());
    }
}
