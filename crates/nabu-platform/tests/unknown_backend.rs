//! An unrecognized backend override must terminate the process before any
//! backend is touched. The test re-runs itself in a child process to observe
//! the abort.

use std::process::Command;

use nabu_platform::backend::BackendKind;
use nabu_platform::env::{BACKEND_VAR, GAMEMODE_VAR, MapEnv};
use nabu_platform::gamemode::{HookError, PerfHook};
use nabu_platform::logging::{LoggingConfig, init_logging};
use nabu_platform::native::{Connector, Session};
use nabu_platform::options::WindowAttributes;
use nabu_platform::{BackendError, CoreHandle, EventQueue, InitOptions, Platform, PlatformServices};

const CHILD_VAR: &str = "NABU_UNKNOWN_BACKEND_CHILD";
const TOUCHED: &str = "connector touched";
const SURVIVED: &str = "init returned";

/// Reports any use; none is expected.
struct Tripwire;

impl Connector for Tripwire {
    fn probe(&self, kind: BackendKind, _libraries: &[&'static str]) -> Result<(), BackendError> {
        eprintln!("{TOUCHED}: probe {kind}");
        Err(BackendError::LibraryNotFound {
            backend: kind,
            library: "libtripwire.so",
        })
    }

    fn open(
        &mut self,
        kind: BackendKind,
        _attrs: &WindowAttributes,
        _core: CoreHandle,
    ) -> Result<Box<dyn Session>, BackendError> {
        eprintln!("{TOUCHED}: open {kind}");
        Err(BackendError::Connect {
            backend: kind,
            message: "tripwire".to_string(),
        })
    }
}

struct Idle;

impl PerfHook for Idle {
    fn request_start(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    fn is_active(&self) -> bool {
        false
    }

    fn request_end(&mut self) -> Result<(), HookError> {
        Ok(())
    }
}

fn run_child() -> ! {
    init_logging(LoggingConfig {
        env_filter: Some("error".to_string()),
        ..LoggingConfig::default()
    });

    let services = PlatformServices {
        env: Box::new(
            MapEnv::new()
                .with(BACKEND_VAR, "directfb")
                .with(GAMEMODE_VAR, "off"),
        ),
        connector: Box::new(Tripwire),
        perf_hook: Box::new(Idle),
    };

    let result = Platform::init_with(EventQueue::new(), &InitOptions::default(), services);
    println!("{SURVIVED}: ok={}", result.is_ok());
    std::process::exit(0);
}

#[test]
fn unknown_backend_override_aborts_before_any_backend() {
    if std::env::var_os(CHILD_VAR).is_some() {
        run_child();
    }

    let output = Command::new(std::env::current_exe().unwrap())
        .args([
            "unknown_backend_override_aborts_before_any_backend",
            "--exact",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(CHILD_VAR, "1")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "child exited cleanly\n{stdout}\n{stderr}");
    assert!(!stdout.contains(SURVIVED), "{stdout}");
    assert!(!stderr.contains(TOUCHED), "{stderr}");
    assert!(stderr.contains("directfb"), "diagnostic missing: {stderr}");

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6), "expected SIGABRT");
    }
}
