//! The platform runtime facade.
//!
//! [`Platform`] is the only type the application core talks to. It owns the
//! live backend, the GPU surface descriptor derived from it, and the gamemode
//! state, and keeps the teardown order between them.

use std::fmt;

use crate::backend::{self, Backend, BackendKind, SelectError};
use crate::env::{BACKEND_VAR, EnvSource};
use crate::error::{BackendError, Result};
use crate::event::CoreHandle;
use crate::gamemode::{self, HookState, PerfHook};
use crate::native::{Connector, Session};
use crate::options::{
    CursorMode, CursorShape, DisplayMode, InitOptions, Size, VSyncMode, WindowAttributes,
};
use crate::surface::{self, SurfaceDescriptor, SurfaceError};

/// Refresh rate assumed when the monitor does not report one.
const DEFAULT_REFRESH_RATE: u32 = 60;

/// Window property setters on [`Platform`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mutator {
    Title,
    DisplayMode,
    Border,
    Headless,
    VSync,
    Size,
    CursorMode,
    CursorShape,
}

impl Mutator {
    pub const ALL: [Mutator; 8] = [
        Mutator::Title,
        Mutator::DisplayMode,
        Mutator::Border,
        Mutator::Headless,
        Mutator::VSync,
        Mutator::Size,
        Mutator::CursorMode,
        Mutator::CursorShape,
    ];
}

/// How a mutator is serviced.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Capability {
    /// Forwarded to the active backend.
    Delegated,
    /// Not yet supported at this layer: the value is recorded, nothing else
    /// changes.
    Placeholder,
}

/// Capability table shared by every backend.
///
/// Vsync is a placeholder because the present mode belongs to the GPU
/// surface configuration, and headless because window mapping is fixed
/// when the window is created.
pub const fn capability(mutator: Mutator) -> Capability {
    match mutator {
        Mutator::Title
        | Mutator::DisplayMode
        | Mutator::Border
        | Mutator::Size
        | Mutator::CursorMode
        | Mutator::CursorShape => Capability::Delegated,
        Mutator::Headless | Mutator::VSync => Capability::Placeholder,
    }
}

/// Injected collaborators.
pub struct PlatformServices {
    pub env: Box<dyn EnvSource>,
    pub connector: Box<dyn Connector>,
    pub perf_hook: Box<dyn PerfHook>,
}

impl PlatformServices {
    /// Process environment, winit, and the system's gamemode.
    #[cfg(target_os = "linux")]
    pub fn system() -> Self {
        Self {
            env: Box::new(crate::env::ProcessEnv),
            connector: Box::new(crate::native::WinitConnector),
            perf_hook: Box::new(gamemode::Gamemode::new()),
        }
    }
}

/// Window, GPU surface descriptor and event pump behind one API.
///
/// Driven from a single thread: `init` once, `update` every frame, `deinit`
/// once.
pub struct Platform {
    // `None` only once teardown has run.
    backend: Option<Backend>,
    surface_descriptor: SurfaceDescriptor,

    title: String,
    display_mode: DisplayMode,
    vsync: VSyncMode,
    cursor_mode: CursorMode,
    cursor_shape: CursorShape,
    border: bool,
    headless: bool,
    refresh_rate: u32,
    size: Size,

    gamemode: HookState,
    perf_hook: Box<dyn PerfHook>,
    core: CoreHandle,
}

impl Platform {
    /// Initializes against the host system.
    #[cfg(target_os = "linux")]
    pub fn init(core: CoreHandle, options: &InitOptions) -> Result<Self> {
        Self::init_with(core, options, PlatformServices::system())
    }

    /// Initializes with explicit collaborators.
    ///
    /// An unrecognized backend override aborts the process after logging a
    /// diagnostic; no backend is constructed.
    pub fn init_with(
        core: CoreHandle,
        options: &InitOptions,
        services: PlatformServices,
    ) -> Result<Self> {
        let PlatformServices {
            env,
            mut connector,
            mut perf_hook,
        } = services;

        let gamemode = if options.is_app || !gamemode::want_gamemode(env.as_ref())? {
            HookState::NotRequested
        } else if gamemode::activate(perf_hook.as_mut()) {
            HookState::Active
        } else {
            HookState::Inactive
        };

        // Any failure below must hand gamemode back before returning.
        let release = |hook: &mut dyn PerfHook| {
            if gamemode == HookState::Active {
                gamemode::deactivate(hook);
            }
        };

        apply_display_mode_policy(options.display_mode);

        let desired = match backend::desired_backend(env.as_ref()) {
            Ok(kind) => kind,
            Err(SelectError::Env(e)) => {
                release(perf_hook.as_mut());
                return Err(e.into());
            }
            Err(err @ SelectError::UnknownBackend(_)) => {
                release(perf_hook.as_mut());
                fatal_config(&err);
            }
        };

        let attrs = WindowAttributes::from(options);
        let selection =
            match backend::select_and_init(desired, connector.as_mut(), core.clone(), &attrs) {
                Ok(selection) => selection,
                Err(e) => {
                    log::error!("no windowing backend could be initialized: {e}");
                    release(perf_hook.as_mut());
                    return Err(e.into());
                }
            };

        let backend = selection.backend;
        let surface_descriptor = surface::derive_surface_descriptor(&backend);
        let refresh_rate = backend.refresh_rate().unwrap_or(DEFAULT_REFRESH_RATE);

        log::info!(
            "platform: {} backend, {}x{} @ {refresh_rate} Hz",
            backend.kind(),
            options.size.width,
            options.size.height,
        );

        Ok(Self {
            backend: Some(backend),
            surface_descriptor,
            title: options.title.clone(),
            display_mode: options.display_mode,
            vsync: options.vsync,
            cursor_mode: CursorMode::default(),
            cursor_shape: CursorShape::default(),
            border: options.border,
            headless: options.headless,
            refresh_rate,
            size: options.size,
            gamemode,
            perf_hook,
            core,
        })
    }

    /// Releases gamemode, then the backend.
    pub fn deinit(mut self) {
        self.teardown();
    }

    /// Pumps the backend's native event queue.
    ///
    /// A backend whose session needs no pump is left untouched.
    pub fn update(&mut self) -> std::result::Result<(), BackendError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };

        if !backend.requires_pump() {
            return Ok(());
        }

        backend.update()?;
        self.size = backend.size();
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.dispatch(Mutator::Title, |s| s.set_title(title));
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
        self.dispatch(Mutator::DisplayMode, |s| s.set_display_mode(mode));
    }

    pub fn set_border(&mut self, border: bool) {
        self.border = border;
        self.dispatch(Mutator::Border, |s| s.set_border(border));
    }

    /// Placeholder: recorded only, the window stays as created.
    pub fn set_headless(&mut self, headless: bool) {
        self.headless = headless;
        self.dispatch(Mutator::Headless, |_| {});
    }

    /// Placeholder: recorded for the GPU layer to read back via [`Platform::vsync`].
    pub fn set_vsync(&mut self, vsync: VSyncMode) {
        self.vsync = vsync;
        self.dispatch(Mutator::VSync, |_| {});
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.dispatch(Mutator::Size, |s| s.set_size(size));
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.cursor_mode = mode;
        self.dispatch(Mutator::CursorMode, |s| s.set_cursor_mode(mode));
    }

    pub fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.cursor_shape = shape;
        self.dispatch(Mutator::CursorShape, |s| s.set_cursor_shape(shape));
    }

    /// Creates a wgpu surface on the platform's window.
    ///
    /// # Safety
    ///
    /// The surface must be dropped before [`Platform::deinit`].
    pub unsafe fn create_surface(
        &self,
        instance: &wgpu::Instance,
    ) -> std::result::Result<wgpu::Surface<'static>, SurfaceError> {
        // SAFETY: the backend outlives the surface per this function's contract.
        let target = unsafe { self.surface_descriptor.wgpu_target()? };
        Ok(unsafe { instance.create_surface_unsafe(target)? })
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(Backend::kind)
    }

    pub fn surface_descriptor(&self) -> &SurfaceDescriptor {
        &self.surface_descriptor
    }

    /// The application handle passed to `init`, shared with the backend.
    pub fn core(&self) -> &CoreHandle {
        &self.core
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn vsync(&self) -> VSyncMode {
        self.vsync
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    pub fn cursor_shape(&self) -> CursorShape {
        self.cursor_shape
    }

    pub fn border(&self) -> bool {
        self.border
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    pub fn refresh_rate(&self) -> u32 {
        self.refresh_rate
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn gamemode(&self) -> HookState {
        self.gamemode
    }

    fn dispatch(&mut self, mutator: Mutator, f: impl FnOnce(&mut dyn Session)) {
        match capability(mutator) {
            Capability::Delegated => {
                if let Some(backend) = self.backend.as_mut() {
                    f(backend.session_mut());
                }
            }
            Capability::Placeholder => {
                log::debug!(
                    "{mutator:?} is not supported by the platform layer yet; value recorded"
                );
            }
        }
    }

    fn teardown(&mut self) {
        if self.gamemode == HookState::Active {
            gamemode::deactivate(self.perf_hook.as_mut());
            self.gamemode = HookState::Inactive;
        }

        if let Some(backend) = self.backend.take() {
            backend.deinit();
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("backend", &self.backend)
            .field("surface_descriptor", &self.surface_descriptor)
            .field("size", &self.size)
            .field("gamemode", &self.gamemode)
            .finish_non_exhaustive()
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Display-mode policy at init is not implemented: the window always opens
/// windowed and `Platform::set_display_mode` changes it afterwards.
fn apply_display_mode_policy(_mode: DisplayMode) {}

fn fatal_config(err: &SelectError) -> ! {
    log::error!("invalid {BACKEND_VAR}: {err}");
    log::logger().flush();
    std::process::abort();
}
