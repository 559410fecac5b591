//! Runtime configuration and window property types.

/// Window size in logical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// How the window occupies the screen.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DisplayMode {
    #[default]
    Windowed,
    Fullscreen,
    /// Fullscreen-sized undecorated window on the current monitor.
    Borderless,
}

/// Presentation synchronization requested by the application.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum VSyncMode {
    None,
    #[default]
    Double,
    Triple,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CursorMode {
    #[default]
    Normal,
    Hidden,
    /// Hidden and confined to the window.
    Disabled,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CursorShape {
    #[default]
    Arrow,
    IBeam,
    Crosshair,
    PointingHand,
    ResizeEw,
    ResizeNs,
    ResizeNwse,
    ResizeNesw,
    ResizeAll,
    NotAllowed,
}

/// Initialization snapshot for [`Platform`](crate::Platform).
///
/// Values are copied into the platform during init; the options are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    pub title: String,
    pub size: Size,
    pub display_mode: DisplayMode,
    pub vsync: VSyncMode,
    pub border: bool,
    pub headless: bool,

    /// Set when the runtime is embedded in a host application that owns
    /// process-level state (gamemode is left alone).
    pub is_app: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            title: "nabu".to_string(),
            size: Size::default(),
            display_mode: DisplayMode::Windowed,
            vsync: VSyncMode::Double,
            border: true,
            headless: false,
            is_app: false,
        }
    }
}

impl InitOptions {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn vsync(mut self, vsync: VSyncMode) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn is_app(mut self, is_app: bool) -> Self {
        self.is_app = is_app;
        self
    }
}

/// Attributes handed to a native connector when a window is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub title: String,
    pub size: Size,
    pub border: bool,
    pub visible: bool,
}

impl From<&InitOptions> for WindowAttributes {
    fn from(options: &InitOptions) -> Self {
        Self {
            title: options.title.clone(),
            size: options.size,
            border: options.border,
            visible: !options.headless,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_options_open_an_invisible_window() {
        let attrs = WindowAttributes::from(&InitOptions::default().headless(true));
        assert!(!attrs.visible);
    }

    #[test]
    fn setters_chain() {
        let options = InitOptions::default()
            .title("probe")
            .size(640, 480)
            .border(false)
            .is_app(true);
        assert_eq!(options.title, "probe");
        assert_eq!(options.size, Size::new(640, 480));
        assert!(!options.border);
        assert!(options.is_app);
        assert_eq!(options.display_mode, DisplayMode::Windowed);
    }
}
