//! Window settings
//!
//! Configuration for window creation.

/// Settings for creating a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    /// Window title.
    pub title: String,
    /// Initial window size (width, height) in logical pixels.
    pub size: (u32, u32),
    /// Whether the window is resizable.
    pub resizable: bool,
    /// Whether to enable vsync.
    pub vsync: bool,
    /// Whether to hide and capture the cursor for mouse look.
    pub grab_cursor: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "penumbra".to_string(),
            size: (1366, 768),
            resizable: true,
            vsync: true,
            grab_cursor: true,
        }
    }
}

impl WindowSettings {
    /// Create new window settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set whether the window is resizable.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether to enable vsync.
    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Set whether to capture the cursor.
    pub fn grab_cursor(mut self, grab_cursor: bool) -> Self {
        self.grab_cursor = grab_cursor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let settings = WindowSettings::new()
            .title("shadows")
            .size(800, 600)
            .vsync(false)
            .grab_cursor(false);
        assert_eq!(settings.title, "shadows");
        assert_eq!(settings.size, (800, 600));
        assert!(!settings.vsync);
        assert!(!settings.grab_cursor);
        assert!(settings.resizable);
    }
}
