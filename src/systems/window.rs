//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;

use drivescape_math::Vec3;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};

use crate::config::WindowConfig;

/// Title text for the current vehicle position and popup state
pub fn format_title(base: &str, position: Option<Vec3>, popup_open: bool) -> String {
    let hint = if popup_open {
        "[Esc to close]"
    } else {
        "[Enter on a button]"
    };
    match position {
        Some(p) => format!("{} - ({:.1}, {:.1}, {:.1}) {}", base, p.x, p.y, p.z, hint),
        None => format!("{} - no vehicle {}", base, hint),
    }
}

/// Owns the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    /// Inner size in logical pixels
    pub fn logical_size(&self) -> (f32, f32) {
        let size = self.window.inner_size().to_logical::<f32>(self.scale_factor());
        (size.width, size.height)
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    pub fn update_title(&self, position: Option<Vec3>, popup_open: bool) {
        self.window
            .set_title(&format_title(&self.base_title, position, popup_open));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
