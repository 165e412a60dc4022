//! Per-render context handed to components.
//!
//! Carries the few facts a content view needs about the surface it draws
//! in, so the `Component` trait stays stable as the host grows.

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    maximized: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            maximized: false,
        }
    }

    /// Whether the surface holding the component is frontmost.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn maximized(&self) -> bool {
        self.maximized
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }
}
