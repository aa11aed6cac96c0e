/// Which toolbar call the next sync makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStep {
    Add,
    Update,
}

/// Install progress of the thumbnail toolbar.
///
/// The shell accepts `ThumbBarAddButtons` once per taskbar button, and only
/// after it announced that button with `TaskbarButtonCreated`. Subclassing the
/// window and adding the buttons are therefore tracked apart, so a retry never
/// adds twice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarProgress {
    subclassed: bool,
    buttons_added: bool,
}

impl ToolbarProgress {
    pub const fn new() -> Self {
        Self {
            subclassed: false,
            buttons_added: false,
        }
    }

    pub fn needs_subclass(&self) -> bool {
        !self.subclassed
    }

    pub fn mark_subclassed(&mut self) {
        self.subclassed = true;
    }

    pub fn button_step(&self) -> ButtonStep {
        if self.buttons_added {
            ButtonStep::Update
        } else {
            ButtonStep::Add
        }
    }

    pub fn mark_buttons_added(&mut self) {
        self.buttons_added = true;
    }

    /// The shell (re)created the taskbar button, which drops earlier buttons
    pub fn taskbar_button_created(&mut self) {
        self.buttons_added = false;
    }
}
