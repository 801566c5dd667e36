//! Modal overlay panel with CSS-like delayed transitions.
//!
//! The panel has two markers, `hidden` and `visible`, mirroring the two
//! classes the fade transition keys off. `show` and `hide` flip the
//! markers immediately and schedule the rest of the change after a short
//! delay, driven by [`Overlay::tick`].

use crate::core::timer::Countdown;

/// Delay between making the panel displayable and starting the fade-in
pub const SHOW_DELAY: f32 = 0.010;
/// Fade duration; display is switched off once it has run
pub const HIDE_DELAY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    Appearing,
    Visible,
    Hiding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    None,
}

/// Where a click landed relative to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the panel; never propagates to the outside-click handler
    Panel,
    Outside,
}

/// Visibility of the instructional text blocks the overlay covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionPanels {
    pub instructions: bool,
    /// "Enable hardware acceleration" hint, only useful without a GPU
    pub hardware_hint: bool,
}

impl InstructionPanels {
    pub fn for_capability(accelerated: bool) -> Self {
        Self {
            instructions: true,
            hardware_hint: !accelerated,
        }
    }

    pub const HIDDEN: Self = Self {
        instructions: false,
        hardware_hint: false,
    };
}

#[derive(Debug, Clone)]
pub struct Overlay {
    state: OverlayState,
    display: Display,
    hidden_marker: bool,
    visible_marker: bool,
    panels: InstructionPanels,
    baseline: InstructionPanels,
    pending: Countdown,
    opacity: f32,
}

impl Overlay {
    pub fn new(baseline: InstructionPanels) -> Self {
        Self {
            state: OverlayState::Hidden,
            display: Display::None,
            hidden_marker: true,
            visible_marker: false,
            panels: baseline,
            baseline,
            pending: Countdown::new(SHOW_DELAY),
            opacity: 0.0,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn is_visible(&self) -> bool {
        self.visible_marker
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden_marker
    }

    pub fn panels(&self) -> InstructionPanels {
        self.panels
    }

    /// Fade level in [0, 1], eased over [`HIDE_DELAY`]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Starts showing the panel. A no-op when already visible.
    ///
    /// A pending hide is superseded: only the most recent trigger's delay
    /// ever completes.
    pub fn show(&mut self) {
        if self.state == OverlayState::Visible {
            return;
        }
        log::debug!("Overlay: show from {:?}", self.state);

        self.hidden_marker = false;
        self.display = Display::Block;
        self.state = OverlayState::Appearing;
        self.pending.start_with(SHOW_DELAY);
    }

    /// Starts hiding the panel, from any state
    pub fn hide(&mut self) {
        log::debug!("Overlay: hide from {:?}", self.state);

        self.visible_marker = false;
        self.hidden_marker = true;
        self.state = OverlayState::Hiding;
        self.pending.start_with(HIDE_DELAY);
    }

    /// Escape always hides
    pub fn on_escape(&mut self) {
        self.hide();
    }

    /// Document-level click handler. Returns true if it hid the panel.
    pub fn on_document_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Panel => false,
            ClickTarget::Outside if self.visible_marker => {
                self.hide();
                true
            }
            ClickTarget::Outside => false,
        }
    }

    /// Advances pending transitions by `delta` seconds
    pub fn tick(&mut self, delta: f32) {
        if self.pending.tick(delta) {
            match self.state {
                OverlayState::Appearing => {
                    self.panels = InstructionPanels::HIDDEN;
                    self.visible_marker = true;
                    self.state = OverlayState::Visible;
                }
                OverlayState::Hiding => {
                    self.panels = self.baseline;
                    self.display = Display::None;
                    self.state = OverlayState::Hidden;
                }
                OverlayState::Hidden | OverlayState::Visible => {}
            }
        }

        let target = if self.visible_marker { 1.0 } else { 0.0 };
        let step = delta / HIDE_DELAY;
        self.opacity = if self.opacity < target {
            (self.opacity + step).min(target)
        } else {
            (self.opacity - step).max(target)
        };
    }
}
