use crate::core::timer::Countdown;

/// Button lock after an advance
pub const ADVANCE_DELAY: f32 = 0.3;
/// Lock multiplier once the window reaches the end of the list
pub const NEAR_END_DELAY_FACTOR: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceLabel {
    Next,
    OpenFullPlaylist,
}

impl AdvanceLabel {
    pub fn text(self) -> &'static str {
        match self {
            AdvanceLabel::Next => "Next",
            AdvanceLabel::OpenFullPlaylist => "Open full playlist",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Moved,
    /// The end was reached; the caller should open the whole playlist
    OpenPlaylist,
    /// Locked or already at the edge
    Ignored,
}

/// Fixed-size window over the tile list with debounced advancing
#[derive(Debug, Clone)]
pub struct TilePager {
    window: usize,
    start: usize,
    lock: Countdown,
}

impl TilePager {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            start: 0,
            lock: Countdown::new(ADVANCE_DELAY),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn is_visible(&self, index: usize) -> bool {
        index >= self.start && index < self.start + self.window
    }

    /// The last tile is in view
    pub fn at_end(&self, len: usize) -> bool {
        self.start + self.window >= len
    }

    /// One advance or less away from the end
    pub fn near_end(&self, len: usize) -> bool {
        self.start + self.window + 1 >= len
    }

    pub fn label(&self, len: usize) -> AdvanceLabel {
        if self.at_end(len) {
            AdvanceLabel::OpenFullPlaylist
        } else {
            AdvanceLabel::Next
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_active()
    }

    /// Current lock length, in seconds
    pub fn lock_duration(&self) -> f32 {
        self.lock.duration()
    }

    pub fn advance(&mut self, len: usize) -> PagerAction {
        if self.is_locked() {
            return PagerAction::Ignored;
        }

        if self.at_end(len) {
            self.lock.start_with(ADVANCE_DELAY * NEAR_END_DELAY_FACTOR);
            return PagerAction::OpenPlaylist;
        }

        self.start += 1;
        let delay = if self.near_end(len) {
            ADVANCE_DELAY * NEAR_END_DELAY_FACTOR
        } else {
            ADVANCE_DELAY
        };
        self.lock.start_with(delay);
        PagerAction::Moved
    }

    pub fn retreat(&mut self) -> PagerAction {
        if self.start == 0 {
            return PagerAction::Ignored;
        }
        self.start -= 1;
        PagerAction::Moved
    }

    pub fn tick(&mut self, delta: f32) {
        self.lock.tick(delta);
    }
}
