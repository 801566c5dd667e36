use std::time::Instant;

/// Longest delta handed to the simulation, so a stalled window does not
/// collapse every pending transition into one frame
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Frame clock - counts frames and measures the delta between them
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame: 0,
        }
    }

    /// Advance to the next frame, returning the clamped delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.frame += 1;
        delta.min(MAX_FRAME_DELTA)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
