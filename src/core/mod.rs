pub mod clock;
pub mod input_adapter;
pub mod timer;

pub use clock::FrameClock;
pub use input_adapter::{InputEvent, WinitInput};
pub use timer::{Countdown, FixedHz};
