//! Frame timing.
//!
//! - `FrameClock::tick()` once per presented frame yields a `FrameTime`
//! - `FpsCounter` turns ticks into a once-per-second ms/frame report

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
