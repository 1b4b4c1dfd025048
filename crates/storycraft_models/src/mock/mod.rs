//! Deterministic in-process capabilities.

mod media;
mod text;
mod video;

pub use media::{MockImageGenerator, MockMusicGenerator, MockSpeechSynthesizer, MockStitchAssembler};
pub use text::{MockTextGenerator, scenario, storyboard};
pub use video::MockVideoGenerator;
