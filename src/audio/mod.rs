//! Audio Module
//!
//! WAV reading, writing, frame-exact slicing and concatenation, plus header inspection.

pub mod wav;
pub mod metadata;

pub use wav::{WavAudio, AudioFormat, AudioHeader, AudioData};
pub use metadata::WavMetadata;
