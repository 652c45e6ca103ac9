//! WAV header inspection

use std::fmt;
use std::path::Path;
use hound::WavReader;
use crate::error::{AudioSrError, Result};

/// Header-level facts about a WAV file, read without decoding samples.
#[derive(Debug, Clone, PartialEq)]
pub struct WavMetadata {
    pub filename: String,
    /// Bytes per sample
    pub sample_width: u16,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u32,
    pub duration_seconds: f64,
}

impl WavMetadata {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)
            .map_err(|e| AudioSrError::audio(format!("Cannot read WAV file {}: {}", path.display(), e)))?;

        let spec = reader.spec();
        let frames = reader.duration();
        let duration_seconds = if spec.sample_rate == 0 {
            0.0
        } else {
            frames as f64 / spec.sample_rate as f64
        };

        Ok(Self {
            filename: path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            sample_width: spec.bits_per_sample.div_ceil(8),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frames,
            duration_seconds,
        })
    }
}

impl fmt::Display for WavMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WAV Metadata")?;
        writeln!(f, "Filename: {}", self.filename)?;
        writeln!(f, "Sample Width: {}", self.sample_width)?;
        writeln!(f, "Sample Rate: {}", self.sample_rate)?;
        writeln!(f, "Number of Channels: {}", self.channels)?;
        writeln!(f, "Number of Frames: {}", self.frames)?;
        write!(f, "Duration: {} seconds", self.duration_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioFormat, WavAudio};
    use ndarray::Array2;
    use tempfile::TempDir;

    #[test]
    fn test_read_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        let data = Array2::<i32>::zeros((24000, 2));
        WavAudio::new_int(48000, AudioFormat::Int16, data).unwrap().save_to_file(&path).unwrap();

        let meta = WavMetadata::read(&path).unwrap();
        assert_eq!(meta.filename, "tone.wav");
        assert_eq!(meta.sample_width, 2);
        assert_eq!(meta.sample_rate, 48000);
        assert_eq!(meta.channels, 2);
        assert_eq!(meta.frames, 24000);
        assert!((meta.duration_seconds - 0.5).abs() < 1e-9);

        let text = meta.to_string();
        assert!(text.starts_with("WAV Metadata"));
        assert!(text.contains("Number of Channels: 2"));
        assert!(text.contains("Duration: 0.5 seconds"));
    }

    #[test]
    fn test_read_missing() {
        assert!(WavMetadata::read("/no/such/file.wav").is_err());
    }
}
