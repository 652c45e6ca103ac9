//! WAV audio file processing

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use hound::{WavReader, WavWriter, SampleFormat};
use ndarray::{Array2, Axis, s};
use crate::error::{AudioSrError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int8,
    Int16,
    Int24,
    Int32,
    Float32,
}

impl AudioFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AudioFormat::Int8 => "int8",
            AudioFormat::Int16 => "int16",
            AudioFormat::Int24 => "int24",
            AudioFormat::Int32 => "int32",
            AudioFormat::Float32 => "float32",
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self {
            AudioFormat::Int8 => 8,
            AudioFormat::Int16 => 16,
            AudioFormat::Int24 => 24,
            AudioFormat::Int32 | AudioFormat::Float32 => 32,
        }
    }

    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample() / 8
    }

    pub fn to_sample_format(self) -> SampleFormat {
        match self {
            AudioFormat::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }

    pub fn from_spec(spec: &hound::WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8) => Ok(AudioFormat::Int8),
            (SampleFormat::Int, 16) => Ok(AudioFormat::Int16),
            (SampleFormat::Int, 24) => Ok(AudioFormat::Int24),
            (SampleFormat::Int, 32) => Ok(AudioFormat::Int32),
            (SampleFormat::Float, 32) => Ok(AudioFormat::Float32),
            (format, bits) => Err(AudioSrError::audio(
                format!("Unsupported sample format: {:?} at {} bits", format, bits)
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: AudioFormat,
    /// Number of frames (one sample per channel)
    pub total_frames: usize,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, format: AudioFormat, total_frames: usize) -> Self {
        let duration = if sample_rate == 0 {
            0.0
        } else {
            total_frames as f64 / sample_rate as f64
        };

        Self {
            sample_rate,
            channels,
            format,
            total_frames,
            duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(AudioSrError::audio("Sample rate cannot be 0"));
        }

        if self.channels == 0 {
            return Err(AudioSrError::audio("Channel count cannot be 0"));
        }

        Ok(())
    }

    /// Two headers can be concatenated when everything but the length matches.
    pub fn is_compatible(&self, other: &AudioHeader) -> bool {
        self.sample_rate == other.sample_rate
            && self.channels == other.channels
            && self.format == other.format
    }

    pub fn to_wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.format.bits_per_sample(),
            sample_format: self.format.to_sample_format(),
        }
    }
}

/// Frame-major sample storage, shape `(frames, channels)`.
///
/// Integer PCM is kept as raw integers so chunking and reassembly never
/// requantize the signal.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioData {
    Int(Array2<i32>),
    Float(Array2<f32>),
}

impl AudioData {
    pub fn len(&self) -> usize {
        match self {
            AudioData::Int(data) => data.nrows(),
            AudioData::Float(data) => data.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> u16 {
        match self {
            AudioData::Int(data) => data.ncols() as u16,
            AudioData::Float(data) => data.ncols() as u16,
        }
    }

    /// Copy of frames `start..end`, clamped to the available length.
    pub fn slice_frames(&self, start: usize, end: usize) -> AudioData {
        let end = end.min(self.len());
        let start = start.min(end);
        match self {
            AudioData::Int(data) => AudioData::Int(data.slice(s![start..end, ..]).to_owned()),
            AudioData::Float(data) => AudioData::Float(data.slice(s![start..end, ..]).to_owned()),
        }
    }

    pub fn concatenate(parts: &[&AudioData]) -> Result<AudioData> {
        let first = parts.first()
            .ok_or_else(|| AudioSrError::audio("Nothing to concatenate"))?;

        match first {
            AudioData::Int(_) => {
                let views = parts.iter()
                    .map(|part| match part {
                        AudioData::Int(data) => Ok(data.view()),
                        AudioData::Float(_) => Err(AudioSrError::audio("Cannot mix integer and float samples")),
                    })
                    .collect::<Result<Vec<_>>>()?;
                let joined = ndarray::concatenate(Axis(0), &views)
                    .map_err(|e| AudioSrError::audio(format!("Failed to concatenate frames: {}", e)))?;
                Ok(AudioData::Int(joined))
            }
            AudioData::Float(_) => {
                let views = parts.iter()
                    .map(|part| match part {
                        AudioData::Float(data) => Ok(data.view()),
                        AudioData::Int(_) => Err(AudioSrError::audio("Cannot mix integer and float samples")),
                    })
                    .collect::<Result<Vec<_>>>()?;
                let joined = ndarray::concatenate(Axis(0), &views)
                    .map_err(|e| AudioSrError::audio(format!("Failed to concatenate frames: {}", e)))?;
                Ok(AudioData::Float(joined))
            }
        }
    }

    fn from_interleaved<T>(samples: Vec<T>, channels: usize) -> Result<Array2<T>> {
        if channels == 0 {
            return Err(AudioSrError::audio("Channel count cannot be 0"));
        }
        if samples.len() % channels != 0 {
            return Err(AudioSrError::audio(format!(
                "Sample count {} is not a multiple of channel count {}",
                samples.len(), channels
            )));
        }

        let frames = samples.len() / channels;
        Array2::from_shape_vec((frames, channels), samples)
            .map_err(|e| AudioSrError::audio(format!("Invalid sample layout: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub data: AudioData,
}

impl WavAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| AudioSrError::Audio {
                message: format!("Cannot open audio file {}: {}", path.display(), e)
            })?;

        let mut reader = WavReader::new(BufReader::new(file))
            .map_err(|e| AudioSrError::Audio {
                message: format!("Cannot read WAV file {}: {}", path.display(), e)
            })?;

        let spec = reader.spec();
        let format = AudioFormat::from_spec(&spec)?;
        let channels = spec.channels as usize;

        let data = match format {
            AudioFormat::Float32 => {
                let samples = reader.samples::<f32>()
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| AudioSrError::Audio {
                        message: format!("Failed to read sample from {}: {}", path.display(), e)
                    })?;
                AudioData::Float(AudioData::from_interleaved(samples, channels)?)
            }
            _ => {
                let samples = reader.samples::<i32>()
                    .collect::<std::result::Result<Vec<i32>, _>>()
                    .map_err(|e| AudioSrError::Audio {
                        message: format!("Failed to read sample from {}: {}", path.display(), e)
                    })?;
                AudioData::Int(AudioData::from_interleaved(samples, channels)?)
            }
        };

        let header = AudioHeader::new(spec.sample_rate, spec.channels, format, data.len());
        header.validate()?;

        Ok(WavAudio { header, data })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AudioSrError::Audio {
                    message: format!("Cannot create output directory: {}", e)
                })?;
        }

        let mut writer = WavWriter::create(path, self.header.to_wav_spec())
            .map_err(|e| AudioSrError::Audio {
                message: format!("Cannot create output file {}: {}", path.display(), e)
            })?;

        match &self.data {
            AudioData::Int(data) => {
                for &sample in data.iter() {
                    writer.write_sample(sample)?;
                }
            }
            AudioData::Float(data) => {
                for &sample in data.iter() {
                    writer.write_sample(sample)?;
                }
            }
        }

        writer.finalize()
            .map_err(|e| AudioSrError::Audio {
                message: format!("Failed to finalize WAV writing: {}", e)
            })?;

        Ok(())
    }

    pub fn new_int(sample_rate: u32, format: AudioFormat, data: Array2<i32>) -> Result<Self> {
        if format == AudioFormat::Float32 {
            return Err(AudioSrError::audio("Integer samples need an integer format"));
        }
        let header = AudioHeader::new(sample_rate, data.ncols() as u16, format, data.nrows());
        header.validate()?;

        Ok(WavAudio { header, data: AudioData::Int(data) })
    }

    pub fn new_float(sample_rate: u32, data: Array2<f32>) -> Result<Self> {
        let header = AudioHeader::new(sample_rate, data.ncols() as u16, AudioFormat::Float32, data.nrows());
        header.validate()?;

        Ok(WavAudio { header, data: AudioData::Float(data) })
    }

    pub fn data(&self) -> &AudioData {
        &self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn total_frames(&self) -> usize {
        self.header.total_frames
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    pub fn duration_ms(&self) -> f64 {
        self.header.duration * 1000.0
    }

    pub fn format(&self) -> AudioFormat {
        self.header.format
    }

    /// Whole frames covered by `ms` milliseconds at this sample rate (rounded down).
    pub fn frames_for_ms(&self, ms: u64) -> usize {
        (ms as u128 * self.sample_rate() as u128 / 1000) as usize
    }

    pub fn slice_frames(&self, start: usize, end: usize) -> WavAudio {
        let data = self.data.slice_frames(start, end);
        let header = AudioHeader::new(self.sample_rate(), self.channels(), self.format(), data.len());
        WavAudio { header, data }
    }

    /// Drop the last `ms` milliseconds. Audio shorter than that becomes empty.
    pub fn trim_tail_ms(&self, ms: u64) -> WavAudio {
        let keep = self.total_frames().saturating_sub(self.frames_for_ms(ms));
        self.slice_frames(0, keep)
    }

    /// Join clips end to end. Every clip must share sample rate, channel count and format.
    pub fn concatenate(parts: &[WavAudio]) -> Result<WavAudio> {
        let first = parts.first()
            .ok_or_else(|| AudioSrError::audio("Nothing to concatenate"))?;

        if let Some((index, odd)) = parts.iter().enumerate().find(|(_, p)| !p.header.is_compatible(&first.header)) {
            return Err(AudioSrError::audio(format!(
                "Clip {} has format {}Hz/{}ch/{} but expected {}Hz/{}ch/{}",
                index,
                odd.sample_rate(), odd.channels(), odd.format().name(),
                first.sample_rate(), first.channels(), first.format().name()
            )));
        }

        let data = AudioData::concatenate(&parts.iter().map(|p| &p.data).collect::<Vec<_>>())?;
        let header = AudioHeader::new(first.sample_rate(), first.channels(), first.format(), data.len());

        Ok(WavAudio { header, data })
    }

    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;

        if self.data.len() != self.header.total_frames {
            return Err(AudioSrError::audio(
                format!("Data length mismatch: header shows {} frames, actual {} frames",
                       self.header.total_frames, self.data.len())
            ));
        }

        if self.data.channels() != self.header.channels {
            return Err(AudioSrError::audio(
                format!("Channel count mismatch: header shows {} channels, actual {} channels",
                       self.header.channels, self.data.channels())
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ramp(frames: usize, channels: usize) -> Array2<i32> {
        Array2::from_shape_fn((frames, channels), |(i, c)| (i as i32 % 30000) * if c == 0 { 1 } else { -1 })
    }

    #[test]
    fn test_audio_format() {
        assert_eq!(AudioFormat::Int16.name(), "int16");
        assert_eq!(AudioFormat::Int16.bytes_per_sample(), 2);
        assert_eq!(AudioFormat::Int24.bytes_per_sample(), 3);
        assert_eq!(AudioFormat::Float32.name(), "float32");
        assert_eq!(AudioFormat::Float32.bytes_per_sample(), 4);
    }

    #[test]
    fn test_audio_header_creation() {
        let header = AudioHeader::new(16000, 1, AudioFormat::Float32, 1000);
        assert_eq!(header.sample_rate, 16000);
        assert_eq!(header.channels, 1);
        assert_eq!(header.total_frames, 1000);
        assert!((header.duration - 0.0625).abs() < f64::EPSILON);
        assert_eq!(header.to_wav_spec().bits_per_sample, 32);
    }

    #[test]
    fn test_audio_header_validation() {
        assert!(AudioHeader::new(16000, 1, AudioFormat::Int16, 1000).validate().is_ok());
        assert!(AudioHeader::new(16000, 1, AudioFormat::Int16, 0).validate().is_ok());
        assert!(AudioHeader::new(0, 1, AudioFormat::Int16, 1000).validate().is_err());
        assert!(AudioHeader::new(16000, 0, AudioFormat::Int16, 1000).validate().is_err());
    }

    #[test]
    fn test_frames_for_ms() {
        let audio = WavAudio::new_int(44100, AudioFormat::Int16, ramp(10, 1)).unwrap();
        assert_eq!(audio.frames_for_ms(5000), 220500);
        assert_eq!(audio.frames_for_ms(35), 1543);

        let audio = WavAudio::new_int(48000, AudioFormat::Int16, ramp(10, 1)).unwrap();
        assert_eq!(audio.frames_for_ms(35), 1680);
    }

    #[test]
    fn test_slice_and_trim() {
        let audio = WavAudio::new_int(1000, AudioFormat::Int16, ramp(100, 2)).unwrap();

        let middle = audio.slice_frames(10, 30);
        assert_eq!(middle.total_frames(), 20);
        assert_eq!(middle.channels(), 2);
        match middle.data() {
            AudioData::Int(d) => {
                assert_eq!(d[[0, 0]], 10);
                assert_eq!(d[[0, 1]], -10);
            }
            _ => panic!("expected integer samples"),
        }

        assert_eq!(audio.trim_tail_ms(35).total_frames(), 65);
        assert_eq!(audio.trim_tail_ms(500).total_frames(), 0);
        assert_eq!(audio.slice_frames(90, 200).total_frames(), 10);
    }

    #[test]
    fn test_concatenate() {
        let a = WavAudio::new_int(1000, AudioFormat::Int16, ramp(5, 1)).unwrap();
        let b = WavAudio::new_int(1000, AudioFormat::Int16, ramp(7, 1)).unwrap();
        let joined = WavAudio::concatenate(&[a.clone(), b]).unwrap();
        assert_eq!(joined.total_frames(), 12);
        assert!(joined.validate().is_ok());

        let other_rate = WavAudio::new_int(2000, AudioFormat::Int16, ramp(5, 1)).unwrap();
        assert!(WavAudio::concatenate(&[a.clone(), other_rate]).is_err());

        let stereo = WavAudio::new_int(1000, AudioFormat::Int16, ramp(5, 2)).unwrap();
        assert!(WavAudio::concatenate(&[a, stereo]).is_err());

        assert!(WavAudio::concatenate(&[]).is_err());
    }

    #[test]
    fn test_int16_file_is_bit_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.wav");

        let original = WavAudio::new_int(22050, AudioFormat::Int16, ramp(2205, 2)).unwrap();
        original.save_to_file(&path).unwrap();

        let loaded = WavAudio::from_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_float_file_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("float.wav");

        let data = Array2::from_shape_vec((4, 1), vec![0.1f32, -0.2, 0.3, -0.4]).unwrap();
        WavAudio::new_float(16000, data).unwrap().save_to_file(&path).unwrap();

        let loaded = WavAudio::from_file(&path).unwrap();
        assert_eq!(loaded.format(), AudioFormat::Float32);
        assert_eq!(loaded.total_frames(), 4);
    }

    #[test]
    fn test_missing_file_is_audio_error() {
        let result = WavAudio::from_file("/definitely/not/here.wav");
        assert!(matches!(result, Err(AudioSrError::Audio { .. })));
    }

    #[test]
    fn test_invalid_file_is_audio_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bogus.wav");
        std::fs::write(&path, b"not a wav file").unwrap();
        assert!(matches!(WavAudio::from_file(&path), Err(AudioSrError::Audio { .. })));
    }
}
