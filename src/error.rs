//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum AudioSrError {
    #[error("Audio error: {message}")]
    Audio { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
    #[error("Processing error: {message}")]
    Processing { message: String },
    #[error("External tool error: {message}")]
    Tool { message: String },
    #[error("Lookup error: {message}")]
    Lookup { message: String },
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl AudioSrError {
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
    pub fn processing<S: Into<String>>(msg: S) -> Self { Self::Processing { message: msg.into() } }
    pub fn tool<S: Into<String>>(msg: S) -> Self { Self::Tool { message: msg.into() } }
    pub fn lookup<S: Into<String>>(msg: S) -> Self { Self::Lookup { message: msg.into() } }
    pub fn parse<S: Into<String>>(msg: S) -> Self { Self::Parse { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, AudioSrError>;

impl From<std::io::Error> for AudioSrError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<hound::Error> for AudioSrError {
    fn from(err: hound::Error) -> Self { Self::audio(format!("WAV: {}", err)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = AudioSrError::audio("test");
        assert!(e.to_string().contains("Audio"));

        let e = AudioSrError::lookup("no output directory");
        assert_eq!(e.to_string(), "Lookup error: no output directory");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: AudioSrError = io.into();
        assert!(matches!(e, AudioSrError::Io { .. }));
    }
}
