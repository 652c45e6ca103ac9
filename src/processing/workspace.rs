//! Per-run workspace layout
//!
//! ```text
//! {root}/
//!   audio_chunks/
//!     manifest.txt
//!     1_{base}_chunk.wav ...
//!   audiosr_output/
//!     {run dir chosen by the tool}/
//!   {base}{suffix}.wav
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{AudioSrError, Result};
use super::manifest::MANIFEST_FILENAME;
use super::naming::combined_filename;

pub const AUDIO_CHUNKS_DIR_NAME: &str = "audio_chunks";
pub const AUDIOSR_OUTPUT_DIR_NAME: &str = "audiosr_output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn chunks_dir(&self) -> PathBuf {
        self.root.join(AUDIO_CHUNKS_DIR_NAME)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(AUDIOSR_OUTPUT_DIR_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.chunks_dir().join(MANIFEST_FILENAME)
    }

    pub fn combined_output_path(&self, base_name: &str, suffix: &str) -> PathBuf {
        self.root.join(combined_filename(base_name, suffix))
    }

    /// Delete everything under the root, then recreate it empty.
    ///
    /// The tool names its run directory after the wall clock, so starting from
    /// an empty root leaves exactly one run directory to find afterwards.
    pub fn clear(&self) -> Result<()> {
        if self.root.is_dir() {
            fs::remove_dir_all(&self.root)
                .map_err(|e| AudioSrError::io(format!(
                    "Failed to remove workspace {}: {}", self.root.display(), e
                )))?;
        } else if self.root.exists() {
            return Err(AudioSrError::io(format!(
                "Workspace path {} exists and is not a directory", self.root.display()
            )));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| AudioSrError::io(format!(
                "Failed to create workspace {}: {}", self.root.display(), e
            )))?;

        log::debug!("Workspace cleared: {}", self.root.display());
        Ok(())
    }

    /// The single directory the tool created under the output root.
    pub fn locate_output_run_dir(&self) -> Result<PathBuf> {
        let output_dir = self.output_dir();
        let entries = fs::read_dir(&output_dir)
            .map_err(|e| AudioSrError::lookup(format!(
                "Cannot list output directory {}: {}", output_dir.display(), e
            )))?;

        let mut run_dirs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                run_dirs.push(path);
            }
        }

        match run_dirs.len() {
            1 => Ok(run_dirs.remove(0)),
            count => Err(AudioSrError::lookup(format!(
                "Expected exactly one run directory in {}, found {}",
                output_dir.display(), count
            ))),
        }
    }

    /// `*.wav` files directly inside `dir`, in no particular order.
    pub fn list_wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "wav") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let ws = Workspace::new("/work/song");
        assert_eq!(ws.chunks_dir(), PathBuf::from("/work/song/audio_chunks"));
        assert_eq!(ws.output_dir(), PathBuf::from("/work/song/audiosr_output"));
        assert_eq!(ws.manifest_path(), PathBuf::from("/work/song/audio_chunks/manifest.txt"));
        assert_eq!(
            ws.combined_output_path("song", "_done"),
            PathBuf::from("/work/song/song_done.wav")
        );
    }

    #[test]
    fn test_clear_removes_previous_run() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path().join("song"));

        fs::create_dir_all(ws.output_dir().join("2024_01_01_00_00_00")).unwrap();
        fs::write(ws.root().join("stale.wav"), b"old").unwrap();

        ws.clear().unwrap();
        assert!(ws.root().is_dir());
        assert_eq!(fs::read_dir(ws.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path().join("song"));

        ws.clear().unwrap();
        ws.clear().unwrap();
        assert!(ws.root().is_dir());
        assert_eq!(fs::read_dir(ws.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_rejects_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song");
        fs::write(&path, b"not a dir").unwrap();

        let err = Workspace::new(&path).clear().unwrap_err();
        assert!(matches!(err, AudioSrError::Io { .. }));
    }

    #[test]
    fn test_locate_requires_exactly_one_dir() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());

        // Output root missing entirely
        assert!(matches!(ws.locate_output_run_dir(), Err(AudioSrError::Lookup { .. })));

        fs::create_dir_all(ws.output_dir()).unwrap();
        fs::write(ws.output_dir().join("stray.txt"), b"").unwrap();
        assert!(matches!(ws.locate_output_run_dir(), Err(AudioSrError::Lookup { .. })));

        let run = ws.output_dir().join("2024_05_06_07_08_09");
        fs::create_dir(&run).unwrap();
        assert_eq!(ws.locate_output_run_dir().unwrap(), run);

        fs::create_dir(ws.output_dir().join("2024_05_06_07_08_10")).unwrap();
        let err = ws.locate_output_run_dir().unwrap_err();
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_list_wav_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1_a_chunk.wav"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let files = Workspace::list_wav_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("1_a_chunk.wav")]);
    }
}
