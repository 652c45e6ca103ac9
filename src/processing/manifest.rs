//! Chunk manifest: the input list handed to the external tool

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{AudioSrError, Result};

pub const MANIFEST_FILENAME: &str = "manifest.txt";

/// One chunk path per line, in chunk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkManifest {
    path: PathBuf,
    entries: Vec<PathBuf>,
}

impl ChunkManifest {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), entries: Vec::new() }
    }

    pub fn push<P: Into<PathBuf>>(&mut self, chunk_path: P) {
        self.entries.push(chunk_path.into());
    }

    pub fn write(&self) -> Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.to_string_lossy());
            content.push('\n');
        }

        fs::write(&self.path, content)
            .map_err(|e| AudioSrError::io(format!(
                "Failed to write manifest {}: {}", self.path.display(), e
            )))
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AudioSrError::io(format!(
                "Failed to read manifest {}: {}", path.display(), e
            )))?;

        Ok(Self {
            path: path.to_path_buf(),
            entries: content.lines()
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
                .collect(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
