//! Artifact naming: base names, chunk filenames and processed-output ordering

use std::path::{Path, PathBuf};
use crate::error::{AudioSrError, Result};

/// Text before the first `.` of the file name, so `track.v2.wav` gives `track`.
pub fn base_name<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let file_name = path.file_name()
        .map(|name| name.to_string_lossy())
        .ok_or_else(|| AudioSrError::config(format!(
            "Cannot derive a base name from {}", path.display()
        )))?;

    let stem = file_name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return Err(AudioSrError::config(format!(
            "File name {} has an empty base name", file_name
        )));
    }

    Ok(stem.to_string())
}

/// `{index}_{base}_chunk.wav`, with `index` starting at 1.
pub fn chunk_filename(index: usize, base_name: &str) -> String {
    format!("{}_{}_chunk.wav", index, base_name)
}

pub fn combined_filename(base_name: &str, suffix: &str) -> String {
    format!("{}{}.wav", base_name, suffix)
}

/// Sort key of a processed output file.
///
/// Primary: the integer before the first `_` (the chunk index). Secondary: the
/// digits of the last `_`-separated segment before its extension, or 0 when
/// that segment has none.
pub fn output_sort_key(file_name: &str) -> Result<(u64, u64)> {
    let leading = file_name.split('_').next().unwrap_or_default();
    let primary = leading.parse::<u64>()
        .map_err(|_| AudioSrError::parse(format!(
            "Output file {} does not start with a chunk index", file_name
        )))?;

    let last_segment = file_name.rsplit('_').next().unwrap_or(file_name);
    let last_stem = last_segment.split('.').next().unwrap_or_default();
    let digits: String = last_stem.chars().filter(char::is_ascii_digit).collect();
    let secondary = if digits.is_empty() {
        0
    } else {
        digits.parse::<u64>()
            .map_err(|e| AudioSrError::parse(format!(
                "Output file {} has an unusable trailing number: {}", file_name, e
            )))?
    };

    Ok((primary, secondary))
}

/// Order processed output paths by [`output_sort_key`] of their file names.
pub fn sort_outputs(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut keyed = paths.into_iter()
        .map(|path| {
            let name = path.file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| AudioSrError::parse(format!(
                    "Output path {} has no usable file name", path.display()
                )))?;
            Ok((output_sort_key(name)?, path))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}
