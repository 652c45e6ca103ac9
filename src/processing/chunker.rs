//! Fixed-length chunk windows

use crate::error::{AudioSrError, Result};

/// Longest clip the super-resolution tool accepts.
pub const CHUNK_DURATION_MS: u64 = 5000;

/// A contiguous frame range of the source, `start_frame..end_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    /// 1-based position in the source
    pub index: usize,
    pub start_frame: usize,
    pub end_frame: usize,
}

impl ChunkSpan {
    pub fn len(&self) -> usize {
        self.end_frame - self.start_frame
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `total_frames` into consecutive windows of `window_frames`.
/// The last window may be shorter; empty windows are never produced.
pub fn fixed_windows(total_frames: usize, window_frames: usize) -> Result<Vec<ChunkSpan>> {
    if window_frames == 0 {
        return Err(AudioSrError::processing("Chunk window cannot be 0 frames"));
    }

    let spans = (0..total_frames)
        .step_by(window_frames)
        .enumerate()
        .map(|(i, start)| ChunkSpan {
            index: i + 1,
            start_frame: start,
            end_frame: (start + window_frames).min(total_frames),
        })
        .collect();

    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uneven_split() {
        // 12 s at 1 kHz in 5 s windows
        let spans = fixed_windows(12_000, 5_000).unwrap();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans.iter().map(|s| s.len()).collect::<Vec<_>>(), [5_000, 5_000, 2_000]);
        assert_eq!(spans.iter().map(|s| s.index).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_even_split() {
        let spans = fixed_windows(15_000, 5_000).unwrap();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans.last().unwrap().len(), 5_000);
    }

    #[test]
    fn test_count_is_ceiling() {
        for total in [1usize, 4_999, 5_000, 5_001, 9_999, 10_000, 123_456] {
            let spans = fixed_windows(total, 5_000).unwrap();
            assert_eq!(spans.len(), total.div_ceil(5_000), "total={}", total);
            assert!(spans.iter().all(|s| !s.is_empty()));
            assert_eq!(spans.iter().map(|s| s.len()).sum::<usize>(), total);
            for pair in spans.windows(2) {
                assert_eq!(pair[0].end_frame, pair[1].start_frame);
            }
        }
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(fixed_windows(0, 5_000).unwrap().is_empty());
        assert!(fixed_windows(100, 0).is_err());
    }
}
