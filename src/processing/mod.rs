//! Chunked Super-Resolution Pipeline

pub mod chunker;
pub mod manifest;
pub mod naming;
pub mod processor;
pub mod tool;
pub mod workspace;

pub use chunker::{ChunkSpan, CHUNK_DURATION_MS};
pub use manifest::ChunkManifest;
pub use processor::{ChunkedWaveformProcessor, ProcessingResult, ProcessorState, ARTIFACT_TAIL_MS};
pub use tool::{AudioSrCommand, ExternalTool, ToolInvocation, ToolOutcome};
pub use workspace::Workspace;
