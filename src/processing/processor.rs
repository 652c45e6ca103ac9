//! Chunked super-resolution pipeline
//!
//! clear workspace -> split source into chunks + manifest -> run the external
//! tool once over the manifest -> reorder, trim and join its outputs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use rand::Rng;
use crate::audio::WavAudio;
use crate::config::Config;
use crate::error::{AudioSrError, Result};
use super::chunker::{fixed_windows, CHUNK_DURATION_MS};
use super::manifest::ChunkManifest;
use super::naming::{base_name, chunk_filename, sort_outputs};
use super::tool::{AudioSrCommand, ExternalTool, ToolInvocation, ToolOutcome};
use super::workspace::Workspace;

/// Trailing audio the tool appends to every processed chunk.
pub const ARTIFACT_TAIL_MS: u64 = 35;

pub const SEED_MIN: u32 = 1;
pub const SEED_MAX: u32 = 9_999_999;

/// Pipeline progress. Steps only move forward; a failure leaves the last reached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcessorState {
    Created,
    Cleared,
    Chunked,
    Processed,
    Combined,
}

pub fn generate_seed() -> u32 {
    rand::thread_rng().gen_range(SEED_MIN..=SEED_MAX)
}

#[derive(Debug)]
pub struct ChunkedWaveformProcessor {
    waveform_path: PathBuf,
    base_name: String,
    workspace: Workspace,
    model_name: String,
    guidance_scale: f64,
    seed: u32,
    ddim_steps: u32,
    processed_suffix: String,
    fail_on_error: bool,
    tool: Box<dyn ExternalTool>,
    state: ProcessorState,
    chunk_count: usize,
}

impl ChunkedWaveformProcessor {
    /// Processor that runs the configured tool program.
    pub fn new(config: &Config) -> Result<Self> {
        let tool = AudioSrCommand::new(config.tool.program.clone());
        Self::with_tool(config, Box::new(tool))
    }

    pub fn with_tool(config: &Config, tool: Box<dyn ExternalTool>) -> Result<Self> {
        config.validate()?;

        let waveform_path = config.input_path.clone();
        let base_name = base_name(&waveform_path)?;

        let root = match &config.run.workspace_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let root = std::path::absolute(&root)?;
        let dir_name = config.run.run_id.clone().unwrap_or_else(|| base_name.clone());
        let workspace = Workspace::new(root.join(dir_name));

        // Clearing the workspace must never delete the input.
        let absolute_source = std::path::absolute(&waveform_path)?;
        if absolute_source.starts_with(workspace.root()) {
            return Err(AudioSrError::config(format!(
                "Input {} lies inside its own workspace {}; move it or set a different workspace root or run id",
                waveform_path.display(), workspace.root().display()
            )));
        }

        let seed = match config.run.seed {
            Some(seed) if seed != 0 => seed,
            _ => generate_seed(),
        };

        log::debug!("Workspace for {}: {}", waveform_path.display(), workspace.root().display());

        Ok(Self {
            waveform_path,
            base_name,
            workspace,
            model_name: config.run.model_name.clone(),
            guidance_scale: config.run.guidance_scale,
            seed,
            ddim_steps: config.run.ddim_steps,
            processed_suffix: config.tool.processed_suffix.clone(),
            fail_on_error: config.tool.fail_on_error,
            tool,
            state: ProcessorState::Created,
            chunk_count: 0,
        })
    }

    pub fn clear_workspace(&mut self) -> Result<()> {
        self.workspace.clear()?;
        self.state = ProcessorState::Cleared;
        Ok(())
    }

    /// Split the source into 5 s chunks under the chunk directory and list them,
    /// in order, in the manifest. Returns the manifest path.
    pub fn generate_chunk_manifest(&mut self) -> Result<PathBuf> {
        let chunks_dir = self.workspace.chunks_dir();
        fs::create_dir_all(&chunks_dir)?;

        let audio = WavAudio::from_file(&self.waveform_path)?;
        log::info!("Loaded {}: {:.2}s, {}Hz, {}ch",
                   self.waveform_path.display(), audio.duration(), audio.sample_rate(), audio.channels());

        if audio.total_frames() == 0 {
            return Err(AudioSrError::audio(format!(
                "{} contains no audio", self.waveform_path.display()
            )));
        }

        let spans = fixed_windows(audio.total_frames(), audio.frames_for_ms(CHUNK_DURATION_MS))?;

        let mut manifest = ChunkManifest::new(self.workspace.manifest_path());
        for span in &spans {
            let filename = chunk_filename(span.index, &self.base_name);
            let chunk_path = chunks_dir.join(&filename);
            audio.slice_frames(span.start_frame, span.end_frame).save_to_file(&chunk_path)?;
            log::info!("Created {}", filename);
            manifest.push(chunk_path);
        }
        manifest.write()?;

        self.chunk_count = spans.len();
        self.state = ProcessorState::Chunked;
        Ok(manifest.path().to_path_buf())
    }

    pub fn invocation(&self, manifest_path: &Path) -> ToolInvocation {
        ToolInvocation {
            manifest_path: manifest_path.to_path_buf(),
            output_dir: self.workspace.output_dir(),
            suffix: self.processed_suffix.clone(),
            model_name: self.model_name.clone(),
            guidance_scale: self.guidance_scale,
            seed: self.seed,
            ddim_steps: self.ddim_steps,
        }
    }

    /// Run the tool once over the whole manifest and wait for it to exit.
    ///
    /// An unsuccessful exit is an error unless failures are tolerated, in which
    /// case combination goes ahead with whatever the tool left behind.
    pub fn invoke_external_tool(&mut self, manifest_path: &Path) -> Result<ToolOutcome> {
        let invocation = self.invocation(manifest_path);
        log::info!("Running {} (model={}, guidance_scale={}, seed={}, ddim_steps={})",
                   self.tool.name(), self.model_name, self.guidance_scale, self.seed, self.ddim_steps);

        let outcome = self.tool.run(&invocation)?;
        if !outcome.success {
            if self.fail_on_error {
                return Err(AudioSrError::tool(format!(
                    "{} failed with {}", self.tool.name(), outcome
                )));
            }
            log::warn!("{} failed with {}, combining partial output", self.tool.name(), outcome);
        }

        self.state = ProcessorState::Processed;
        Ok(outcome)
    }

    /// Join the processed chunks in chunk order, minus the artifact tail of each,
    /// into `{workspace}/{base}{suffix}.wav`. Returns the combined file path.
    pub fn combine_outputs(&mut self) -> Result<PathBuf> {
        let run_dir = self.workspace.locate_output_run_dir()?;
        let files = sort_outputs(Workspace::list_wav_files(&run_dir)?)?;
        if files.is_empty() {
            return Err(AudioSrError::lookup(format!(
                "No processed WAV files in {}", run_dir.display()
            )));
        }

        let mut parts = Vec::with_capacity(files.len());
        for file in &files {
            let chunk = WavAudio::from_file(file)?;
            let trimmed = chunk.trim_tail_ms(ARTIFACT_TAIL_MS);
            log::debug!("{}: {} -> {} frames", file.display(), chunk.total_frames(), trimmed.total_frames());
            parts.push(trimmed);
        }

        let combined = WavAudio::concatenate(&parts)?;
        combined.validate()?;
        let output_path = self.workspace.combined_output_path(&self.base_name, &self.processed_suffix);
        combined.save_to_file(&output_path)?;
        log::info!("Combined {} chunks into {} ({:.2}s)",
                   files.len(), output_path.display(), combined.duration());

        self.state = ProcessorState::Combined;
        Ok(output_path)
    }

    /// Run every step in order. The result carries the seed used, generated or not.
    pub fn process(&mut self) -> Result<ProcessingResult> {
        let start_time = Instant::now();

        self.clear_workspace()?;
        let manifest_path = self.generate_chunk_manifest()?;
        let tool_outcome = self.invoke_external_tool(&manifest_path)?;
        let output_path = self.combine_outputs()?;

        Ok(ProcessingResult {
            seed: self.seed,
            output_path,
            chunk_count: self.chunk_count,
            tool_outcome,
            processing_time: start_time.elapsed(),
        })
    }

    pub fn waveform_path(&self) -> &Path {
        &self.waveform_path
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub seed: u32,
    pub output_path: PathBuf,
    pub chunk_count: usize,
    pub tool_outcome: ToolOutcome,
    pub processing_time: Duration,
}
