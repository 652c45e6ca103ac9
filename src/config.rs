//! Configuration management for batch super-resolution runs

use crate::error::{AudioSrError, Result};
use crate::processing::tool::DEFAULT_PROGRAM;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_PROCESSED_SUFFIX: &str = "_AudioSR_Processed_48K";
pub const DEFAULT_MODEL_NAME: &str = "basic";
pub const DEFAULT_GUIDANCE_SCALE: f64 = 0.0;
pub const DEFAULT_DDIM_STEPS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input_path: PathBuf,
    #[serde(default)]
    pub tool: ToolConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable name or path of the super-resolution tool
    pub program: PathBuf,
    /// Appended by the tool to every processed file, and used for the combined output
    pub processed_suffix: String,
    /// Stop before combining when the tool exits unsuccessfully
    pub fail_on_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model_name: String,
    pub guidance_scale: f64,
    pub ddim_steps: u32,
    /// Drawn at random when absent (or 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Parent of the workspace directory; the current directory when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,
    /// Workspace directory name; the input's base name when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("input.wav"),
            tool: ToolConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            processed_suffix: DEFAULT_PROCESSED_SUFFIX.to_string(),
            fail_on_error: true,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            ddim_steps: DEFAULT_DDIM_STEPS,
            seed: None,
            workspace_root: None,
            run_id: None,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "applyaudiosr",
    about = "Process a large WAV file with AudioSR by chunking, batch super-resolution and reassembly",
    version
)]
pub struct Args {
    #[arg(long = "waveform-path", help = "The path to the WAV file to be processed")]
    pub waveform_path: PathBuf,

    #[arg(long = "guidance-scale", allow_negative_numbers = true, help = "The guidance scale to be used in AudioSR [default: 0.0]")]
    pub guidance_scale: Option<f64>,

    #[arg(long = "seed", help = "The seed to be used in AudioSR [default: random]")]
    pub seed: Option<u32>,

    #[arg(long = "ddim-steps", help = "The number of DDIM steps to be used in AudioSR [default: 50]")]
    pub ddim_steps: Option<u32>,

    #[arg(long = "model-name", help = "The model name to be used in AudioSR [default: basic]")]
    pub model_name: Option<String>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "tool-program", help = "AudioSR executable name or path [default: audiosr]")]
    pub tool_program: Option<PathBuf>,

    #[arg(long = "workspace-root", help = "Directory that holds the run workspace [default: current directory]")]
    pub workspace_root: Option<PathBuf>,

    #[arg(long = "run-id", help = "Workspace directory name [default: input base name]")]
    pub run_id: Option<String>,

    #[arg(long = "allow-tool-failure", help = "Combine whatever output exists even if AudioSR fails")]
    pub allow_tool_failure: bool,

    #[arg(long = "print-metadata", help = "Print WAV metadata of the input and the combined output")]
    pub print_metadata: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        config.input_path = args.waveform_path;
        if let Some(scale) = args.guidance_scale {
            config.run.guidance_scale = scale;
        }
        if let Some(seed) = args.seed {
            config.run.seed = Some(seed);
        }
        if let Some(steps) = args.ddim_steps {
            config.run.ddim_steps = steps;
        }
        if let Some(model) = args.model_name {
            config.run.model_name = model;
        }
        if let Some(program) = args.tool_program {
            config.tool.program = program;
        }
        if let Some(root) = args.workspace_root {
            config.run.workspace_root = Some(root);
        }
        if let Some(run_id) = args.run_id {
            config.run.run_id = Some(run_id);
        }
        if args.allow_tool_failure {
            config.tool.fail_on_error = false;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AudioSrError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AudioSrError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.run.ddim_steps == 0 {
            return Err(AudioSrError::config("DDIM steps must be greater than 0"));
        }

        if self.run.model_name.trim().is_empty() {
            return Err(AudioSrError::config("Model name cannot be empty"));
        }

        if self.tool.program.as_os_str().is_empty() {
            return Err(AudioSrError::config("Tool program cannot be empty"));
        }

        if self.tool.processed_suffix.is_empty() {
            return Err(AudioSrError::config("Processed suffix cannot be empty"));
        }

        if let Some(run_id) = &self.run.run_id {
            let mut components = Path::new(run_id).components();
            let single = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !single {
                return Err(AudioSrError::config(format!(
                    "Run id {:?} must be a single directory name", run_id
                )));
            }
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AudioSrError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AudioSrError::config(format!("Failed to write config file: {}", e)))
    }

    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}
