//! External super-resolution tool invocation

use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use crate::error::{AudioSrError, Result};

pub const DEFAULT_PROGRAM: &str = "audiosr";

/// Everything the tool is told about one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub manifest_path: PathBuf,
    pub output_dir: PathBuf,
    pub suffix: String,
    pub model_name: String,
    pub guidance_scale: f64,
    pub seed: u32,
    pub ddim_steps: u32,
}

impl ToolInvocation {
    /// Command-line arguments, in the order the tool documents them.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-il".to_string(),
            self.manifest_path.to_string_lossy().into_owned(),
            "-s".to_string(),
            self.output_dir.to_string_lossy().into_owned(),
            "--suffix".to_string(),
            self.suffix.clone(),
            "--model".to_string(),
            self.model_name.clone(),
            "-gs".to_string(),
            format_float(self.guidance_scale),
            "--seed".to_string(),
            self.seed.to_string(),
            "--ddim_steps".to_string(),
            self.ddim_steps.to_string(),
        ]
    }
}

/// Floats always carry a decimal point (`0.0`, `3.5`), as the tool's parser expects.
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// How the tool process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl ToolOutcome {
    pub fn succeeded() -> Self {
        Self { exit_code: Some(0), success: true }
    }

    pub fn failed(exit_code: Option<i32>) -> Self {
        Self { exit_code, success: false }
    }
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// A batch super-resolution backend. Runs once per pipeline and blocks until done.
pub trait ExternalTool: fmt::Debug {
    fn name(&self) -> &str;

    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome>;
}

/// The `audiosr` command-line program, run as a blocking child process.
///
/// The child inherits stdout and stderr so its progress output reaches the
/// terminal. There is no timeout.
#[derive(Debug, Clone)]
pub struct AudioSrCommand {
    program: PathBuf,
}

impl AudioSrCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl Default for AudioSrCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ExternalTool for AudioSrCommand {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or(DEFAULT_PROGRAM)
    }

    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome> {
        let args = invocation.to_args();
        log::debug!("Running: {} {}", self.program.display(), args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| AudioSrError::tool(format!(
                "Failed to launch {}: {}", self.program.display(), e
            )))?;
        log::debug!("{} exited: {}", self.program.display(), status);

        if status.success() {
            Ok(ToolOutcome::succeeded())
        } else {
            Ok(ToolOutcome::failed(status.code()))
        }
    }
}
