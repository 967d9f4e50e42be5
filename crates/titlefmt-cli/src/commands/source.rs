//! Script input shared by `check` and `eval`.

use std::fs::read_to_string;
use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Result, miette};

/// Where the script text comes from.
#[derive(Debug, Args)]
pub struct ScriptSource {
    /// Script text
    #[arg(required_unless_present = "file")]
    pub script: Option<String>,

    /// Read the script from a file instead
    #[arg(long, conflicts_with = "script")]
    pub file: Option<PathBuf>,
}

impl ScriptSource {
    /// Returns a display name for diagnostics and the script text.
    ///
    /// A trailing newline in a script file is not part of the script.
    pub fn load(&self) -> Result<(String, String)> {
        if let Some(path) = &self.file {
            let content = read_to_string(path)
                .into_diagnostic()
                .map_err(|e| miette!("Failed to read script file {}: {}", path.display(), e))?;
            let text = content
                .strip_suffix('\n')
                .map(|s| s.strip_suffix('\r').unwrap_or(s))
                .unwrap_or(&content);
            return Ok((path.display().to_string(), text.to_string()));
        }
        match &self.script {
            Some(script) => Ok(("<script>".to_string(), script.clone())),
            None => Err(miette!("no script given")),
        }
    }
}
