use crate::runner::DEFAULT_TIMEOUT;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

/// What to do when PDF→SVG conversion fails after a successful compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgFailurePolicy {
    /// Keep the result successful and report `svgError`/`svgDetail` next to the PDF.
    #[default]
    Degrade,
    /// Report the whole compile as failed.
    Fail,
}

/// Settings shared by every compile a [`Compiler`](crate::Compiler) runs.
///
/// Deserializes from a table where every key is optional; `timeout_secs`
/// holds the timeout in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Parent directory of the per-request work directories.
    pub work_root: PathBuf,
    #[serde(rename = "timeout_secs", deserialize_with = "duration_from_secs")]
    pub timeout: Duration,
    /// Build driver executable.
    pub latexmk: String,
    /// PDF to SVG converter executable.
    pub dvisvgm: String,
    pub svg_failure: SvgFailurePolicy,
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            work_root: std::env::temp_dir(),
            timeout: DEFAULT_TIMEOUT,
            latexmk: "latexmk".to_string(),
            dvisvgm: "dvisvgm".to_string(),
            svg_failure: SvgFailurePolicy::default(),
        }
    }
}

impl CompilerConfig {
    pub fn with_work_root(mut self, work_root: impl Into<PathBuf>) -> Self {
        self.work_root = work_root.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_latexmk(mut self, program: impl Into<String>) -> Self {
        self.latexmk = program.into();
        self
    }

    pub fn with_dvisvgm(mut self, program: impl Into<String>) -> Self {
        self.dvisvgm = program.into();
        self
    }

    pub fn with_svg_failure(mut self, policy: SvgFailurePolicy) -> Self {
        self.svg_failure = policy;
        self
    }
}
