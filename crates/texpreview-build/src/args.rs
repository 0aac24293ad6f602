//! Command-line/environment flags for [`CompilerConfig`], shared by the binaries.

use crate::config::{CompilerConfig, SvgFailurePolicy};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, clap::Args)]
pub struct ToolchainArgs {
    /// Directory under which per-request work directories are created [default: system temp dir]
    #[arg(long, env = "TEXPREVIEW_WORK_ROOT", value_name = "DIR")]
    pub work_root: Option<PathBuf>,

    /// Wall-clock limit for each external command, in seconds
    #[arg(long, env = "TEXPREVIEW_TIMEOUT_SECS", default_value_t = 60, value_name = "SECS")]
    pub timeout_secs: u64,

    /// latexmk executable
    #[arg(long, env = "TEXPREVIEW_LATEXMK", default_value = "latexmk")]
    pub latexmk: String,

    /// dvisvgm executable
    #[arg(long, env = "TEXPREVIEW_DVISVGM", default_value = "dvisvgm")]
    pub dvisvgm: String,

    /// Treat a failed SVG conversion as a failed compile
    #[arg(long, env = "TEXPREVIEW_STRICT_SVG")]
    pub strict_svg: bool,
}

impl ToolchainArgs {
    pub fn to_config(&self) -> CompilerConfig {
        let mut config = CompilerConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_latexmk(&self.latexmk)
            .with_dvisvgm(&self.dvisvgm);
        if let Some(root) = &self.work_root {
            config = config.with_work_root(root);
        }
        if self.strict_svg {
            config = config.with_svg_failure(SvgFailurePolicy::Fail);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        toolchain: ToolchainArgs,
    }

    #[test]
    fn test_defaults_match_compiler_config() {
        let cli = TestCli::parse_from(["test"]);
        let config = cli.toolchain.to_config();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.latexmk, "latexmk");
        assert_eq!(config.svg_failure, SvgFailurePolicy::Degrade);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--work-root",
            "/var/tmp/previews",
            "--timeout-secs",
            "5",
            "--dvisvgm",
            "/opt/tex/bin/dvisvgm",
            "--strict-svg",
        ]);
        let config = cli.toolchain.to_config();

        assert_eq!(config.work_root, PathBuf::from("/var/tmp/previews"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.dvisvgm, "/opt/tex/bin/dvisvgm");
        assert_eq!(config.svg_failure, SvgFailurePolicy::Fail);
    }
}
