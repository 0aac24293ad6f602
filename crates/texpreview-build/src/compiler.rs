use crate::artifacts::{LOG_FILE, PDF_FILE, SOURCE_FILE, SVG_FILE, WorkDir};
use crate::config::{CompilerConfig, SvgFailurePolicy};
use crate::engine::{Engine, OutputFormat};
use crate::error::CompileError;
use crate::hints::remediation_hint;
use crate::request::CompileRequest;
use crate::result::{CompileFailure, CompileResult, CompileSuccess, FailureKind};
use crate::runner::{CommandFailure, CommandRunner, CommandSpec, TokioCommandRunner};
use crate::template;
use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use log::{info, warn};
use std::sync::Arc;
use texpreview_log::LogParser;

/// latexmk invocation: PDF mode, forced rebuild, quiet, `engine` run non-interactively.
pub fn latexmk_command(program: &str, engine: Engine) -> CommandSpec {
    CommandSpec::new(program)
        .arg("-pdf")
        .arg(format!("-pdflatex={} -interaction=nonstopmode", engine))
        .arg("-f")
        .arg("-quiet")
        .arg(SOURCE_FILE)
}

/// dvisvgm invocation converting the built PDF with exact bounding boxes and no embedded fonts.
pub fn dvisvgm_command(program: &str) -> CommandSpec {
    CommandSpec::new(program)
        .arg("--no-fonts")
        .arg("--exact")
        .arg("--pdf")
        .arg(format!("--output={}", SVG_FILE))
        .arg(PDF_FILE)
}

/// Runs the wrap → compile → convert → collect pipeline for one snippet.
///
/// A `Compiler` holds no per-request state and can be shared across tasks;
/// every call to [`compile`](Self::compile) gets its own [`WorkDir`].
#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
    runner: Arc<dyn CommandRunner>,
}

impl Compiler {
    /// Creates a compiler that runs the real toolchain with the configured timeout.
    pub fn new(config: CompilerConfig) -> Self {
        let runner = Arc::new(TokioCommandRunner::new(config.timeout));
        Self { config, runner }
    }

    /// Creates a compiler with a custom command runner (useful for testing).
    pub fn with_runner(config: CompilerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles `request` and returns its outcome.
    ///
    /// Toolchain failures are reported as [`CompileResult::Failure`]. An SVG
    /// conversion failure leaves the result successful unless the config asks
    /// for [`SvgFailurePolicy::Fail`].
    ///
    /// # Errors
    ///
    /// [`CompileError::EmptySource`] for a blank snippet (checked before
    /// anything touches the filesystem), [`CompileError::Internal`] for
    /// filesystem errors around the toolchain run.
    pub async fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        if request.code.trim().is_empty() {
            return Err(CompileError::EmptySource);
        }

        let wrapped = template::wrap(&request.code);
        let engine = Engine::resolve(&request.engine);
        let formats = OutputFormat::parse_list(&request.formats);
        info!(
            "compiling with {} (template offset {}, formats {:?})",
            engine, wrapped.offset, formats
        );

        let workdir = WorkDir::create(&self.config.work_root)
            .await
            .context("failed to create work directory")?;
        workdir
            .write_source(&wrapped.source)
            .await
            .context("failed to write LaTeX source")?;

        let parser = LogParser::with_offset(wrapped.offset);
        let build = latexmk_command(&self.config.latexmk, engine);

        if let Err(failure) = self.runner.run(&build, workdir.path()).await {
            let log = workdir.read_text_lossy(LOG_FILE).await;
            let result = failure_record(FailureKind::Latex, &build, &failure, log, &parser, engine);
            info!("compile failed with {} parsed error(s)", result.errors.len());
            return Ok(CompileResult::Failure(result));
        }

        let mut success = CompileSuccess {
            svg: None,
            svg_error: None,
            svg_detail: None,
            pdf_base64: String::new(),
            log: String::new(),
            errors: Vec::new(),
            engine,
        };

        if formats.contains(&OutputFormat::Svg) {
            let convert = dvisvgm_command(&self.config.dvisvgm);
            match self.convert_svg(&convert, &workdir).await {
                Ok(svg) => success.svg = Some(svg),
                Err(failure) => {
                    warn!("SVG conversion failed: {}", failure);
                    if self.config.svg_failure == SvgFailurePolicy::Fail {
                        let log = workdir.read_text_lossy(LOG_FILE).await;
                        let result =
                            failure_record(FailureKind::SvgConversion, &convert, &failure, log, &parser, engine);
                        return Ok(CompileResult::Failure(result));
                    }
                    success.svg_error = Some(FailureKind::SvgConversion);
                    success.svg_detail = Some(failure.detail());
                }
            }
        }

        let pdf = workdir
            .read_bytes(PDF_FILE)
            .await
            .context("compile succeeded but the PDF could not be read")?;
        success.pdf_base64 = BASE64.encode(pdf);

        success.log = workdir.read_text_lossy(LOG_FILE).await;
        success.errors = parser.parse(&success.log);
        info!(
            "compile succeeded ({} non-fatal error(s), svg: {})",
            success.errors.len(),
            success.svg.is_some()
        );

        Ok(CompileResult::Success(success))
    }

    async fn convert_svg(&self, convert: &CommandSpec, workdir: &WorkDir) -> Result<String, CommandFailure> {
        self.runner.run(convert, workdir.path()).await?;
        tokio::fs::read_to_string(workdir.file(SVG_FILE))
            .await
            .map_err(|e| {
                CommandFailure::exited(convert, String::new(), format!("{} was not produced: {}", SVG_FILE, e), None)
            })
    }
}

fn failure_record(
    kind: FailureKind,
    command: &CommandSpec,
    failure: &CommandFailure,
    log: String,
    parser: &LogParser,
    engine: Engine,
) -> CompileFailure {
    let detail = failure.detail();
    let hint = remediation_hint(&detail, &log).unwrap_or_default().to_string();
    CompileFailure {
        error: kind,
        errors: parser.parse(&log),
        log,
        detail,
        code: failure.code,
        hint,
        cmd: command.to_string(),
        engine,
    }
}
