//! # texpreview build pipeline
//!
//! Compiles a LaTeX/TikZ snippet into a PDF (and optionally an SVG) with the
//! system TeX toolchain, and turns the engine log into line-accurate
//! diagnostics for the snippet the user actually typed.
//!
//! ## Pipeline
//!
//! ```text
//! snippet ─► template::wrap ─► WorkDir/input.tex ─► latexmk ─┬─► failure: parse log, match hints
//!                                                           └─► dvisvgm (optional, non-fatal)
//!                                                               read input.pdf, parse log for warnings
//! ```
//!
//! Each compile runs in its own [`WorkDir`], a uniquely named directory that
//! is removed when the guard goes out of scope, whatever path the compile
//! took. External commands go through the [`CommandRunner`] trait;
//! [`TokioCommandRunner`] is the production implementation and any other
//! implementation can be plugged in with [`Compiler::with_runner`].
//!
//! ## Outcomes
//!
//! - [`CompileError::EmptySource`]: blank input, rejected up front.
//! - [`CompileResult::Failure`]: the toolchain failed. Carries the log, the
//!   parsed errors, the command's stderr/stdout, its exit code and a
//!   remediation hint when the failure looks like a setup problem.
//! - [`CompileResult::Success`]: the PDF (base64) plus either the SVG text or
//!   an `svgError`/`svgDetail` pair, and any recoverable errors found in the log.
//! - [`CompileError::Internal`]: anything unexpected, such as an unwritable
//!   work root.
//!
//! ## Examples
//!
//! ```no_run
//! use texpreview_build::{CompileRequest, Compiler, CompilerConfig};
//!
//! # async fn run() -> Result<(), texpreview_build::CompileError> {
//! let compiler = Compiler::new(CompilerConfig::default());
//! let request = CompileRequest::new(r"\tikz \draw (0,0) circle (1);").with_engine("pdflatex");
//!
//! let result = compiler.compile(&request).await?;
//! if let Some(success) = result.as_success() {
//!     println!("{} bytes of base64 PDF", success.pdf_base64.len());
//! }
//! for error in result.errors() {
//!     println!("line {:?}: {}", error.line, error.message);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "clap")]
pub mod args;
pub mod artifacts;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod hints;
pub mod request;
pub mod result;
pub mod runner;
pub mod template;

pub use artifacts::WorkDir;
pub use compiler::Compiler;
pub use config::{CompilerConfig, SvgFailurePolicy};
pub use engine::{Engine, OutputFormat};
pub use error::CompileError;
pub use request::CompileRequest;
pub use result::{CompileFailure, CompileResult, CompileSuccess, FailureKind};
pub use runner::{CommandFailure, CommandOutput, CommandRunner, CommandSpec, TokioCommandRunner};
pub use texpreview_log::LogErrorRecord;
