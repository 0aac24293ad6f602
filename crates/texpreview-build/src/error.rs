use thiserror::Error;

/// Failures the compile pipeline does not turn into a [`CompileResult`](crate::CompileResult).
///
/// Toolchain errors are data, not `Err`: they come back as
/// `CompileResult::Failure`. Only bad input and unexpected internal errors
/// surface here.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The snippet was empty or whitespace only. No work directory was created.
    #[error("Missing LaTeX code")]
    EmptySource,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
