use crate::engine::Engine;
use serde::{Serialize, Serializer};
use std::fmt;
use texpreview_log::LogErrorRecord;

/// Classification of a failed compile, serialized as its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    #[serde(rename = "LaTeX error")]
    Latex,
    #[serde(rename = "SVG conversion error")]
    SvgConversion,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Latex => f.write_str("LaTeX error"),
            FailureKind::SvgConversion => f.write_str("SVG conversion error"),
        }
    }
}

/// The document did not build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileFailure {
    pub error: FailureKind,
    /// Raw engine log, empty if none was written.
    pub log: String,
    pub errors: Vec<LogErrorRecord>,
    /// stderr, else stdout, of the failing command.
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Setup advice for a recognisable toolchain problem, empty otherwise.
    pub hint: String,
    pub cmd: String,
    pub engine: Engine,
}

/// The PDF was built. SVG conversion may still have failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileSuccess {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_error: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_detail: Option<String>,
    pub pdf_base64: String,
    pub log: String,
    /// Recoverable errors found in the log of a zero-exit compile.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<LogErrorRecord>,
    pub engine: Engine,
}

/// Outcome of one compile.
///
/// Serializes as a flat object with an `ok` boolean discriminant followed by
/// the fields of the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileResult {
    Success(CompileSuccess),
    Failure(CompileFailure),
}

impl CompileResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, CompileResult::Success(_))
    }

    /// Errors for a failure, or non-fatal warnings for a success.
    pub fn errors(&self) -> &[LogErrorRecord] {
        match self {
            CompileResult::Success(success) => &success.errors,
            CompileResult::Failure(failure) => &failure.errors,
        }
    }

    pub fn log(&self) -> &str {
        match self {
            CompileResult::Success(success) => &success.log,
            CompileResult::Failure(failure) => &failure.log,
        }
    }

    pub fn as_success(&self) -> Option<&CompileSuccess> {
        match self {
            CompileResult::Success(success) => Some(success),
            CompileResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&CompileFailure> {
        match self {
            CompileResult::Success(_) => None,
            CompileResult::Failure(failure) => Some(failure),
        }
    }
}

impl Serialize for CompileResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a, T> {
            ok: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            CompileResult::Success(body) => Tagged { ok: true, body }.serialize(serializer),
            CompileResult::Failure(body) => Tagged { ok: false, body }.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_success() -> CompileSuccess {
        CompileSuccess {
            svg: None,
            svg_error: Some(FailureKind::SvgConversion),
            svg_detail: Some("gs: not found".into()),
            pdf_base64: "JVBERi0=".into(),
            log: String::new(),
            errors: Vec::new(),
            engine: Engine::LuaLatex,
        }
    }

    #[test]
    fn test_success_serializes_flat_with_ok_true() {
        let json = serde_json::to_value(CompileResult::Success(sample_success())).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["pdfBase64"], "JVBERi0=");
        assert_eq!(json["svgError"], "SVG conversion error");
        assert_eq!(json["svgDetail"], "gs: not found");
        assert_eq!(json["engine"], "lualatex");
        assert!(json.get("svg").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_failure_serializes_flat_with_ok_false() {
        let failure = CompileFailure {
            error: FailureKind::Latex,
            log: "! Oops.".into(),
            errors: vec![LogErrorRecord {
                message: "Oops.".into(),
                line: None,
                raw_line: None,
                context: String::new(),
            }],
            detail: "Latexmk: Errors".into(),
            code: Some(12),
            hint: String::new(),
            cmd: "latexmk input.tex".into(),
            engine: Engine::PdfLatex,
        };
        let json = serde_json::to_value(CompileResult::Failure(failure)).unwrap();

        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "LaTeX error");
        assert_eq!(json["code"], 12);
        assert_eq!(json["hint"], "");
        assert_eq!(json["errors"][0]["message"], "Oops.");
        assert!(json["errors"][0]["rawLine"].is_null());
    }

    #[test]
    fn test_accessors() {
        let result = CompileResult::Success(sample_success());
        assert!(result.is_ok());
        assert!(result.as_failure().is_none());
        assert!(result.errors().is_empty());
    }
}
