use crate::engine::Engine;
use serde::{Deserialize, Serialize};

fn default_formats() -> Vec<String> {
    vec!["svg".to_string()]
}

fn default_engine() -> String {
    Engine::default().as_str().to_string()
}

/// A compile request exactly as the caller sent it.
///
/// `formats` and `engine` are kept as raw strings; the compiler ignores
/// unknown formats and substitutes the default engine for an unknown name
/// instead of rejecting the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub code: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default = "default_engine")]
    pub engine: String,
}

impl CompileRequest {
    /// A request for `code` with the default formats (`svg`) and engine (`lualatex`).
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            formats: default_formats(),
            engine: default_engine(),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let req: CompileRequest = serde_json::from_str(r#"{"code": "x"}"#).unwrap();
        assert_eq!(req.formats, vec!["svg"]);
        assert_eq!(req.engine, "lualatex");
    }

    #[test]
    fn test_explicit_fields_are_kept_verbatim() {
        let req: CompileRequest =
            serde_json::from_str(r#"{"code": "x", "formats": [], "engine": "luatex"}"#).unwrap();
        assert!(req.formats.is_empty());
        assert_eq!(req.engine, "luatex");
    }

    #[test]
    fn test_builders() {
        let req = CompileRequest::new("x").with_engine("xelatex").with_formats(["svg", "png"]);
        assert_eq!(req.engine, "xelatex");
        assert_eq!(req.formats, vec!["svg", "png"]);
    }
}
