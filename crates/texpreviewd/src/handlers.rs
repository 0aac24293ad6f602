use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use texpreview_build::{CompileRequest, CompileResult, Engine};

/// Body of `POST /api/compile`.
///
/// Older clients send a single `format` string instead of a `formats` list;
/// `formats` wins when both are present.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompileBody {
    pub code: String,
    pub formats: Option<Vec<String>>,
    pub format: Option<String>,
    pub engine: Option<String>,
}

impl CompileBody {
    pub fn into_request(self) -> CompileRequest {
        let mut request = CompileRequest::new(self.code);
        if let Some(formats) = self.formats.or_else(|| self.format.map(|f| vec![f])) {
            request = request.with_formats(formats);
        }
        request.with_engine(self.engine.unwrap_or_else(|| Engine::default().to_string()))
    }
}

pub async fn health() -> &'static str {
    "OK"
}

/// Compiles a snippet. Both successful and failed builds answer 200; only
/// bad input (400) and internal errors (500) use error statuses.
pub async fn compile(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CompileBody>,
) -> Result<Json<CompileResult>, ApiError> {
    let request = body.into_request();
    let result = state.compiler.compile(&request).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> CompileBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = body(r#"{"code": "x"}"#).into_request();
        assert_eq!(request.formats, vec!["svg"]);
        assert_eq!(request.engine, "lualatex");
    }

    #[test]
    fn test_legacy_single_format() {
        let request = body(r#"{"code": "x", "format": "png"}"#).into_request();
        assert_eq!(request.formats, vec!["png"]);
    }

    #[test]
    fn test_formats_list_wins_over_format() {
        let request = body(r#"{"code": "x", "format": "png", "formats": ["svg"]}"#).into_request();
        assert_eq!(request.formats, vec!["svg"]);
    }

    #[test]
    fn test_engine_is_passed_through_unvalidated() {
        let request = body(r#"{"code": "x", "engine": "luatex"}"#).into_request();
        assert_eq!(request.engine, "luatex");
    }

    #[test]
    fn test_missing_code_becomes_empty() {
        assert_eq!(body("{}").into_request().code, "");
    }
}
