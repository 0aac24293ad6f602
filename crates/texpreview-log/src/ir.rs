use serde::{Deserialize, Serialize};

/// One `! ...` diagnostic lifted out of an engine log.
///
/// `line` is relative to the snippet the user typed, `raw_line` is the line
/// the engine reported inside the generated source. Both are `None` when the
/// block carried no `l.<N>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogErrorRecord {
    pub message: String,
    pub line: Option<u32>,
    pub raw_line: Option<u32>,
    pub context: String,
}

impl LogErrorRecord {
    /// Key used to drop repeated reports of the same error.
    pub fn dedup_key(&self) -> (Option<u32>, &str) {
        (self.line, self.message.as_str())
    }
}
