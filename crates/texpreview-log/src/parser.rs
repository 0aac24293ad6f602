use crate::ir::LogErrorRecord;
use std::collections::HashSet;

/// Prefix TeX engines put in front of every error report.
pub const ERROR_MARKER: &str = "! ";

/// How many lines after the marker are inspected for context and `l.<N>`.
pub const LOOKAHEAD_LINES: usize = 10;

/// Upper bound (in characters) of [`LogErrorRecord::context`].
pub const CONTEXT_LIMIT: usize = 300;

/// A line-oriented scanner for TeX engine logs.
///
/// `LogParser` walks the log forward, opens a block at every line starting
/// with [`ERROR_MARKER`] and reads at most [`LOOKAHEAD_LINES`] following
/// lines, stopping early at a blank line or at the next marker. Engine line
/// numbers are shifted back by the header offset of the wrapping template so
/// they point into the user's snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogParser {
    header_offset: u32,
}

impl LogParser {
    /// Creates a parser for logs of documents compiled without a wrapper.
    pub fn new() -> Self {
        Self { header_offset: 0 }
    }

    /// Creates a parser that subtracts `header_offset` from every reported line.
    ///
    /// # Arguments
    ///
    /// * `header_offset` - Number of synthetic lines inserted before the user's content.
    pub fn with_offset(header_offset: u32) -> Self {
        Self { header_offset }
    }

    pub fn header_offset(&self) -> u32 {
        self.header_offset
    }

    /// Scans a complete log and returns de-duplicated error records.
    ///
    /// Records keep the order in which they first appear. A later record with
    /// the same `(line, message)` pair as an earlier one is dropped, since
    /// engines repeat the summary of an error while recovering from it.
    ///
    /// # Arguments
    ///
    /// * `input` - The full content of the `.log` file. Empty input yields no records.
    ///
    /// # Returns
    ///
    /// A vector of [`LogErrorRecord`]s; empty for a clean log.
    pub fn parse(&self, input: &str) -> Vec<LogErrorRecord> {
        if input.is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = input.lines().collect();
        let mut records = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let Some(rest) = line.strip_prefix(ERROR_MARKER) else {
                continue;
            };
            records.push(self.read_block(rest, &lines[idx + 1..]));
        }

        dedup(records)
    }

    fn read_block(&self, rest: &str, following: &[&str]) -> LogErrorRecord {
        let message = rest.trim().to_string();
        let mut context = String::new();
        let mut raw_line = None;

        for line in following.iter().take(LOOKAHEAD_LINES) {
            if line.trim().is_empty() || line.starts_with(ERROR_MARKER) {
                break;
            }
            if raw_line.is_none() {
                raw_line = find_line_ref(line);
            }
            if context.chars().count() < CONTEXT_LIMIT {
                if !context.is_empty() {
                    context.push(' ');
                }
                context.push_str(line.trim());
            }
        }

        LogErrorRecord {
            message,
            line: raw_line.map(|raw| self.to_user_line(raw)),
            raw_line,
            context: truncate_chars(context.trim(), CONTEXT_LIMIT),
        }
    }

    /// Maps an engine line number onto the user's snippet, never below line 1.
    pub fn to_user_line(&self, raw_line: u32) -> u32 {
        raw_line.saturating_sub(self.header_offset).max(1)
    }
}

/// Finds the first `l.<N>` reference in `text`.
///
/// The `l` must not be glued to a preceding word character and the digits
/// must not run into a following one, so `\model.3` or `l.12a` are ignored.
/// Word characters are ASCII only: `él.5` still yields 5.
fn find_line_ref(text: &str) -> Option<u32> {
    for (pos, _) in text.match_indices("l.") {
        if text[..pos].chars().next_back().is_some_and(is_word_char) {
            continue;
        }

        let tail = &text[pos + 2..];
        let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        if tail[digits.len()..].chars().next().is_some_and(is_word_char) {
            continue;
        }

        if let Ok(line) = digits.parse::<u32>() {
            return Some(line);
        }
    }
    None
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

fn dedup(records: Vec<LogErrorRecord>) -> Vec<LogErrorRecord> {
    let mut seen: HashSet<(Option<u32>, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let (line, message) = record.dedup_key();
            seen.insert((line, message.to_string()))
        })
        .collect()
}
