//! # texpreview log scanner
//!
//! Turns the raw `.log` written by a TeX engine (pdfTeX, XeTeX, LuaTeX) into
//! a short list of [`LogErrorRecord`](ir::LogErrorRecord)s whose line numbers
//! point into the snippet the user typed rather than into the generated
//! document.
//!
//! ## Overview
//!
//! TeX reports an error as a line starting with `! `, followed by a few lines
//! of context, one of which usually carries an `l.<N>` reference to the
//! offending source line:
//!
//! ```text
//! ! Undefined control sequence.
//! l.12 \foo
//!
//! ```
//!
//! The scanner is a plain forward walk over the lines. For every marker it
//! looks ahead a bounded number of lines, picks up the first `l.<N>`, and
//! collects a trimmed excerpt for display. The template header offset is
//! subtracted from `N` (clamped to line 1), and repeated `(line, message)`
//! pairs are dropped so recovery summaries do not show up twice.
//!
//! A log without any `! ` line is a clean compile and produces no records.
//!
//! ## Examples
//!
//! ```
//! use texpreview_log::LogParser;
//!
//! let log = "! Undefined control sequence.\nl.12 \\foo\n";
//! let records = LogParser::with_offset(8).parse(log);
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].message, "Undefined control sequence.");
//! assert_eq!(records[0].line, Some(4));
//! assert_eq!(records[0].raw_line, Some(12));
//! ```
//!
//! ### Exporting to JSON
//!
//! Records serialize with camelCase keys (`rawLine`), matching the compile
//! endpoint's response shape:
//!
//! ```no_run
//! use texpreview_log::LogParser;
//! use std::fs;
//!
//! let log = fs::read_to_string("input.log")?;
//! let records = LogParser::new().parse(&log);
//! println!("{}", serde_json::to_string_pretty(&records)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Error record type shared with the compile pipeline.
pub mod ir;
/// Line-oriented log scanner.
pub mod parser;


pub use ir::LogErrorRecord;
pub use parser::LogParser;

/// Scans `log` with the given template header offset.
///
/// Shorthand for `LogParser::with_offset(header_offset).parse(log)`.
pub fn parse_log(log: &str, header_offset: u32) -> Vec<LogErrorRecord> {
    LogParser::with_offset(header_offset).parse(log)
}
