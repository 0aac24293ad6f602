//! Wrapping of bare snippets into a compilable document.

use once_cell::sync::Lazy;

/// Marker whose presence means the user pasted a complete document.
pub const DOCUMENT_BEGIN: &str = r"\begin{document}";

/// Preamble placed in front of a bare snippet.
///
/// `standalone` with the `tikz` option crops the page to the drawing.
pub const TEMPLATE_HEADER: &str = r"\documentclass[tikz, border=2pt]{standalone}
% Core packages for TikZ/pgfplots snippets
\usepackage{tikz}
\usetikzlibrary{positioning,calc}
\usepackage{pgfplots}
\pgfplotsset{compat=1.18}
\usepackage{amsmath}
\begin{document}
";

pub const TEMPLATE_FOOTER: &str = "\n\\end{document}\n";

static HEADER_LINE_OFFSET: Lazy<u32> = Lazy::new(|| TEMPLATE_HEADER.matches('\n').count() as u32);

/// Number of lines [`TEMPLATE_HEADER`] puts in front of the user's first line.
pub fn header_line_offset() -> u32 {
    *HEADER_LINE_OFFSET
}

pub fn is_full_document(code: &str) -> bool {
    code.contains(DOCUMENT_BEGIN)
}

/// The `.tex` source handed to the engine, plus the shift between its line
/// numbers and the user's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedSource {
    pub source: String,
    pub offset: u32,
}

/// Wraps `code` in the fixed template unless it already is a full document.
///
/// Full documents pass through untouched with an offset of zero.
pub fn wrap(code: &str) -> WrappedSource {
    if is_full_document(code) {
        return WrappedSource {
            source: code.to_string(),
            offset: 0,
        };
    }

    let mut source = String::with_capacity(TEMPLATE_HEADER.len() + code.len() + TEMPLATE_FOOTER.len());
    source.push_str(TEMPLATE_HEADER);
    source.push_str(code);
    source.push_str(TEMPLATE_FOOTER);

    WrappedSource {
        source,
        offset: header_line_offset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_offset_is_line_count() {
        assert_eq!(header_line_offset(), 8);
        assert_eq!(header_line_offset(), TEMPLATE_HEADER.lines().count() as u32);
    }

    #[test]
    fn test_bare_snippet_is_wrapped() {
        let wrapped = wrap(r"\tikz \draw (0,0) -- (1,1);");

        assert_eq!(wrapped.offset, 8);
        assert!(wrapped.source.starts_with(r"\documentclass[tikz, border=2pt]{standalone}"));
        assert!(wrapped.source.ends_with("\\tikz \\draw (0,0) -- (1,1);\n\\end{document}\n"));
    }

    #[test]
    fn test_user_first_line_lands_after_header() {
        let wrapped = wrap("FIRST\nSECOND");
        let lines: Vec<&str> = wrapped.source.lines().collect();

        // Engine line numbers are 1-based: user line 1 is engine line offset + 1.
        assert_eq!(lines[wrapped.offset as usize], "FIRST");
        assert_eq!(lines[wrapped.offset as usize + 1], "SECOND");
    }

    #[test]
    fn test_full_document_passes_through() {
        let doc = "\\documentclass{article}\n\\begin{document}\nHi\n\\end{document}\n";
        let wrapped = wrap(doc);

        assert_eq!(wrapped.offset, 0);
        assert_eq!(wrapped.source, doc);
    }

    #[test]
    fn test_offset_is_stable_across_inputs() {
        let a = wrap("a");
        let b = wrap("some\nlonger\nsnippet");
        assert_eq!(a.offset, b.offset);
    }
}
