//! Remediation hints for broken TeX toolchain setups.
//!
//! The table is ordered and the first matching pattern wins. Patterns are
//! matched against the lowercased concatenation of the failure detail and the
//! engine log.

use once_cell::sync::Lazy;
use regex::Regex;

struct Remedy {
    pattern: Regex,
    hint: &'static str,
}

fn remedy(pattern: &str, hint: &'static str) -> Option<Remedy> {
    match Regex::new(pattern) {
        Ok(pattern) => Some(Remedy { pattern, hint }),
        Err(e) => {
            log::error!("skipping remediation pattern {:?}: {}", pattern, e);
            None
        }
    }
}

static REMEDIES: Lazy<Vec<Remedy>> = Lazy::new(|| {
    [
        remedy(
            r"perl( |:|\bis\b).*not (found|recognized)|'perl' is not recognized",
            "latexmk requires Perl. Install Perl (on Windows: Strawberry Perl, https://strawberryperl.com/) and restart the app.",
        ),
        remedy(
            r"'latexmk' is not recognized|latexmk: command not found",
            "latexmk not found. Ensure the TeX Live or MiKTeX bin directory is on PATH and restart your session.",
        ),
        remedy(
            r"'(lua|xe|pdf)latex' is not recognized|\b(lua|xe|pdf)latex: (command )?not found",
            "LaTeX engine not found. Install the selected engine (LuaLaTeX/XeLaTeX/pdfLaTeX) in your TeX distribution or switch engine.",
        ),
        remedy(
            r"dvisvgm.*(not found|is not recognized)",
            "dvisvgm not found. Install it via your TeX distribution and ensure it is on PATH.",
        ),
        remedy(
            r"ghostscript|gswin64c.*(not found|is not recognized)",
            "Ghostscript not found. Install it from https://www.ghostscript.com/download/ and ensure gs (gswin64c.exe on Windows) is on PATH.",
        ),
        remedy(
            r"luaotfload \| db : font names database not found",
            "LuaTeX is generating its font database on first run. This can take a few minutes; try again after it completes.",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Returns the first hint whose pattern matches `detail` or `log`.
pub fn remediation_hint(detail: &str, log: &str) -> Option<&'static str> {
    let combined = format!("{}\n{}", detail, log).to_lowercase();
    REMEDIES
        .iter()
        .find(|remedy| remedy.pattern.is_match(&combined))
        .map(|remedy| remedy.hint)
}
