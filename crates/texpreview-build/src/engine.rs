use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// TeX engines latexmk is allowed to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    PdfLatex,
    XeLatex,
    #[default]
    LuaLatex,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown engine `{0}`")]
pub struct UnknownEngine(pub String);

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::PdfLatex, Engine::XeLatex, Engine::LuaLatex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::PdfLatex => "pdflatex",
            Engine::XeLatex => "xelatex",
            Engine::LuaLatex => "lualatex",
        }
    }

    /// Parses `name`, substituting the default engine when it is not recognised.
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: UnknownEngine| {
            warn!("{}, falling back to {}", err, Engine::default());
            Engine::default()
        })
    }
}

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Engine::ALL
            .into_iter()
            .find(|engine| engine.as_str() == s)
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary artifacts that can be requested on top of the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
}

impl OutputFormat {
    /// Keeps the recognised names from `names`, in order and without repeats.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Vec<OutputFormat> {
        let mut formats = Vec::new();
        for name in names {
            match name.as_ref() {
                "svg" => {
                    if !formats.contains(&OutputFormat::Svg) {
                        formats.push(OutputFormat::Svg);
                    }
                }
                other => log::debug!("ignoring unsupported output format `{}`", other),
            }
        }
        formats
    }
}
