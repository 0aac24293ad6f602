use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use texpreview_build::args::ToolchainArgs;
use texpreview_build::{CompileRequest, CompileResult, Compiler, LogErrorRecord};
use texpreview_log::LogParser;

#[derive(Parser)]
#[command(name = "texpreview")]
#[command(about = "Compile LaTeX/TikZ snippets and inspect TeX logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a TeX log file and emit its errors as JSON
    Parse {
        /// Path to the .log file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Template lines to subtract from reported line numbers
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Compile a snippet or full document
    Compile {
        /// Source file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// lualatex, pdflatex or xelatex
        #[arg(long, default_value = "lualatex")]
        engine: String,

        /// Requested output formats (repeatable)
        #[arg(long = "format", default_value = "svg")]
        formats: Vec<String>,

        /// Directory the SVG and PDF are written to
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Print the full result as JSON instead of writing files
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        toolchain: ToolchainArgs,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { path, offset } => {
            let content = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let errors = LogParser::with_offset(offset).parse(&String::from_utf8_lossy(&content));
            println!("{}", serde_json::to_string_pretty(&errors)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compile {
            input,
            engine,
            formats,
            out,
            json,
            toolchain,
        } => {
            let code = read_input(&input)?;
            let request = CompileRequest::new(code).with_engine(engine).with_formats(formats);
            let compiler = Compiler::new(toolchain.to_config());
            let result = compiler.compile(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                report(&result, &out)?;
            }

            Ok(if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("failed to read source from stdin")?;
        Ok(code)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

fn report(result: &CompileResult, out: &Path) -> Result<()> {
    match result {
        CompileResult::Success(success) => {
            fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

            let pdf = BASE64
                .decode(&success.pdf_base64)
                .context("compiler returned malformed PDF data")?;
            let pdf_path = out.join("output.pdf");
            fs::write(&pdf_path, pdf)?;
            eprintln!("wrote {}", pdf_path.display());

            if let Some(svg) = &success.svg {
                let svg_path = out.join("output.svg");
                fs::write(&svg_path, svg)?;
                eprintln!("wrote {}", svg_path.display());
            }
            if let (Some(kind), Some(detail)) = (&success.svg_error, &success.svg_detail) {
                eprintln!("warning: {}: {}", kind, detail.trim());
            }
            print_diagnostics(&success.errors);
        }
        CompileResult::Failure(failure) => {
            eprintln!("{} (`{}`)", failure.error, failure.cmd);
            print_diagnostics(&failure.errors);
            if failure.errors.is_empty() {
                eprintln!("{}", failure.detail.trim());
            }
            if !failure.hint.is_empty() {
                eprintln!("hint: {}", failure.hint);
            }
        }
    }
    Ok(())
}

fn print_diagnostics(errors: &[LogErrorRecord]) {
    for record in errors {
        match record.line {
            Some(line) => eprintln!("{}: {}", line, record.message),
            None => eprintln!("?: {}", record.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_no_offset() {
        let cli = Cli::try_parse_from(["texpreview", "parse", "input.log"]).unwrap();
        match cli.command {
            Commands::Parse { path, offset } => {
                assert_eq!(path, PathBuf::from("input.log"));
                assert_eq!(offset, 0);
            }
            _ => panic!("expected parse"),
        }
    }

    #[test]
    fn test_compile_flags() {
        let cli = Cli::try_parse_from([
            "texpreview", "compile", "-", "--engine", "xelatex", "--format", "svg", "--format", "png",
            "--out", "build", "--timeout-secs", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Compile {
                input,
                engine,
                formats,
                out,
                json,
                toolchain,
            } => {
                assert_eq!(input, "-");
                assert_eq!(engine, "xelatex");
                assert_eq!(formats, vec!["svg", "png"]);
                assert_eq!(out, PathBuf::from("build"));
                assert!(!json);
                assert_eq!(toolchain.timeout_secs, 5);
            }
            _ => panic!("expected compile"),
        }
    }

    #[test]
    fn test_compile_defaults_to_svg() {
        let cli = Cli::try_parse_from(["texpreview", "compile", "fig.tex", "--json"]).unwrap();
        match cli.command {
            Commands::Compile { formats, json, .. } => {
                assert_eq!(formats, vec!["svg"]);
                assert!(json);
            }
            _ => panic!("expected compile"),
        }
    }
}
