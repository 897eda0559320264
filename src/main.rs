//! `deckgen` - generate a slide deck from a JSON configuration.
//!
//! Usage:
//!   `deckgen <config.json> [--out DIR]`
//!
//! Credentials come from the environment or a `.env` file; see
//! [`deckgen::config::Config::load`].

use deckgen::config::Config;
use deckgen::error::{Error, Result};
use deckgen::pptx;
use deckgen::services::assembler::Assembler;
use deckgen::types::PresentationConfig;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Parsed command line.
struct Args {
    config_path: PathBuf,
    out_dir: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json> [--out DIR]")
}

fn parse_args(args: &[String]) -> std::result::Result<Args, String> {
    let program = args.first().map_or("deckgen", String::as_str);
    let mut config_path = None;
    let mut out_dir = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let dir = rest.next().ok_or_else(|| format!("--out needs a directory\n{}", usage(program)))?;
                out_dir = Some(PathBuf::from(dir));
            }
            "--help" | "-h" => return Err(usage(program)),
            _ if config_path.is_none() => config_path = Some(PathBuf::from(arg)),
            other => return Err(format!("Unexpected argument '{other}'\n{}", usage(program))),
        }
    }

    let config_path = config_path.ok_or_else(|| usage(program))?;
    Ok(Args { config_path, out_dir })
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load();
    tracing::debug!("{} {} starting", config.app_name(), config.app_version());

    let raw = fs_err::read_to_string(&args.config_path)
        .map_err(|e| Error::io(e, args.config_path.clone()))?;
    let deck_config: PresentationConfig = serde_json::from_str(&raw)
        .map_err(|e| Error::parse(format!("{}: {e}", args.config_path.display())))?;

    let assembler = Assembler::from_config(&config);
    let presentation = assembler.build(&deck_config).await?;

    let out_dir = args.out_dir.unwrap_or_else(|| config.output_dir.clone());
    let path = pptx::export(&presentation, &out_dir)?;

    println!("Wrote {}", path.display());
    for slide in &presentation.slides {
        let image = if slide.image().is_some() { "image" } else { "no image" };
        println!("  {} {} ({image})", slide.id, slide.title);
    }
    let references = presentation.reference_list().len();
    if references > 0 {
        println!("  + references slide ({references} entries)");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,deckgen=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
