//! `be` — render a `.be` source document to HTML, optionally serving it.
//!
//! Thin wrapper around [`be::api::process`], matching the teacher crate's
//! `src/bin/txxt.rs`: argument parsing and I/O live here, everything else
//! is a pure library call.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use be::api::{process, ProcessArgs};
use be::server;

#[derive(Parser, Debug)]
#[command(name = "be", about = "Render a be document to HTML")]
struct Cli {
    /// Path to the .be source document.
    input: PathBuf,

    /// Path to write the rendered document to.
    #[arg(long, default_value = "out.html")]
    out: PathBuf,

    /// Serve the rendered document over HTTP instead of exiting.
    #[arg(long)]
    serve: bool,

    /// Address to bind when --serve is passed.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Directory of font assets served at /fonts/* when --serve is passed.
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,

    /// Directory of static assets served at /public/* when --serve is passed.
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("be: failed to read {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let file = cli.input.to_str();
    let html = match process(ProcessArgs {
        source: &source,
        file,
    }) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("be: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(&cli.out, &html) {
        eprintln!("be: failed to write {}: {e}", cli.out.display());
        return ExitCode::FAILURE;
    }

    if cli.serve {
        if let Err(e) = server::serve(&html, &cli.fonts_dir, &cli.public_dir, &cli.addr) {
            eprintln!("be: server error: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
