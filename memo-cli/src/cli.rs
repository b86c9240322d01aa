//! CLI parser.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "memo-demo")]
#[command(about = "Gemini generation + vector memory demo", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Also append logs to this file (logs always go to stderr).
    #[arg(long)]
    pub log_file: Option<String>,
}
