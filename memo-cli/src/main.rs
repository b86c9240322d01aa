//! memo-demo: runs the scripted generation and memory walkthrough. Config from env / `.env`.

use anyhow::Result;
use clap::Parser;
use llm_client::{EnvLlmConfig, GeminiLlm};
use memo_cli::{memory_config_from_env, run_demo, Cli};
use memo_core::init_tracing;
use memory_inmemory::VectorMemory;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let llm = GeminiLlm::from_config(&EnvLlmConfig::from_env()?)?;
    let memory_config = memory_config_from_env()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_demo(
        &llm,
        || Ok(VectorMemory::from_config(&memory_config)?),
        &mut out,
    )
    .await
}
