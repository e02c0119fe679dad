use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    vidmap::logging::init().context("init logging")?;

    let cli = vidmap::cli::Cli::parse();
    // Never log the whole Cli; it carries the password.
    tracing::debug!(course_url = %cli.course_url, format = ?cli.format, "parsed cli");

    vidmap::manifest::run(cli).await.context("map course media")?;

    Ok(())
}
