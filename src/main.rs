use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;

use go_check::config::{Command, Config, OutputFormat};
use go_check::core::{Diagnostic, LogNotifier, LogOutput, has_errors};
use go_check::lsp::server::serve;
use go_check::watch::GoFileWatcher;
use go_check::{Checker, Toolchain};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Parse configuration from command line and environment
    let (config, command) = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    match command {
        Command::Check { file, format, .. } => {
            let diagnostics = check_file(&config, &file).await?;
            print_diagnostics(&diagnostics, format)?;
            if has_errors(&diagnostics) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Watch { dir, .. } => watch_dir(&config, &dir).await?,
        Command::Serve => serve(config).await?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Run one check cycle with settings resolved for `file`
async fn check_file(config: &Config, file: &Path) -> Result<Vec<Diagnostic>> {
    let settings = config.settings_for(file)?;
    let toolchain = Toolchain::detect(settings.go_root.as_deref(), settings.go_path.as_deref());
    let checker = Checker::new(toolchain, Arc::new(LogNotifier), Arc::new(LogOutput));
    checker.check(file, &settings).await
}

async fn watch_dir(config: &Config, dir: &Path) -> Result<()> {
    let mut watcher = GoFileWatcher::new(dir)?;

    while let Some(batch) = watcher.next_batch().await {
        for file in batch {
            if !file.is_file() {
                continue;
            }
            match check_file(config, &file).await {
                Ok(diagnostics) => print_diagnostics(&diagnostics, OutputFormat::Text)?,
                Err(e) => log::error!("Check of {} failed: {:#}", file.display(), e),
            }
        }
    }

    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for diagnostic in diagnostics {
                println!("{}", diagnostic);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(diagnostics)?),
    }
    Ok(())
}
