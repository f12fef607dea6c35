use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use devloop::config::Config;
use devloop::msg::Msg;
use devloop::reducer::StartupOptions;
use devloop::runtime::Runtime;
use devloop::state::AppState;
use devloop::ui::{InputAdapter, TerminalFrontend};

#[derive(Parser)]
#[command(name = "devloop", version)]
#[command(about = "Run commands and agent prompts as tracked workflows")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot file; `.yaml`/`.yml` selects YAML, anything else JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Restore the snapshot on start
    #[arg(long)]
    restore: bool,

    /// Log filter, e.g. `debug` or `devloop=trace`
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(path) = args.snapshot {
        config.persistence.snapshot_path = Some(path);
    }
    if args.restore {
        config.persistence.restore_on_start = true;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    let log_file = config.log_file();
    devloop::logging::init_tracing(&config.logging.level, &log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    let session_id = uuid::Uuid::new_v4().to_string();
    info!(session_id = %session_id, "starting devloop");

    let mut state = AppState::new(config.command_entries()).with_session(session_id);
    if let Some(path) = &config.persistence.snapshot_path {
        state = state.with_snapshot_path(path.to_string_lossy());
    }
    let startup = StartupOptions {
        spinner_ms: config.ui.tick_rate_ms,
        autosave_ms: config.ui.autosave_ms,
        restore_snapshot: config.persistence.restore_on_start,
    };

    let frontend = TerminalFrontend::enter().context("initialising the terminal")?;
    let runtime = Runtime::new(state, config.executor_config(), frontend);

    let tx = runtime.sender();
    let mut input = InputAdapter::spawn(tx.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Msg::Quit);
        }
    });

    // The frontend is dropped when `run` returns, which restores the terminal.
    let result = runtime.run(startup).await;
    input.stop();
    let final_state = result.context("event loop failed")?;

    info!(
        workflows = final_state.workflows.len(),
        "devloop exited"
    );
    Ok(())
}
