//! Tick tracker binary.
//!
//! # Architecture
//!
//! This binary is the composition root that assembles:
//! 1. Session (tracker state, history, event bus) via SessionBuilder
//! 2. Frontend (UI) - CLI, GUI, etc.
//!
//! Both are built independently and injected into the Client container.
//!
//! # Features
//!
//! - `frontend-cli`: Terminal-based UI (default)
//!
//! # Examples
//!
//! ```bash
//! TICK_SESSION_SLOT=arena TICK_AUTOSAVE_SECS=30 cargo run -p tick-tracker
//! ```

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    #[cfg(feature = "frontend-cli")]
    {
        run_cli().await?;
    }

    #[cfg(not(feature = "frontend-cli"))]
    {
        compile_error!("At least one frontend feature must be enabled (frontend-cli, etc.)");
    }

    Ok(())
}

/// Run the CLI frontend.
#[cfg(feature = "frontend-cli")]
async fn run_cli() -> Result<()> {
    use client_bootstrap::{SessionBuilder, TrackerConfig};
    use client_frontend_cli::{CliConfig, CliFrontend, FrontendConfig, logging};
    use tick_tracker::Client;

    // 1. Load configuration from environment
    let tracker_config = TrackerConfig::from_env();
    let frontend_config = FrontendConfig::from_env();
    let cli_config = CliConfig::from_env();

    // 2. Setup logging
    let (_guard, log_path) = logging::setup_logging(&tracker_config.log_dir)?;

    tracing::info!("Starting tick tracker");
    tracing::info!("Log file: {}", log_path.display());
    tracing::info!("Save directory: {}", tracker_config.save_dir.display());
    tracing::info!("Session slot: {}", tracker_config.session_slot);

    // 3. Build Session (independent layer)
    tracing::debug!("Building session...");
    let setup = SessionBuilder::new(tracker_config).build()?;
    if setup.resumed {
        tracing::info!("Resumed slot '{}'", setup.config.session_slot);
    }

    // 4. Build Frontend (independent layer)
    tracing::debug!("Building CLI frontend...");
    let frontend = CliFrontend::new(
        frontend_config,
        cli_config,
        setup.repository.clone(),
        setup.config.session_slot.clone(),
    )
    .with_autosave(setup.config.autosave);

    // 5. Build Client (composition layer)
    let client = Client::builder()
        .session(setup.session)
        .storage(setup.repository, setup.config.session_slot)
        .frontend(frontend)
        .build()?;

    tracing::info!("Client assembled, starting...");
    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
