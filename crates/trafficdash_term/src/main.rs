//! trafficdash-term - terminal dashboard for the traffic-signal simulation
//!
//! Polls the simulation's `/status` endpoint and prints the same readouts as
//! the browser dashboard after every successful poll. Ctrl-C stops the timer
//! and abandons any in-flight request.
//!
//! Environment:
//! - `TRAFFICDASH_STATUS_URL` (default `http://127.0.0.1:8000/status`)
//! - `TRAFFICDASH_POLL_MS` (default 1000)
//! - `RUST_LOG` for log verbosity

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use trafficdash::DashboardConfig;

mod poller;
mod render;
mod source;

use poller::run_poller;
use source::HttpStatusSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, warnings) = DashboardConfig::from_env();
    for w in &warnings {
        warn!("{}", w);
    }

    let source = HttpStatusSource::new(config.status_url.clone())?;
    info!("Polling {}", source.url());

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C: stopping");
                    cancel.cancel();
                }
                Err(e) => error!("Could not listen for Ctrl-C: {}", e),
            }
        });
    }

    run_poller(source, config, cancel, |state, outcome| {
        if outcome.is_updated() {
            print!("{}", render::render_frame(state));
        }
    })
    .await;

    Ok(())
}
