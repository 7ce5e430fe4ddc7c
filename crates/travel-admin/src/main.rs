//! # Travel Admin
//!
//! Back office for the travel site: every admin screen (airports, holidays, FAQs, users,
//! ...) is a [`ResourceManager`](resource_framework::ResourceManager) over one REST
//! collection.
//!
//! - **[config]**: TOML configuration (API endpoint, timings, upload policies).
//! - **[model]**: The resource types and their form payloads.
//! - **[lifecycle]**: [`AdminConsole`] starts and stops every store.
//!
//! ## Quick Start
//!
//! The binary walks one airport through the same steps a screen would:
//! 1.  Load every collection.
//! 2.  Add an airport through the dialog.
//! 3.  Delete it through the confirmation flow.

use resource_framework::tracing::setup_tracing;
use resource_framework::{DeleteOutcome, SubmitOutcome};
use tracing::{error, info, warn, Instrument};
use travel_admin::config::AdminConfig;
use travel_admin::lifecycle::AdminConsole;
use travel_admin::model::AirportForm;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AdminConfig::load(None).map_err(|e| e.to_string())?;
    info!(base_url = %config.api.base_url, "Starting admin console");

    let console = AdminConsole::new(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("initial_load");
    let failed = async {
        info!("Loading collections");
        console.refresh_all().await
    }
    .instrument(span)
    .await;
    for (collection, error) in &failed {
        warn!(collection, %error, "Collection unavailable");
    }

    // Controllers hold store clients; the stores only stop once these are dropped.
    let dialog = console.airports.dialog();
    let delete = console.airports.delete_confirmation(None);
    dialog.open(None);
    let form = AirportForm {
        name: "Manchester".to_string(),
        code: "MAN".to_string(),
        city: Some("Manchester".to_string()),
        country: "United Kingdom".to_string(),
    };

    let span = tracing::info_span!("airport_create");
    let outcome = async {
        info!("Submitting airport");
        dialog.submit(form).await
    }
    .instrument(span)
    .await;

    match outcome {
        SubmitOutcome::Committed(airport) => {
            info!(airport_id = %airport.id, "Airport created");

            delete.request_delete(airport.id, airport.name.clone());
            match delete.confirm().await {
                DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => {
                    info!(airport_id = %airport.id, "Airport removed")
                }
                DeleteOutcome::Failed(e) => error!(error = %e, "Airport delete failed"),
                DeleteOutcome::Ignored => warn!("Delete was not confirmed"),
            }
        }
        SubmitOutcome::Rejected(e) => error!(error = %e, "Airport create failed"),
        SubmitOutcome::Ignored | SubmitOutcome::Detached => warn!("Submit did not run"),
    }

    drop(dialog);
    drop(delete);

    if let Some(notification) = console.notifications().current() {
        info!(severity = ?notification.severity, message = %notification.message, "Last notification");
    }

    console.shutdown().await;

    info!("Admin console finished");
    Ok(())
}
