//! Drives one scan analysis: progress timer, identification call, reveal.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::error;

use crate::controller::{lock, AnalysisTicket, SharedController};
use crate::error::ActionError;
use crate::identify::IdentificationService;
use crate::image::CapturedImage;
use crate::progress::ProgressTimer;

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Interval between cosmetic progress steps.
    pub tick: Duration,
    /// How long 100% stays visible before the result is shown.
    pub reveal_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(150),
            reveal_delay: Duration::from_millis(500),
        }
    }
}

/// Moves the controller into the analyzing phase and runs identification in
/// the background.
pub fn start(
    controller: &SharedController,
    service: Arc<IdentificationService>,
    image: CapturedImage,
    pacing: Pacing,
) -> Result<JoinHandle<()>, ActionError> {
    let ticket = lock(controller).begin_analysis(image.to_data_uri())?;
    let controller = Arc::clone(controller);
    Ok(tokio::spawn(drive(controller, service, image, ticket, pacing)))
}

async fn drive(
    controller: SharedController,
    service: Arc<IdentificationService>,
    image: CapturedImage,
    ticket: AnalysisTicket,
    pacing: Pacing,
) {
    let generation = ticket.generation;
    let timer = {
        let controller = Arc::clone(&controller);
        ProgressTimer::spawn(pacing.tick, move || lock(&controller).tick_progress(generation))
    };

    let outcome = service.identify(&image, ticket.language).await;
    timer.cancel();

    match outcome {
        Ok(identification) => {
            let accepted = lock(&controller).complete_analysis(generation, identification);
            if !accepted {
                return;
            }
            tokio::time::sleep(pacing.reveal_delay).await;
            lock(&controller).reveal_result(generation);
        }
        Err(e) => {
            error!(error = %e, generation, "Analysis failed");
            lock(&controller).fail_analysis(generation);
        }
    }
}
