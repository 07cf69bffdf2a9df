//! Service manager for the database and scan-engine containers.

use crate::config::{Config, ServiceSpec};
use crate::context::ScanContext;
use crate::docker::{ContainerState, Docker};
use crate::error::Result;
use crate::events::{Event, EventAction, record_event};
use serde_json::json;
use std::thread;
use std::time::Duration;

/// What `ensure_service` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// The container was already running.
    AlreadyRunning,
    /// An existing stopped container was started.
    Resumed,
    /// A new container was created from the image.
    Created,
}

impl ServiceOutcome {
    fn changed(self) -> bool {
        !matches!(self, ServiceOutcome::AlreadyRunning)
    }
}

/// Make sure one service container is running.
pub fn ensure_service(docker: &Docker, spec: &ServiceSpec) -> Result<ServiceOutcome> {
    let outcome = match docker.container_state(&spec.name)? {
        ContainerState::Running => ServiceOutcome::AlreadyRunning,
        ContainerState::Stopped => {
            docker.start_container(&spec.name)?;
            ServiceOutcome::Resumed
        }
        ContainerState::Missing => {
            docker.run_container(spec)?;
            ServiceOutcome::Created
        }
    };
    tracing::info!(container = %spec.name, ?outcome, "service ensured");
    Ok(outcome)
}

/// Make sure the database and then the engine are running.
///
/// Sleeps `settle_seconds` once if anything had to be started.
pub fn ensure_services(ctx: &ScanContext, config: &Config) -> Result<Vec<(String, ServiceOutcome)>> {
    let docker = Docker::new(&config.docker_bin);
    let mut outcomes = Vec::new();

    for spec in [&config.database, &config.engine] {
        let outcome = ensure_service(&docker, spec)?;
        match outcome {
            ServiceOutcome::AlreadyRunning => println!("[=] {} already running", spec.name),
            ServiceOutcome::Resumed => println!("[+] Started existing container {}", spec.name),
            ServiceOutcome::Created => {
                println!("[+] Created container {} from {}", spec.name, spec.image)
            }
        }
        if outcome.changed() {
            let action = match outcome {
                ServiceOutcome::Created => EventAction::ServiceCreate,
                _ => EventAction::ServiceResume,
            };
            record_event(
                ctx,
                &Event::new(action).with_details(json!({
                    "container": spec.name,
                    "image": spec.image,
                })),
            );
        }
        outcomes.push((spec.name.clone(), outcome));
    }

    if outcomes.iter().any(|(_, o)| o.changed()) && config.settle_seconds > 0 {
        println!("[.] Waiting {}s for services to settle", config.settle_seconds);
        thread::sleep(Duration::from_secs(config.settle_seconds));
    }

    Ok(outcomes)
}
