use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, limiter, notifier, utils, web};

use limiter::clock::Clock;
use repositories::{contact_me::SubmissionRepository, notifier::ContactNotifier};
use use_cases::contact::{ContactMeHandler, RateLimitPolicy};

pub type AppContactHandler = ContactMeHandler<Arc<dyn SubmissionRepository>, Arc<dyn ContactNotifier>>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        submission_repo: Arc<dyn SubmissionRepository>,
        notifier: Arc<dyn ContactNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let contact_handler = ContactMeHandler::new(
            submission_repo,
            notifier,
            RateLimitPolicy::from(config),
            clock,
            config.notify_timeout(),
        );

        AppState {
            contact_handler,
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}
