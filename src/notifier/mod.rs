//! End-of-run notification: decide, compose, dispatch.
//!
//! The [`Dispatcher`] asks the run condition whether the notification fires
//! for the given outcome, builds the message, and hands it to an injected
//! email transport. Skipping is a normal no-op, not an error.

mod composer;
mod condition;

pub use composer::{compose, ComposedMessage};
pub use condition::should_run;

use std::sync::Arc;
use thiserror::Error;

use crate::config::NotificationConfig;
use crate::outcome::RunOutcome;
use crate::transport::{EmailTransport, TransportError};

/// Errors raised while preparing or delivering a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Malformed configuration, surfaced before any network call
    #[error("Invalid notification configuration: {0}")]
    Configuration(String),

    /// The transport failed to deliver the composed message
    #[error("Failed to deliver notification for {recipients} recipient(s) via {endpoint}")]
    Delivery {
        endpoint: String,
        recipients: usize,
        #[source]
        source: TransportError,
    },
}

/// Sends a single end-of-run notification through an injected transport.
///
/// One instance covers one pipeline run: evaluate, compose, at most one
/// dispatch attempt. No retry on failure; the invoking framework decides
/// whether a delivery failure is fatal to the run.
pub struct Dispatcher {
    config: NotificationConfig,
    transport: Arc<dyn EmailTransport>,
}

impl Dispatcher {
    pub fn new(config: NotificationConfig, transport: Arc<dyn EmailTransport>) -> Self {
        Self { config, transport }
    }

    /// Run the notification for a finished pipeline run.
    pub async fn run(&self, outcome: &RunOutcome) -> Result<(), NotifyError> {
        if !condition::should_run(self.config.run_condition, outcome) {
            tracing::info!(
                run_condition = %self.config.run_condition,
                succeeded = outcome.succeeded,
                "Run condition not met, skipping notification"
            );
            return Ok(());
        }

        let message = composer::compose(&self.config, outcome)?;

        tracing::info!(
            from = %message.from,
            to = %self.config.to_email,
            "Sending email notification"
        );

        let response = self
            .transport
            .send(&self.config.api_key, &message)
            .await
            .map_err(|source| NotifyError::Delivery {
                endpoint: self.transport.endpoint().to_string(),
                recipients: message.recipients.len(),
                source,
            })?;

        tracing::info!(
            status = response.status,
            body = %response.body,
            headers = ?response.headers,
            "Email delivery service responded"
        );

        for (node, state) in &outcome.node_states {
            tracing::debug!(node = %node, state = %state, "Pipeline node terminal state");
        }

        Ok(())
    }
}
