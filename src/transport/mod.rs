//! Email delivery transports.
//!
//! The dispatcher talks to the delivery vendor through the [`EmailTransport`]
//! trait; [`SendGridTransport`] is the HTTP binding. Swapping the vendor means
//! adding another implementation, the notifier itself does not change.

mod sendgrid;

pub use sendgrid::SendGridTransport;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::notifier::ComposedMessage;

/// Response recorded from the delivery vendor, kept for observability
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Errors at the transport boundary
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP request could not be completed (connect failure, timeout)
    #[error("Request to email delivery service failed: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("Email delivery service returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// A collaborator capable of delivering a composed message.
///
/// Sending is idempotent-unsafe: calling twice sends two emails. Callers make
/// at most one attempt per run.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Deliver the message, returning the vendor response on success.
    async fn send(
        &self,
        api_key: &str,
        message: &ComposedMessage,
    ) -> Result<TransportResponse, TransportError>;

    /// Endpoint description, used in error and log context.
    fn endpoint(&self) -> &str;
}
