use std::collections::HashSet;

use crate::config::NotificationConfig;
use crate::outcome::RunOutcome;

use super::NotifyError;

/// Subject label for a successful run
const SUBJECT_SUCCEEDED: &str = "Pipeline succeeded. ";
/// Subject label for a failed run
const SUBJECT_FAILED: &str = "Pipeline failed. ";

/// A fully-resolved message ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    /// Non-empty, first-seen order, no duplicates
    pub recipients: Vec<String>,
}

/// Build the outgoing message from configuration and run outcome.
///
/// The subject is the configured subject prefixed with the outcome label;
/// the body is used verbatim. No I/O happens here.
pub fn compose(
    config: &NotificationConfig,
    outcome: &RunOutcome,
) -> Result<ComposedMessage, NotifyError> {
    let from = config.from_email.trim();
    if from.is_empty() {
        return Err(NotifyError::Configuration(
            "from_email must not be empty".to_string(),
        ));
    }

    let recipients = parse_recipients(&config.to_email);
    if recipients.is_empty() {
        return Err(NotifyError::Configuration(
            "to_email must contain at least one address".to_string(),
        ));
    }

    let label = if outcome.succeeded {
        SUBJECT_SUCCEEDED
    } else {
        SUBJECT_FAILED
    };

    Ok(ComposedMessage {
        subject: format!("{}{}", label, config.subject),
        body: config.body.clone(),
        from: from.to_string(),
        recipients,
    })
}

/// Split a semicolon-delimited address list, trimming entries and dropping
/// empties and duplicates while keeping first-seen order.
fn parse_recipients(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriggerPolicy;

    fn test_config(from: &str, to: &str) -> NotificationConfig {
        NotificationConfig {
            from_email: from.to_string(),
            to_email: to.to_string(),
            api_key: "SG.test".to_string(),
            subject: "nightly ETL".to_string(),
            body: "See the pipeline dashboard for details.".to_string(),
            run_condition: TriggerPolicy::Completion,
        }
    }

    #[test]
    fn test_subject_prefixed_with_succeeded_label() {
        let message = compose(
            &test_config("pipeline@example.com", "ops@example.com"),
            &RunOutcome::new(true),
        )
        .unwrap();

        assert_eq!(message.subject, "Pipeline succeeded. nightly ETL");
    }

    #[test]
    fn test_subject_prefixed_with_failed_label() {
        let message = compose(
            &test_config("pipeline@example.com", "ops@example.com"),
            &RunOutcome::new(false),
        )
        .unwrap();

        assert_eq!(message.subject, "Pipeline failed. nightly ETL");
    }

    #[test]
    fn test_body_used_verbatim() {
        let message = compose(
            &test_config("pipeline@example.com", "ops@example.com"),
            &RunOutcome::new(true),
        )
        .unwrap();

        assert_eq!(message.body, "See the pipeline dashboard for details.");
    }

    #[test]
    fn test_recipients_split_and_trimmed() {
        let message = compose(
            &test_config("pipeline@example.com", " a@x.com ; b@x.com ;; c@x.com"),
            &RunOutcome::new(true),
        )
        .unwrap();

        assert_eq!(message.recipients, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn test_duplicate_recipients_dropped() {
        let message = compose(
            &test_config("pipeline@example.com", "a@x.com;b@x.com;a@x.com"),
            &RunOutcome::new(true),
        )
        .unwrap();

        assert_eq!(message.recipients, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_empty_to_email_is_configuration_error() {
        let result = compose(
            &test_config("pipeline@example.com", " ; ; "),
            &RunOutcome::new(true),
        );

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
    }

    #[test]
    fn test_empty_from_email_is_configuration_error() {
        let result = compose(&test_config("  ", "ops@example.com"), &RunOutcome::new(true));

        assert!(matches!(result, Err(NotifyError::Configuration(_))));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let config = test_config("pipeline@example.com", "a@x.com;b@x.com");
        let outcome = RunOutcome::new(false);

        assert_eq!(
            compose(&config, &outcome).unwrap(),
            compose(&config, &outcome).unwrap()
        );
    }
}
