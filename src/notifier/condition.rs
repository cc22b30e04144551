use crate::config::TriggerPolicy;
use crate::outcome::RunOutcome;

/// Decide whether a notification fires for the given run outcome.
///
/// `Success` and `Failure` match the corresponding outcome; `Completion`
/// fires regardless of how the run ended. Pure function, no side effects.
pub fn should_run(policy: TriggerPolicy, outcome: &RunOutcome) -> bool {
    match policy {
        TriggerPolicy::Success => outcome.succeeded,
        TriggerPolicy::Failure => !outcome.succeeded,
        TriggerPolicy::Completion => true,
    }
}
