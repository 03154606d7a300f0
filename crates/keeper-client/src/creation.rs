//! Creation flow.
//!
//! Validates a draft, tracks the single outstanding submission and turns the
//! backend's answer into a share link.

use keeper_proto::ShareLink;
use tracing::{debug, info, warn};

use crate::{
    error::{CreationError, GatewayError},
    event::{CreationAction, CreationEvent, SubmissionId},
    secret::{CreateParams, CreatedSecret, SecretDraft},
};

/// State machine for creating secrets.
///
/// At most one submission is in flight. A submission made while another is
/// outstanding is rejected with [`CreationError::InFlight`], and completions
/// for anything but the outstanding submission are ignored.
#[derive(Debug, Clone)]
pub struct CreationFlow {
    origin: String,
    next_submission: u64,
    in_flight: Option<SubmissionId>,
}

impl CreationFlow {
    /// Flow composing share links under `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into(), next_submission: 0, in_flight: None }
    }

    /// Origin share links are composed under.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Outstanding submission, if any.
    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    /// Whether a submission is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Process an event and return the resulting actions.
    pub fn handle(&mut self, event: CreationEvent) -> Result<Vec<CreationAction>, CreationError> {
        match event {
            CreationEvent::Submit(draft) => self.handle_submit(&draft),
            CreationEvent::Completed { submission, result } => {
                Ok(self.handle_completed(submission, result))
            },
        }
    }

    fn handle_submit(&mut self, draft: &SecretDraft) -> Result<Vec<CreationAction>, CreationError> {
        if let Some(submission) = self.in_flight {
            return Err(CreationError::InFlight { submission });
        }

        let params = CreateParams::validate(draft).map_err(CreationError::Invalid)?;

        let submission = SubmissionId(self.next_submission);
        self.next_submission += 1;
        self.in_flight = Some(submission);

        debug!(%submission, ttl = %params.ttl(), with_passphrase = params.passphrase().is_some(), "submitting secret");
        Ok(vec![CreationAction::Create { submission, params }])
    }

    fn handle_completed(
        &mut self,
        submission: SubmissionId,
        result: Result<CreatedSecret, GatewayError>,
    ) -> Vec<CreationAction> {
        if self.in_flight != Some(submission) {
            warn!(%submission, in_flight = ?self.in_flight, "ignoring stale creation result");
            return Vec::new();
        }
        self.in_flight = None;

        match result {
            Ok(CreatedSecret { key, requires_passphrase }) => {
                info!(%submission, requires_passphrase, "secret created");
                let link = ShareLink::new(&self.origin, key, requires_passphrase);
                vec![CreationAction::Share(link), CreationAction::ResetForm]
            },
            Err(error) => {
                warn!(%submission, %error, "secret creation failed");
                vec![CreationAction::Failed { error }]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use keeper_proto::SecretKey;

    use super::*;

    fn created(key: &str, requires_passphrase: bool) -> CreatedSecret {
        CreatedSecret { key: SecretKey::parse(key).unwrap(), requires_passphrase }
    }

    fn submit(flow: &mut CreationFlow, draft: SecretDraft) -> SubmissionId {
        let actions = flow.handle(CreationEvent::Submit(draft)).unwrap();
        match actions.as_slice() {
            [CreationAction::Create { submission, .. }] => *submission,
            other => panic!("expected a single create action, got {other:?}"),
        }
    }

    #[test]
    fn success_shares_link_and_resets_form() {
        let mut flow = CreationFlow::new("https://host");
        let submission = submit(&mut flow, SecretDraft::new("hello world"));
        assert!(flow.is_submitting());

        let actions = flow
            .handle(CreationEvent::Completed { submission, result: Ok(created("abc123", false)) })
            .unwrap();

        assert!(!flow.is_submitting());
        assert_eq!(actions.len(), 2);
        match &actions[0] {
            CreationAction::Share(link) => assert_eq!(link.url(), "https://host/secrets/abc123"),
            other => panic!("expected share, got {other:?}"),
        }
        assert_eq!(actions[1], CreationAction::ResetForm);
    }

    #[test]
    fn backend_flag_drives_the_link() {
        let mut flow = CreationFlow::new("https://host");
        let submission = submit(&mut flow, SecretDraft::new("hello world"));

        let actions = flow
            .handle(CreationEvent::Completed { submission, result: Ok(created("k1", true)) })
            .unwrap();

        assert!(matches!(
            &actions[0],
            CreationAction::Share(link) if link.url() == "https://host/secrets/k1?withSecretPhrase=true"
        ));
    }

    #[test]
    fn invalid_draft_submits_nothing() {
        let mut flow = CreationFlow::new("https://host");
        let err = flow.handle(CreationEvent::Submit(SecretDraft::new("hi"))).unwrap_err();

        assert_eq!(err.validation_errors().len(), 1);
        assert!(!flow.is_submitting());
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        let mut flow = CreationFlow::new("https://host");
        let first = submit(&mut flow, SecretDraft::new("hello world"));

        let err = flow.handle(CreationEvent::Submit(SecretDraft::new("again"))).unwrap_err();
        assert_eq!(err, CreationError::InFlight { submission: first });
    }

    #[test]
    fn failure_keeps_form_and_allows_retry() {
        let mut flow = CreationFlow::new("https://host");
        let submission = submit(&mut flow, SecretDraft::new("hello world"));

        let error = GatewayError::unreachable("connection refused");
        let actions = flow
            .handle(CreationEvent::Completed { submission, result: Err(error.clone()) })
            .unwrap();
        assert_eq!(actions, vec![CreationAction::Failed { error }]);

        let retry = submit(&mut flow, SecretDraft::new("hello world"));
        assert_ne!(retry, submission);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut flow = CreationFlow::new("https://host");
        let submission = submit(&mut flow, SecretDraft::new("hello world"));

        let actions = flow
            .handle(CreationEvent::Completed {
                submission: SubmissionId(submission.0 + 7),
                result: Ok(created("k", false)),
            })
            .unwrap();

        assert!(actions.is_empty());
        assert_eq!(flow.in_flight(), Some(submission));
    }
}
