//! Manual swipe creation dialog
//!
//! The operator picks a source user and up to [`MAX_TARGET_USERS`] targets.
//! The target list never holds duplicates or the source user.

use matchdesk_core::types::{User, UserId};
use matchdesk_services::AdminService;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Most targets a single submission may carry
pub const MAX_TARGET_USERS: usize = 5;

/// Message shown when submit is pressed without a complete selection
pub const INCOMPLETE_SELECTION_MESSAGE: &str =
    "Please select a source user and at least one target user";

/// Message shown when the backend refuses without saying why
const FALLBACK_ERROR_MESSAGE: &str = "Failed to create swipes";

/// Result of trying to add a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTargetOutcome {
    /// Target appended
    Added,
    /// Nothing was selected in the picker
    NoSelection,
    /// Already a target
    Duplicate,
    /// Candidate is the source user
    IsSource,
    /// Target list is full
    Full,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Swipes created; the form has been reset
    Created {
        /// Number of swipes created
        count: usize,
    },
    /// Selection incomplete; nothing was sent
    Incomplete,
    /// Backend refused or the call failed; the message is in [`SwipeCreationForm::error`]
    Failed,
}

/// State of the manual swipe dialog
pub struct SwipeCreationForm {
    service: Arc<dyn AdminService>,
    users: Vec<User>,
    source: Option<UserId>,
    targets: Vec<UserId>,
    error: Option<String>,
    submitting: bool,
}

impl SwipeCreationForm {
    /// Create an empty form
    pub fn new(service: Arc<dyn AdminService>) -> Self {
        Self {
            service,
            users: Vec::new(),
            source: None,
            targets: Vec::new(),
            error: None,
            submitting: false,
        }
    }

    /// Fetch the users offered in the pickers
    ///
    /// A failed fetch leaves the pickers empty and is only logged.
    pub async fn load_users(&mut self, page_size: u32) {
        match self.service.get_users(1, page_size).await {
            Ok(users) => self.users = users,
            Err(e) => {
                error!(error = %e, "Failed to load users for swipe dialog");
                self.users.clear();
            }
        }
    }

    /// Users offered in the pickers
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Set the source user
    ///
    /// A blank id clears the source. A source that is currently a target is
    /// removed from the targets.
    pub fn set_source(&mut self, user_id: Option<UserId>) {
        let user_id = user_id.filter(|id| !id.trim().is_empty());
        if let Some(ref id) = user_id {
            self.targets.retain(|t| t != id);
        }
        self.source = user_id;
        self.error = None;
    }

    /// Selected source user
    pub const fn source(&self) -> Option<&UserId> {
        self.source.as_ref()
    }

    /// Selected targets, in the order they were added
    pub fn targets(&self) -> &[UserId] {
        &self.targets
    }

    /// Add the picker's current selection as a target
    pub fn add_target(&mut self, candidate: Option<&UserId>) -> AddTargetOutcome {
        let Some(candidate) = candidate.filter(|c| !c.trim().is_empty()) else {
            return AddTargetOutcome::NoSelection;
        };
        if self.source.as_ref() == Some(candidate) {
            return AddTargetOutcome::IsSource;
        }
        if self.targets.contains(candidate) {
            return AddTargetOutcome::Duplicate;
        }
        if self.targets.len() >= MAX_TARGET_USERS {
            return AddTargetOutcome::Full;
        }

        self.targets.push(candidate.clone());
        AddTargetOutcome::Added
    }

    /// Remove a target; unknown ids are ignored
    pub fn remove_target(&mut self, user_id: &UserId) {
        self.targets.retain(|t| t != user_id);
    }

    /// Users that can still be added as targets
    pub fn available_targets(&self) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| self.source.as_ref() != Some(&u.id))
            .filter(|u| !self.targets.contains(&u.id))
            .collect()
    }

    /// Last error shown in the dialog
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a submission is in progress
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Send the selection to the backend
    ///
    /// On success the form is reset and `on_created` runs so the caller can
    /// refresh whatever list it shows.
    pub async fn submit<F>(&mut self, on_created: F) -> SubmitOutcome
    where
        F: FnOnce() + Send,
    {
        let source = match self.source.clone() {
            Some(source) if !source.trim().is_empty() && !self.targets.is_empty() => source,
            _ => {
                self.error = Some(INCOMPLETE_SELECTION_MESSAGE.to_string());
                return SubmitOutcome::Incomplete;
            }
        };

        self.submitting = true;
        self.error = None;
        let response = self
            .service
            .create_swipes_for_user(&source, &self.targets)
            .await;
        self.submitting = false;

        match response {
            Ok(response) if response.success => {
                let count = if response.created == 0 {
                    self.targets.len()
                } else {
                    response.created
                };
                info!(from = %source, count, "Created manual swipes");
                self.reset();
                on_created();
                SubmitOutcome::Created { count }
            }
            Ok(response) => {
                let message = response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
                warn!(from = %source, error = %message, "Backend refused swipes");
                self.error = Some(message);
                SubmitOutcome::Failed
            }
            Err(e) => {
                error!(from = %source, error = %e, "Failed to create swipes");
                self.error = Some(e.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Clear the selection and any error
    pub fn reset(&mut self) {
        self.source = None;
        self.targets.clear();
        self.error = None;
        self.submitting = false;
    }
}

impl std::fmt::Debug for SwipeCreationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeCreationForm")
            .field("service", &self.service.name())
            .field("users", &self.users.len())
            .field("source", &self.source)
            .field("targets", &self.targets)
            .field("error", &self.error)
            .field("submitting", &self.submitting)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use matchdesk_services::MockAdminService;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn id(s: &str) -> UserId {
        s.to_string()
    }

    fn sample_form() -> (Arc<MockAdminService>, SwipeCreationForm) {
        let service = Arc::new(MockAdminService::with_sample_data());
        let form = SwipeCreationForm::new(service.clone());
        (service, form)
    }

    #[test]
    fn test_add_target_rules() {
        let (_, mut form) = sample_form();
        form.set_source(Some(id("u1")));

        assert_eq!(form.add_target(None), AddTargetOutcome::NoSelection);
        assert_eq!(form.add_target(Some(&id(""))), AddTargetOutcome::NoSelection);
        assert_eq!(form.add_target(Some(&id("u1"))), AddTargetOutcome::IsSource);
        assert_eq!(form.add_target(Some(&id("u2"))), AddTargetOutcome::Added);
        assert_eq!(form.add_target(Some(&id("u2"))), AddTargetOutcome::Duplicate);
        assert_eq!(form.targets(), &[id("u2")]);
    }

    #[test]
    fn test_target_list_caps_at_five() {
        let (_, mut form) = sample_form();
        for n in 2..=6 {
            assert_eq!(
                form.add_target(Some(&format!("u{n}"))),
                AddTargetOutcome::Added
            );
        }
        assert_eq!(form.add_target(Some(&id("u7"))), AddTargetOutcome::Full);
        assert_eq!(form.targets().len(), MAX_TARGET_USERS);

        form.remove_target(&id("u4"));
        assert_eq!(form.targets(), &[id("u2"), id("u3"), id("u5"), id("u6")]);
    }

    #[test]
    fn test_source_selected_from_targets_is_removed() {
        let (_, mut form) = sample_form();
        form.add_target(Some(&id("u2")));
        form.add_target(Some(&id("u3")));

        form.set_source(Some(id("u2")));

        assert_eq!(form.targets(), &[id("u3")]);
    }

    #[tokio::test]
    async fn test_available_targets_exclude_source_and_selected() {
        let (_, mut form) = sample_form();
        form.load_users(100).await;
        form.set_source(Some(id("u1")));
        form.add_target(Some(&id("u2")));

        let available: Vec<&str> = form
            .available_targets()
            .iter()
            .map(|u| u.id.as_str())
            .collect();

        assert_eq!(available, vec!["u3", "u4", "u5", "u6", "u7"]);
    }

    #[tokio::test]
    async fn test_submit_without_source_makes_no_call() {
        let (service, mut form) = sample_form();
        form.add_target(Some(&id("u2")));

        let outcome = form.submit(|| {}).await;

        assert_eq!(outcome, SubmitOutcome::Incomplete);
        assert_eq!(form.error(), Some(INCOMPLETE_SELECTION_MESSAGE));
        assert_eq!(service.call_count("create_swipes_for_user"), 0);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn test_blank_source_makes_no_call(#[case] blank: &str) {
        let (service, mut form) = sample_form();
        form.set_source(Some(blank.to_string()));
        form.add_target(Some(&id("u2")));

        assert!(form.source().is_none());
        assert_eq!(form.submit(|| {}).await, SubmitOutcome::Incomplete);
        assert_eq!(form.error(), Some(INCOMPLETE_SELECTION_MESSAGE));
        assert_eq!(service.call_count("create_swipes_for_user"), 0);
    }

    #[tokio::test]
    async fn test_submit_without_targets_makes_no_call() {
        let (service, mut form) = sample_form();
        form.set_source(Some(id("u1")));

        assert_eq!(form.submit(|| {}).await, SubmitOutcome::Incomplete);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_resets_and_refreshes() {
        let (service, mut form) = sample_form();
        form.set_source(Some(id("u1")));
        form.add_target(Some(&id("u2")));
        form.add_target(Some(&id("u3")));
        let refreshed = AtomicBool::new(false);

        let outcome = form.submit(|| refreshed.store(true, Ordering::SeqCst)).await;

        assert_eq!(outcome, SubmitOutcome::Created { count: 2 });
        assert!(refreshed.load(Ordering::SeqCst));
        assert!(form.source().is_none());
        assert!(form.targets().is_empty());
        assert_eq!(service.swipes().len(), 2);
    }

    #[tokio::test]
    async fn test_backend_refusal_keeps_selection_and_shows_error() {
        let (_, mut form) = sample_form();
        form.set_source(Some(id("u1")));
        form.add_target(Some(&id("ghost")));

        let outcome = form.submit(|| {}).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(form.error(), Some("User ghost does not exist"));
        assert_eq!(form.targets(), &[id("ghost")]);
    }

    #[tokio::test]
    async fn test_transport_failure_message_is_shown() {
        let service = Arc::new(MockAdminService::new().with_failure("network timeout"));
        let mut form = SwipeCreationForm::new(service);
        form.set_source(Some(id("u1")));
        form.add_target(Some(&id("u2")));

        assert_eq!(form.submit(|| {}).await, SubmitOutcome::Failed);
        assert_eq!(form.error(), Some("network timeout"));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_failed_user_load_empties_picker() {
        let service = Arc::new(MockAdminService::new().with_failure("down"));
        let mut form = SwipeCreationForm::new(service);
        form.load_users(100).await;
        assert!(form.users().is_empty());
    }
}
