//! Staged editing of the profile.
//!
//! Settings work on a private copy of the record. Nothing reaches the live
//! record until [`SettingsDraft::commit`] succeeds.

use crate::profile::{ProfileField, ProfileRecord};
use crate::validate::{issues, Issue};

/// Result of trying to save the staged copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The staged copy replaced the live record.
    Saved,
    /// The staged copy is incomplete; the live record is untouched.
    Rejected(Vec<Issue>),
}

/// A staged copy of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDraft {
    staged: ProfileRecord,
}

impl SettingsDraft {
    /// Seed a draft from the live record.
    #[must_use]
    pub fn new(live: &ProfileRecord) -> Self {
        Self {
            staged: live.clone(),
        }
    }

    /// The staged copy.
    #[must_use]
    pub fn staged(&self) -> &ProfileRecord {
        &self.staged
    }

    /// Edit a text field of the staged copy.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        self.staged.set(field, value);
    }

    /// Replace or clear the staged avatar.
    pub fn set_avatar(&mut self, data_url: Option<String>) {
        self.staged.set_avatar(data_url);
    }

    /// Toggle the sync opt-in on the staged copy.
    pub fn set_sync_enabled(&mut self, enabled: bool) {
        self.staged.sync_enabled = enabled;
    }

    /// Whether the staged copy differs from `live`.
    #[must_use]
    pub fn is_dirty(&self, live: &ProfileRecord) -> bool {
        &self.staged != live
    }

    /// Problems that would block a save.
    #[must_use]
    pub fn issues(&self) -> Vec<Issue> {
        issues(&self.staged)
    }

    /// Copy the staged record into `live` if it is complete.
    ///
    /// The draft stays usable after a rejection so the user can keep editing.
    pub fn commit(&self, live: &mut ProfileRecord) -> SaveOutcome {
        let problems = self.issues();
        if problems.is_empty() {
            live.clone_from(&self.staged);
            SaveOutcome::Saved
        } else {
            SaveOutcome::Rejected(problems)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::tests::complete_record;
    use crate::validate::IssueKind;

    #[test]
    fn test_edits_do_not_touch_live_record() {
        let live = complete_record();
        let before = serde_json::to_vec(&live).unwrap();

        let mut draft = SettingsDraft::new(&live);
        for field in ProfileField::ALL {
            draft.set(field, "scribble");
        }
        draft.set_avatar(Some("data:image/png;base64,AA==".to_string()));
        draft.set_sync_enabled(true);

        assert!(draft.is_dirty(&live));
        drop(draft);
        assert_eq!(serde_json::to_vec(&live).unwrap(), before);
    }

    #[test]
    fn test_commit_complete_draft() {
        let mut live = complete_record();
        let mut draft = SettingsDraft::new(&live);
        draft.set(ProfileField::Bio, "Updated bio");

        assert_eq!(draft.commit(&mut live), SaveOutcome::Saved);
        assert_eq!(live.bio, "Updated bio");
        assert!(!draft.is_dirty(&live));
    }

    #[test]
    fn test_commit_incomplete_draft_is_rejected() {
        let mut live = complete_record();
        let before = live.clone();
        let mut draft = SettingsDraft::new(&live);
        draft.set(ProfileField::Email, "not-an-email");

        let outcome = draft.commit(&mut live);
        let SaveOutcome::Rejected(problems) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].field, ProfileField::Email);
        assert_eq!(problems[0].kind, IssueKind::NotEmailShaped);
        assert_eq!(live, before);

        // The draft keeps its edits and can be fixed and saved.
        draft.set(ProfileField::Email, "ada@acme.test");
        assert_eq!(draft.commit(&mut live), SaveOutcome::Saved);
    }

    #[test]
    fn test_slug_normalized_in_draft() {
        let live = complete_record();
        let mut draft = SettingsDraft::new(&live);
        draft.set(ProfileField::Slug, "New Handle!");
        assert_eq!(draft.staged().slug, "newhandle");
    }
}
