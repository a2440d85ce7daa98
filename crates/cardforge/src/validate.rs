//! Completeness checks for the profile record.
//!
//! The shape checks are loose: a phone number only needs five
//! digits somewhere and an e-mail only needs an `x@y.z` outline.

use std::sync::LazyLock;

use regex::Regex;

use crate::profile::{ProfileField, ProfileRecord};

/// Minimum number of digits a phone-like value must contain.
pub const MIN_PHONE_DIGITS: usize = 5;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// True iff every required field is non-empty.
#[must_use]
pub fn has_required_fields(record: &ProfileRecord) -> bool {
    ProfileField::REQUIRED
        .iter()
        .all(|field| !record.get(*field).is_empty())
}

/// True iff `s` contains at least [`MIN_PHONE_DIGITS`] ASCII digits.
#[must_use]
pub fn is_phone_shaped(s: &str) -> bool {
    s.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// True iff `s` looks like `local@domain.tld`.
#[must_use]
pub fn is_email_shaped(s: &str) -> bool {
    EMAIL_SHAPE.is_match(s)
}

/// The completeness gate used by the wizard, the public view and settings.
#[must_use]
pub fn is_complete(record: &ProfileRecord) -> bool {
    has_required_fields(record)
        && is_phone_shaped(&record.phone)
        && is_phone_shaped(&record.whatsapp)
        && is_email_shaped(&record.email)
}

/// Why a field fails the completeness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A required field is empty.
    Missing,
    /// The value has fewer than five digits.
    NotPhoneShaped,
    /// The value is not `x@y.z` shaped.
    NotEmailShaped,
}

/// A single failing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issue {
    /// The offending field.
    pub field: ProfileField,
    /// What is wrong with it.
    pub kind: IssueKind,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = self.field.label();
        match self.kind {
            IssueKind::Missing => write!(f, "{label} is required"),
            IssueKind::NotPhoneShaped => {
                write!(f, "{label} needs at least {MIN_PHONE_DIGITS} digits")
            }
            IssueKind::NotEmailShaped => write!(f, "{label} must look like name@example.com"),
        }
    }
}

/// List every reason the record is not complete.
///
/// An empty field is reported only as missing, never also as badly shaped.
#[must_use]
pub fn issues(record: &ProfileRecord) -> Vec<Issue> {
    ProfileField::REQUIRED
        .iter()
        .filter_map(|&field| {
            let value = record.get(field);
            let kind = if value.is_empty() {
                IssueKind::Missing
            } else {
                match field {
                    ProfileField::Phone | ProfileField::Whatsapp if !is_phone_shaped(value) => {
                        IssueKind::NotPhoneShaped
                    }
                    ProfileField::Email if !is_email_shaped(value) => IssueKind::NotEmailShaped,
                    _ => return None,
                }
            };
            Some(Issue { field, kind })
        })
        .collect()
}
