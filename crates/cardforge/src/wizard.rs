//! The four-step intake wizard.
//!
//! The wizard owns only its position. Field edits go straight into the live
//! record (see [`crate::app::App::edit_field`]); each step has a gate that
//! must hold before moving on, and finishing requires the whole record to
//! be complete.

use crate::profile::{ProfileField, ProfileRecord};
use crate::validate::{is_complete, is_email_shaped, is_phone_shaped};

/// A wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    /// Business name, person name, link handle.
    #[default]
    Identity,
    /// Phone, messaging number, e-mail, website.
    Contact,
    /// Bio and address.
    About,
    /// Optional avatar.
    Photo,
}

impl Step {
    /// 1-based step number.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Contact => 2,
            Self::About => 3,
            Self::Photo => 4,
        }
    }

    /// Total number of steps.
    pub const COUNT: u8 = 4;

    /// Every step, in order.
    pub const ALL: [Self; 4] = [Self::Identity, Self::Contact, Self::About, Self::Photo];

    /// The step on which `field` is edited.
    #[must_use]
    pub fn containing(field: ProfileField) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|step| step.fields().contains(&field))
    }

    /// Heading shown above the step's form.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Identity => "Who are you?",
            Self::Contact => "How can people reach you?",
            Self::About => "Tell people about yourself",
            Self::Photo => "Add a photo",
        }
    }

    /// Text fields edited on this step. The photo step edits the avatar.
    #[must_use]
    pub fn fields(self) -> &'static [ProfileField] {
        match self {
            Self::Identity => &[
                ProfileField::BusinessName,
                ProfileField::FullName,
                ProfileField::Slug,
                ProfileField::ThemeColor,
            ],
            Self::Contact => &[
                ProfileField::Phone,
                ProfileField::Whatsapp,
                ProfileField::Email,
                ProfileField::Website,
            ],
            Self::About => &[ProfileField::Bio, ProfileField::Address],
            Self::Photo => &[],
        }
    }

    /// Whether this step's own inputs allow moving on.
    #[must_use]
    pub fn gate(self, record: &ProfileRecord) -> bool {
        match self {
            Self::Identity => {
                !record.business_name.is_empty()
                    && !record.full_name.is_empty()
                    && !record.slug.is_empty()
            }
            Self::Contact => {
                is_phone_shaped(&record.phone)
                    && is_phone_shaped(&record.whatsapp)
                    && is_email_shaped(&record.email)
            }
            Self::About => !record.bio.is_empty(),
            Self::Photo => true,
        }
    }

    fn following(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::Contact),
            Self::Contact => Some(Self::About),
            Self::About => Some(Self::Photo),
            Self::Photo => None,
        }
    }

    fn preceding(self) -> Option<Self> {
        match self {
            Self::Identity => None,
            Self::Contact => Some(Self::Identity),
            Self::About => Some(Self::Contact),
            Self::Photo => Some(Self::About),
        }
    }
}

/// Result of asking the wizard to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The wizard is now on this step.
    Moved(Step),
    /// The gate did not hold; the wizard stayed where it was.
    Blocked,
    /// The wizard reached its terminal state.
    Finished,
}

/// Position of the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wizard {
    step: Step,
}

impl Wizard {
    /// A wizard on the first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Whether the continue (or finish) affordance is enabled.
    #[must_use]
    pub fn can_continue(&self, record: &ProfileRecord) -> bool {
        match self.step {
            Step::Photo => is_complete(record),
            step => step.gate(record),
        }
    }

    /// Advance one step if the current gate holds.
    ///
    /// On the last step this behaves like [`Wizard::finish`].
    pub fn next(&mut self, record: &ProfileRecord) -> Transition {
        let Some(following) = self.step.following() else {
            return self.finish(record);
        };
        if self.step.gate(record) {
            self.step = following;
            Transition::Moved(following)
        } else {
            Transition::Blocked
        }
    }

    /// Go back one step. Never gated; stays on the first step.
    pub fn back(&mut self) -> Step {
        if let Some(preceding) = self.step.preceding() {
            self.step = preceding;
        }
        self.step
    }

    /// Leave the wizard. Only possible from the last step with a complete
    /// record, regardless of the last step's own gate.
    #[must_use]
    pub fn finish(&self, record: &ProfileRecord) -> Transition {
        if self.step == Step::Photo && self.step.gate(record) && is_complete(record) {
            Transition::Finished
        } else {
            Transition::Blocked
        }
    }

    /// Return to the first step.
    pub fn reset(&mut self) {
        self.step = Step::Identity;
    }
}
