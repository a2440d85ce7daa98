//! Selection of the active view.
//!
//! The router only moves on explicit [`Navigation`] actions. The single
//! exception is [`Router::initialize`], which may skip onboarding once when
//! the stored record is already complete.

use crate::profile::ProfileRecord;
use crate::validate::is_complete;

/// The four top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// Intake wizard.
    #[default]
    Wizard,
    /// Dashboard with the share link and scan code.
    Dashboard,
    /// Public card.
    Public,
    /// Profile editor with a staged copy.
    Settings,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wizard => write!(f, "wizard"),
            Self::Dashboard => write!(f, "dashboard"),
            Self::Public => write!(f, "public"),
            Self::Settings => write!(f, "settings"),
        }
    }
}

/// A named navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Open the dashboard.
    GoDashboard,
    /// Open the public card.
    GoPublic,
    /// Open settings.
    GoSettings,
    /// Leave the public card or settings for the dashboard.
    Back,
    /// Start the intake wizard again.
    Restart,
    /// The wizard finished.
    WizardDone,
}

/// What should actually be shown for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Any view whose preconditions hold.
    View(View),
    /// The public card was requested for an incomplete record.
    PublicBlocked,
}

/// Current view plus the one-time initialization latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Router {
    current: View,
    initialized: bool,
}

impl Router {
    /// A router on the wizard view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active view.
    #[must_use]
    pub fn current(&self) -> View {
        self.current
    }

    /// Skip onboarding for a complete record.
    ///
    /// Runs once; later calls return the current view without looking at
    /// the record.
    pub fn initialize(&mut self, record: &ProfileRecord) -> View {
        if !self.initialized {
            self.initialized = true;
            if is_complete(record) {
                self.current = View::Dashboard;
            }
        }
        self.current
    }

    /// Apply a navigation action.
    pub fn navigate(&mut self, action: Navigation) -> View {
        self.current = match action {
            Navigation::GoDashboard | Navigation::Back | Navigation::WizardDone => View::Dashboard,
            Navigation::GoPublic => View::Public,
            Navigation::GoSettings => View::Settings,
            Navigation::Restart => View::Wizard,
        };
        self.current
    }

    /// Resolve the view against the record, applying the public-view guard.
    #[must_use]
    pub fn screen(&self, record: &ProfileRecord) -> Screen {
        match self.current {
            View::Public if !is_complete(record) => Screen::PublicBlocked,
            view => Screen::View(view),
        }
    }
}
