//! Application state.
//!
//! [`App`] owns the live record and everything that reads or writes it.
//! Views never touch the store directly; every committed mutation goes
//! through a method here and is persisted before the method returns.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::avatar;
use crate::clipboard::ClipboardSink;
use crate::config::{Config, SyncConfig};
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::profile::{ProfileField, ProfileRecord};
use crate::router::{Navigation, Router, Screen, View};
use crate::settings::{SaveOutcome, SettingsDraft};
use crate::store::{LoadOrigin, SaveStatus, Store};
use crate::sync::{self, SyncStatus};
use crate::wizard::{Step, Transition, Wizard};

/// The whole application state.
#[derive(Debug)]
pub struct App {
    record: ProfileRecord,
    router: Router,
    wizard: Wizard,
    draft: Option<SettingsDraft>,
    dashboard: Dashboard,
    store: Store,
    sync_config: SyncConfig,
    load_origin: LoadOrigin,
}

impl App {
    /// Open the configured store and load the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or read.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Store::open(config.database_path())?;
        Self::with_store(store, config)
    }

    /// Load the profile from an already opened store.
    ///
    /// The router's one-time check runs here.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn with_store(mut store: Store, config: &Config) -> Result<Self> {
        let (record, load_origin) = store.load_profile()?;
        let mut router = Router::new();
        let view = router.initialize(&record);
        info!(view = %view, origin = ?load_origin, "Profile loaded");

        Ok(Self {
            record,
            router,
            wizard: Wizard::new(),
            draft: None,
            dashboard: Dashboard::new(config.card.base_url.clone(), config.code_options()),
            store,
            sync_config: config.sync.clone(),
            load_origin,
        })
    }

    /// The live record.
    #[must_use]
    pub fn record(&self) -> &ProfileRecord {
        &self.record
    }

    /// The active view.
    #[must_use]
    pub fn view(&self) -> View {
        self.router.current()
    }

    /// The active view after applying the public-card guard.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.router.screen(&self.record)
    }

    /// The wizard's position.
    #[must_use]
    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// The settings draft, while settings are open.
    #[must_use]
    pub fn draft(&self) -> Option<&SettingsDraft> {
        self.draft.as_ref()
    }

    /// Dashboard state.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Where the record came from at startup.
    #[must_use]
    pub fn load_origin(&self) -> LoadOrigin {
        self.load_origin
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Whether cloud sync could run.
    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        sync::status(&self.record, &self.sync_config)
    }

    /// The public link of the live record.
    #[must_use]
    pub fn public_url(&self) -> String {
        self.dashboard.url(&self.record)
    }

    /// Write a field straight into the live record and persist it.
    ///
    /// This is how the wizard edits; settings go through
    /// [`App::settings_edit`] instead.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn edit_field(&mut self, field: ProfileField, value: &str) -> Result<()> {
        let mut next = self.record.clone();
        next.set(field, value);
        self.persist(next)?;
        debug!(field = %field, "Field edited");
        Ok(())
    }

    /// Import an avatar image.
    ///
    /// In settings the image goes into the draft; anywhere else it is
    /// written to the live record and persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not an image or persisting fails.
    pub fn import_avatar(&mut self, path: &Path) -> Result<()> {
        let data_url = avatar::import(path)?;
        match self.draft.as_mut() {
            Some(draft) => {
                draft.set_avatar(Some(data_url));
                Ok(())
            }
            None => {
                let mut next = self.record.clone();
                next.set_avatar(Some(data_url));
                self.persist(next)
            }
        }
    }

    /// Advance the wizard. Finishing it moves to the dashboard.
    pub fn wizard_next(&mut self) -> Transition {
        let transition = self.wizard.next(&self.record);
        if transition == Transition::Finished {
            self.router.navigate(Navigation::WizardDone);
        }
        transition
    }

    /// Step the wizard back.
    pub fn wizard_back(&mut self) -> Step {
        self.wizard.back()
    }

    /// Finish the wizard if the record is complete.
    pub fn wizard_finish(&mut self) -> Transition {
        let transition = self.wizard.finish(&self.record);
        if transition == Transition::Finished {
            info!("Intake wizard finished");
            self.router.navigate(Navigation::WizardDone);
        }
        transition
    }

    /// Apply a navigation action.
    ///
    /// Entering settings seeds a fresh draft; leaving settings by any route
    /// other than a successful save discards it.
    pub fn navigate(&mut self, action: Navigation) -> View {
        let view = self.router.navigate(action);
        match view {
            View::Settings => self.draft = Some(SettingsDraft::new(&self.record)),
            View::Wizard => {
                self.draft = None;
                self.wizard.reset();
            }
            View::Dashboard | View::Public => self.draft = None,
        }
        view
    }

    /// Edit the settings draft. Returns `false` if settings are not open.
    pub fn settings_edit(&mut self, field: ProfileField, value: &str) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Toggle sync on the settings draft. Returns `false` if settings are not open.
    pub fn settings_set_sync(&mut self, enabled: bool) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.set_sync_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Commit the draft if it is complete, then return to the dashboard.
    ///
    /// Without an open draft this is a rejected save with no issues.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn settings_save(&mut self) -> Result<SaveOutcome> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(SaveOutcome::Rejected(Vec::new()));
        };
        let mut next = self.record.clone();
        let outcome = draft.commit(&mut next);
        if outcome == SaveOutcome::Saved {
            self.persist(next)?;
            info!("Settings saved");
            self.navigate(Navigation::GoDashboard);
        }
        Ok(outcome)
    }

    /// Discard the draft and return to the dashboard.
    pub fn settings_cancel(&mut self) -> View {
        debug!("Settings cancelled");
        self.navigate(Navigation::Back)
    }

    /// Ask the dashboard to render a code for the current link if needed.
    pub fn refresh_code(&mut self) -> bool {
        self.dashboard.refresh(&self.record)
    }

    /// Re-render the code for the current link.
    pub fn retry_code(&mut self) {
        self.dashboard.retry(&self.record);
    }

    /// Wait for the in-flight code render, if any.
    pub async fn settle_code(&mut self) {
        self.dashboard.settle().await;
    }

    /// Save the scan code for the current link into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CodeNotReady`] until a code for the current
    /// link exists, or an I/O error if writing fails.
    pub fn download_code(&mut self, dir: &Path) -> Result<PathBuf> {
        self.dashboard.download(&self.record, dir)
    }

    /// Save the scan code for the current link to an explicit path.
    ///
    /// # Errors
    ///
    /// Same as [`App::download_code`].
    pub fn write_code(&mut self, path: &Path) -> Result<()> {
        self.dashboard.download_to(&self.record, path)
    }

    /// Copy the public link to `clipboard` and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    pub fn copy_url(&self, clipboard: &mut dyn ClipboardSink) -> Result<String> {
        self.dashboard.copy_url(&self.record, clipboard)
    }

    /// Store `next`, and only then make it the live record.
    fn persist(&mut self, next: ProfileRecord) -> Result<()> {
        if self.store.save_profile(&next)? == SaveStatus::Written {
            debug!("Profile persisted");
        }
        self.record = next;
        Ok(())
    }
}
