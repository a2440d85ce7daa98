//! Line-driven interactive session.
//!
//! Each input line is parsed into a [`Command`], applied to the [`App`], and
//! answered with an optional note followed by the rendered screen. The
//! session is generic over its input, output and clipboard so it can be
//! driven from a script in tests.

use std::path::PathBuf;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::app::App;
use crate::clipboard::ClipboardSink;
use crate::error::{Error, Result};
use crate::profile::ProfileField;
use crate::render;
use crate::router::{Navigation, Screen, View};
use crate::settings::SaveOutcome;
use crate::wizard::{Step, Transition};

/// Command summary printed by `help`.
pub const HELP: &str = "\
Commands:
  set FIELD VALUE    edit a field (also FIELD=VALUE; 'set sync on|off' in settings)
  next | back        move through the wizard
  finish             leave the wizard once the card is complete
  avatar PATH        add a photo (wizard step 4 or settings)
  dashboard          open the dashboard
  public             open the public card
  settings           edit the card
  save | cancel      leave settings
  download [DIR]     save the scan code as PNG
  copy               copy the public link
  retry              render the scan code again
  restart            run the wizard again
  show | help | quit
";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-render the current screen.
    Show,
    /// Edit a text field.
    Set(ProfileField, String),
    /// Toggle sync on the settings draft.
    Sync(bool),
    /// Wizard: next step.
    Next,
    /// Wizard: previous step. Elsewhere: back to the dashboard.
    Back,
    /// Wizard: finish.
    Finish,
    /// Open the dashboard.
    Dashboard,
    /// Open the public card.
    Public,
    /// Open settings.
    Settings,
    /// Save settings.
    Save,
    /// Discard settings.
    Cancel,
    /// Import an avatar image.
    Avatar(PathBuf),
    /// Save the scan code, optionally into a directory.
    Download(Option<PathBuf>),
    /// Copy the public link.
    Copy,
    /// Re-render the scan code.
    Retry,
    /// Run the wizard again.
    Restart,
    /// Print the command summary.
    Help,
    /// End the session.
    Quit,
}

/// Parse a `FIELD=VALUE` pair.
///
/// # Errors
///
/// Returns an error if there is no `=` or the field name is unknown.
pub fn parse_assignment(input: &str) -> Result<(ProfileField, String)> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| Error::invalid_input(format!("expected FIELD=VALUE, got '{input}'")))?;
    let field = name.trim().parse()?;
    Ok((field, value.trim().to_string()))
}

fn parse_switch(input: &str) -> Result<bool> {
    match input.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(Error::invalid_input(format!(
            "expected on or off, got '{other}'"
        ))),
    }
}

fn parse_set(rest: &str) -> Result<Command> {
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if rest[..name_end].contains('=') {
        let (field, value) = parse_assignment(rest)?;
        return Ok(Command::Set(field, value));
    }

    let (name, value) = rest.split_at(name_end);
    let value = value.trim();
    if name.is_empty() {
        return Err(Error::invalid_input("set needs a field name"));
    }
    if name.eq_ignore_ascii_case("sync") {
        return parse_switch(value).map(Command::Sync);
    }
    Ok(Command::Set(name.parse()?, value.to_string()))
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "" | "show" => Self::Show,
            "set" => parse_set(rest)?,
            "next" => Self::Next,
            "back" => Self::Back,
            "finish" => Self::Finish,
            "dashboard" => Self::Dashboard,
            "public" => Self::Public,
            "settings" => Self::Settings,
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "avatar" if rest.is_empty() => {
                return Err(Error::invalid_input("avatar needs a file path"))
            }
            "avatar" => Self::Avatar(PathBuf::from(rest)),
            "download" => Self::Download((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "copy" => Self::Copy,
            "retry" => Self::Retry,
            "restart" => Self::Restart,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(Error::invalid_input(format!(
                    "unknown command '{other}', try 'help'"
                )))
            }
        };
        Ok(command)
    }
}

/// What the session wants to do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this and keep reading.
    Continue(String),
    /// Stop.
    Quit,
}

/// An interactive session over one [`App`].
#[derive(Debug)]
pub struct Session<C> {
    app: App,
    clipboard: C,
    download_dir: PathBuf,
}

impl<C: ClipboardSink> Session<C> {
    /// Create a session. Downloads without a directory go to `download_dir`.
    pub fn new(app: App, clipboard: C, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            app,
            clipboard,
            download_dir: download_dir.into(),
        }
    }

    /// The application state.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// The clipboard the session copies into.
    #[must_use]
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Apply one command.
    ///
    /// Gate failures are reported in the reply text. Errors are returned
    /// only for failed I/O: persisting, image import, clipboard or writing a
    /// download.
    ///
    /// # Errors
    ///
    /// See above.
    pub async fn execute(&mut self, command: Command) -> Result<Reply> {
        debug!(command = ?command, view = %self.app.view(), "Session command");
        let view = self.app.view();
        let note = match command {
            Command::Quit => return Ok(Reply::Quit),
            Command::Help => return Ok(Reply::Continue(HELP.to_string())),
            Command::Show => None,
            Command::Set(field, value) => self.set_field(field, &value)?,
            Command::Sync(enabled) => {
                (!self.app.settings_set_sync(enabled)).then(|| open_settings_first("sync"))
            }
            Command::Next if view == View::Wizard => match self.app.wizard_next() {
                Transition::Blocked => Some("Fill in the fields above to continue.".to_string()),
                Transition::Moved(_) | Transition::Finished => None,
            },
            Command::Back if view == View::Wizard => {
                self.app.wizard_back();
                None
            }
            Command::Finish if view == View::Wizard => match self.app.wizard_finish() {
                Transition::Blocked if self.app.wizard().step() != Step::Photo => {
                    Some("Finish is on the last step.".to_string())
                }
                Transition::Blocked => {
                    Some("Your card is not complete yet; go back and fix it.".to_string())
                }
                Transition::Moved(_) | Transition::Finished => None,
            },
            Command::Next | Command::Finish => Some(not_here("the wizard", view)),
            Command::Back => match view {
                View::Settings => {
                    self.app.settings_cancel();
                    None
                }
                View::Public => {
                    self.app.navigate(Navigation::Back);
                    None
                }
                _ => Some(not_here("the wizard, public card or settings", view)),
            },
            Command::Dashboard => {
                self.app.navigate(Navigation::GoDashboard);
                None
            }
            Command::Public => {
                self.app.navigate(Navigation::GoPublic);
                None
            }
            Command::Settings => {
                self.app.navigate(Navigation::GoSettings);
                None
            }
            Command::Restart => {
                self.app.navigate(Navigation::Restart);
                None
            }
            Command::Save if view == View::Settings => match self.app.settings_save()? {
                SaveOutcome::Saved => Some("Saved.".to_string()),
                SaveOutcome::Rejected(_) => Some("Not saved.".to_string()),
            },
            Command::Cancel if view == View::Settings => {
                self.app.settings_cancel();
                Some("Changes discarded.".to_string())
            }
            Command::Save | Command::Cancel => Some(not_here("settings", view)),
            Command::Avatar(path) => {
                let allowed = view == View::Settings
                    || (view == View::Wizard && self.app.wizard().step() == Step::Photo);
                if allowed {
                    self.app.import_avatar(&path)?;
                    Some("Photo added.".to_string())
                } else {
                    Some("Photos are added on wizard step 4 or in settings.".to_string())
                }
            }
            Command::Download(dir) if view == View::Dashboard => {
                self.app.refresh_code();
                self.app.settle_code().await;
                let dir = dir.unwrap_or_else(|| self.download_dir.clone());
                match self.app.download_code(&dir) {
                    Ok(path) => Some(format!("Saved {}", path.display())),
                    Err(e) if e.is_code_not_ready() => {
                        Some("The scan code is not ready yet.".to_string())
                    }
                    Err(e) => return Err(e),
                }
            }
            Command::Copy if self.app.screen() == Screen::PublicBlocked => {
                Some("The card is not complete yet; there is no link to copy.".to_string())
            }
            Command::Copy if matches!(view, View::Dashboard | View::Public) => {
                let url = self.app.copy_url(&mut self.clipboard)?;
                Some(format!("Copied {url}"))
            }
            Command::Retry if view == View::Dashboard => {
                self.app.retry_code();
                None
            }
            Command::Download(_) | Command::Copy | Command::Retry => {
                Some(not_here("the dashboard", view))
            }
        };

        if self.app.view() == View::Dashboard {
            self.app.refresh_code();
            self.app.settle_code().await;
        }

        let mut text = String::new();
        if let Some(note) = note {
            text.push_str(&note);
            text.push('\n');
        }
        text.push_str(&render::screen(&self.app));
        Ok(Reply::Continue(text))
    }

    fn set_field(&mut self, field: ProfileField, value: &str) -> Result<Option<String>> {
        match self.app.view() {
            View::Settings => {
                self.app.settings_edit(field, value);
                Ok(None)
            }
            View::Wizard => {
                let step = self.app.wizard().step();
                if step.fields().contains(&field) {
                    self.app.edit_field(field, value)?;
                    return Ok(None);
                }
                Ok(Some(match Step::containing(field) {
                    Some(home) => format!("{} is edited on step {}.", field.label(), home.number()),
                    None => format!("{} cannot be edited here.", field.label()),
                }))
            }
            View::Dashboard | View::Public => Ok(Some(open_settings_first("edit"))),
        }
    }

    /// Read commands from `input` until it ends or `quit`, writing replies
    /// to `output`. Command errors are printed and the session goes on.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Reply::Continue(text) = self.execute(Command::Show).await? {
            output.write_all(text.as_bytes()).await?;
        }

        let mut lines = input.lines();
        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let reply = match line.parse::<Command>() {
                Ok(command) => self.execute(command).await,
                Err(e) => Err(e),
            };
            match reply {
                Ok(Reply::Continue(text)) => output.write_all(text.as_bytes()).await?,
                Ok(Reply::Quit) => break,
                Err(e) => {
                    output
                        .write_all(format!("error: {e}\n").as_bytes())
                        .await?;
                }
            }
        }

        output.write_all(b"\n").await?;
        output.flush().await?;
        Ok(())
    }
}

fn not_here(place: &str, view: View) -> String {
    format!("That only works in {place}; you are in {view}.")
}

fn open_settings_first(action: &str) -> String {
    format!("Open settings to {action} your card.")
}
