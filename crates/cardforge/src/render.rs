//! Plain-text rendering of each screen.

use std::fmt::Write as _;

use crate::app::App;
use crate::card::PublicCard;
use crate::profile::{ProfileField, ProfileRecord};
use crate::router::{Screen, View};
use crate::scancode::CodeState;
use crate::settings::SettingsDraft;
use crate::validate::{issues, Issue};
use crate::wizard::{Step, Wizard};

/// Render whatever the app is currently showing.
#[must_use]
pub fn screen(app: &App) -> String {
    match app.screen() {
        Screen::View(View::Wizard) => wizard(app.wizard(), app.record()),
        Screen::View(View::Dashboard) => dashboard(app),
        Screen::View(View::Public) => match PublicCard::build(app.record()) {
            Some(card) => public_card(&card),
            None => blocked(&issues(app.record())),
        },
        Screen::View(View::Settings) => match app.draft() {
            Some(draft) => settings(draft, app.record()),
            None => dashboard(app),
        },
        Screen::PublicBlocked => blocked(&issues(app.record())),
    }
}

fn field_lines(out: &mut String, record: &ProfileRecord, fields: &[ProfileField]) {
    for field in fields {
        let marker = if field.is_required() { "*" } else { " " };
        let value = record.get(*field);
        let shown = if value.is_empty() { "-" } else { value };
        let _ = writeln!(out, "  {marker} {:<14} {shown}", field.label());
    }
}

/// The current wizard step with its fields and the continue state.
#[must_use]
pub fn wizard(wizard: &Wizard, record: &ProfileRecord) -> String {
    let step = wizard.step();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Step {} of {}: {}",
        step.number(),
        Step::COUNT,
        step.title()
    );
    field_lines(&mut out, record, step.fields());
    if step == Step::Photo {
        let avatar = if record.avatar_image.is_some() {
            "added"
        } else {
            "none (optional)"
        };
        let _ = writeln!(out, "    {:<14} {avatar}", "Photo");
    }

    let action = if step == Step::Photo { "finish" } else { "next" };
    if wizard.can_continue(record) {
        let _ = writeln!(out, "[{action}] available");
    } else {
        let _ = writeln!(out, "[{action}] disabled until the fields above are valid");
    }
    out
}

/// Share link and scan code state.
#[must_use]
pub fn dashboard(app: &App) -> String {
    let record = app.record();
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.business_name);
    let _ = writeln!(out, "Public link: {}", app.public_url());
    let code = match app.dashboard().code() {
        CodeState::Idle => "not generated".to_string(),
        CodeState::Pending { .. } => "generating...".to_string(),
        CodeState::Ready(code) => format!("ready ({} bytes)", code.png.len()),
        CodeState::Failed { message, .. } => format!("failed: {message} (use 'retry')"),
    };
    let _ = writeln!(out, "Scan code: {code}");
    let _ = writeln!(out, "Sync: {}", app.sync_status());
    let _ = writeln!(out, "Actions: public, settings, download, copy, restart");
    out
}

/// The public card.
#[must_use]
pub fn public_card(card: &PublicCard<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", card.theme_color);
    let _ = writeln!(out, "{}", card.business_name);
    let _ = writeln!(out, "{}", card.full_name);
    if card.avatar_image.is_some() {
        let _ = writeln!(out, "(photo)");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", card.bio);
    if let Some(address) = card.address {
        let _ = writeln!(out, "{address}");
    }
    let _ = writeln!(out);
    for contact in &card.contacts {
        let _ = writeln!(out, "{:<9} {}", contact.label, contact.href);
    }
    out
}

/// Notice shown instead of the public card for an incomplete record.
#[must_use]
pub fn blocked(problems: &[Issue]) -> String {
    let mut out = String::from("Your card is not ready to share yet.\n");
    for problem in problems {
        let _ = writeln!(out, "  - {problem}");
    }
    out.push_str("Actions: dashboard\n");
    out
}

/// The settings form over the staged copy.
#[must_use]
pub fn settings(draft: &SettingsDraft, live: &ProfileRecord) -> String {
    let staged = draft.staged();
    let mut out = String::from("Settings\n");
    field_lines(&mut out, staged, &ProfileField::ALL);
    let _ = writeln!(
        out,
        "    {:<14} {}",
        "Sync",
        if staged.sync_enabled { "on" } else { "off" }
    );
    if draft.is_dirty(live) {
        let _ = writeln!(out, "(unsaved changes)");
    }
    let problems = draft.issues();
    if !problems.is_empty() {
        let _ = writeln!(out, "Cannot save yet:");
        for problem in &problems {
            let _ = writeln!(out, "  - {problem}");
        }
    }
    let _ = writeln!(out, "Actions: save, cancel");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::router::Navigation;
    use crate::store::Store;
    use crate::validate::tests::complete_record;

    fn app_with(record: &ProfileRecord) -> App {
        let mut store = Store::open_in_memory().unwrap();
        store.save_profile(record).unwrap();
        App::with_store(store, &Config::default()).unwrap()
    }

    #[test]
    fn test_wizard_disabled_continue() {
        let text = wizard(&Wizard::new(), &ProfileRecord::default());
        assert!(text.starts_with("Step 1 of 4"));
        assert!(text.contains("Business name"));
        assert!(text.contains("[next] disabled"));
    }

    #[test]
    fn test_wizard_enabled_continue() {
        let text = wizard(&Wizard::new(), &complete_record());
        assert!(text.contains("Acme Tools"));
        assert!(text.contains("[next] available"));
    }

    #[test]
    fn test_dashboard_shows_link() {
        let app = app_with(&complete_record());
        let text = screen(&app);
        assert!(text.contains("Public link: http://localhost:5173/u/acme"));
        assert!(text.contains("Scan code: not generated"));
    }

    #[test]
    fn test_public_card_rendering() {
        let record = complete_record();
        let card = PublicCard::build(&record).unwrap();
        let text = public_card(&card);
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("https://wa.me/15550101"));
        assert!(text.contains("mailto:ada@acme.test"));
    }

    #[test]
    fn test_blocked_notice() {
        let mut app = app_with(&ProfileRecord::default());
        app.navigate(Navigation::GoPublic);
        let text = screen(&app);
        assert!(text.contains("not ready to share"));
        assert!(text.contains("Business name is required"));
        assert!(text.contains("Actions: dashboard"));
    }

    #[test]
    fn test_settings_rendering() {
        let mut app = app_with(&complete_record());
        app.navigate(Navigation::GoSettings);
        app.settings_edit(ProfileField::Email, "oops");
        let text = screen(&app);
        assert!(text.starts_with("Settings"));
        assert!(text.contains("(unsaved changes)"));
        assert!(text.contains("Email must look like"));
    }
}
