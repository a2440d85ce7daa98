//! The profile record and its editable fields.
//!
//! A single [`ProfileRecord`] holds everything shown on the card. Fields are
//! plain strings so that an absent value and an empty form input look the
//! same; only the avatar is an `Option`.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Colour band used when nothing else has been picked.
pub const DEFAULT_THEME_COLOR: &str = "#2563eb";

static SLUG_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("slug pattern is valid"));

/// Normalize user input into a URL-safe slug.
///
/// Input is lowercased and anything outside `[a-z0-9-]` is dropped.
#[must_use]
pub fn normalize_slug(input: &str) -> String {
    SLUG_DISALLOWED
        .replace_all(&input.to_lowercase(), "")
        .into_owned()
}

/// The persisted business-card profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Name of the business shown as the card title.
    pub business_name: String,
    /// Name of the person behind the card.
    pub full_name: String,
    /// Phone number used for the dial link.
    pub phone: String,
    /// Messaging number; only its digits end up in the deep link.
    pub whatsapp: String,
    /// Contact e-mail address.
    pub email: String,
    /// Optional website, empty when absent.
    pub website: String,
    /// Short description.
    pub bio: String,
    /// Optional postal address, empty when absent.
    pub address: String,
    /// Optional embedded avatar as a `data:` URL.
    pub avatar_image: Option<String>,
    /// URL-safe handle of the public card.
    pub slug: String,
    /// CSS colour of the card band.
    pub theme_color: String,
    /// Whether the user opted into cloud sync.
    pub sync_enabled: bool,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            full_name: String::new(),
            phone: String::new(),
            whatsapp: String::new(),
            email: String::new(),
            website: String::new(),
            bio: String::new(),
            address: String::new(),
            avatar_image: None,
            slug: String::new(),
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            sync_enabled: false,
        }
    }
}

/// A text field of the profile that can be edited by name.
///
/// The avatar and the sync toggle are not text fields and have dedicated
/// setters on [`ProfileRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    /// `businessName`
    BusinessName,
    /// `fullName`
    FullName,
    /// `phone`
    Phone,
    /// `whatsapp`
    Whatsapp,
    /// `email`
    Email,
    /// `website`
    Website,
    /// `bio`
    Bio,
    /// `address`
    Address,
    /// `slug`
    Slug,
    /// `themeColor`
    ThemeColor,
}

impl ProfileField {
    /// Every editable text field, in form order.
    pub const ALL: [Self; 10] = [
        Self::BusinessName,
        Self::FullName,
        Self::Slug,
        Self::ThemeColor,
        Self::Phone,
        Self::Whatsapp,
        Self::Email,
        Self::Website,
        Self::Bio,
        Self::Address,
    ];

    /// Fields that must be non-empty for the card to be complete.
    pub const REQUIRED: [Self; 7] = [
        Self::BusinessName,
        Self::FullName,
        Self::Phone,
        Self::Whatsapp,
        Self::Email,
        Self::Bio,
        Self::Slug,
    ];

    /// The snake_case name used on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::BusinessName => "business_name",
            Self::FullName => "full_name",
            Self::Phone => "phone",
            Self::Whatsapp => "whatsapp",
            Self::Email => "email",
            Self::Website => "website",
            Self::Bio => "bio",
            Self::Address => "address",
            Self::Slug => "slug",
            Self::ThemeColor => "theme_color",
        }
    }

    /// Human-readable label for forms and notices.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BusinessName => "Business name",
            Self::FullName => "Full name",
            Self::Phone => "Phone",
            Self::Whatsapp => "WhatsApp",
            Self::Email => "Email",
            Self::Website => "Website",
            Self::Bio => "Bio",
            Self::Address => "Address",
            Self::Slug => "Profile link",
            Self::ThemeColor => "Theme color",
        }
    }

    /// Whether the field belongs to the required set.
    #[must_use]
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = Error;

    /// Accepts both `business_name` and `businessName` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.key().replace('_', "") == folded)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

impl ProfileRecord {
    /// Read a text field.
    #[must_use]
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::BusinessName => &self.business_name,
            ProfileField::FullName => &self.full_name,
            ProfileField::Phone => &self.phone,
            ProfileField::Whatsapp => &self.whatsapp,
            ProfileField::Email => &self.email,
            ProfileField::Website => &self.website,
            ProfileField::Bio => &self.bio,
            ProfileField::Address => &self.address,
            ProfileField::Slug => &self.slug,
            ProfileField::ThemeColor => &self.theme_color,
        }
    }

    /// Write a text field. The slug is normalized on the way in.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            ProfileField::BusinessName => &mut self.business_name,
            ProfileField::FullName => &mut self.full_name,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Whatsapp => &mut self.whatsapp,
            ProfileField::Email => &mut self.email,
            ProfileField::Website => &mut self.website,
            ProfileField::Bio => &mut self.bio,
            ProfileField::Address => &mut self.address,
            ProfileField::Slug => {
                self.slug = normalize_slug(&value);
                return;
            }
            ProfileField::ThemeColor => &mut self.theme_color,
        };
        *slot = value;
    }

    /// Replace or clear the embedded avatar.
    pub fn set_avatar(&mut self, data_url: Option<String>) {
        self.avatar_image = data_url;
    }

    /// Only the digits of the messaging number.
    #[must_use]
    pub fn whatsapp_digits(&self) -> String {
        self.whatsapp.chars().filter(char::is_ascii_digit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_empty() {
        let record = ProfileRecord::default();
        for field in ProfileField::REQUIRED {
            assert!(record.get(field).is_empty(), "{field} should be empty");
        }
        assert!(record.avatar_image.is_none());
        assert!(!record.sync_enabled);
        assert_eq!(record.theme_color, DEFAULT_THEME_COLOR);
    }

    #[test]
    fn test_normalize_slug_strips_and_lowercases() {
        assert_eq!(normalize_slug("Vishnu_Vardhan!!"), "vishnuvardhan");
        assert_eq!(normalize_slug("acme-co 2024"), "acme-co2024");
        assert_eq!(normalize_slug("Café"), "caf");
        assert_eq!(normalize_slug(""), "");
    }

    #[test]
    fn test_normalize_slug_idempotent() {
        for input in ["Vishnu_Vardhan!!", "ACME--Co", "  spaced out  ", "ÀÉÎ-42"] {
            let once = normalize_slug(input);
            assert_eq!(normalize_slug(&once), once);
        }
    }

    #[test]
    fn test_set_slug_normalizes() {
        let mut record = ProfileRecord::default();
        record.set(ProfileField::Slug, "My Card!");
        assert_eq!(record.slug, "mycard");
    }

    #[test]
    fn test_set_and_get_round_trip_for_every_field() {
        let mut record = ProfileRecord::default();
        for field in ProfileField::ALL {
            record.set(field, "value-1");
            assert_eq!(record.get(field), "value-1");
        }
    }

    #[test]
    fn test_field_from_str_accepts_both_spellings() {
        assert_eq!(
            "business_name".parse::<ProfileField>().unwrap(),
            ProfileField::BusinessName
        );
        assert_eq!(
            "businessName".parse::<ProfileField>().unwrap(),
            ProfileField::BusinessName
        );
        assert_eq!(
            "theme-color".parse::<ProfileField>().unwrap(),
            ProfileField::ThemeColor
        );
        assert!(matches!(
            "nickname".parse::<ProfileField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_required_set() {
        assert_eq!(ProfileField::REQUIRED.len(), 7);
        assert!(ProfileField::Bio.is_required());
        assert!(!ProfileField::Website.is_required());
        assert!(!ProfileField::Address.is_required());
        assert!(!ProfileField::ThemeColor.is_required());
    }

    #[test]
    fn test_whatsapp_digits() {
        let mut record = ProfileRecord::default();
        record.set(ProfileField::Whatsapp, "+91 98765-43210");
        assert_eq!(record.whatsapp_digits(), "919876543210");
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let mut record = ProfileRecord::default();
        record.set(ProfileField::BusinessName, "Acme");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["businessName"], "Acme");
        assert!(json.get("themeColor").is_some());
        assert!(json.get("syncEnabled").is_some());
    }

    #[test]
    fn test_deserialize_fills_missing_fields_with_defaults() {
        let record: ProfileRecord =
            serde_json::from_str(r#"{"businessName":"Acme","slug":"acme"}"#).unwrap();
        assert_eq!(record.business_name, "Acme");
        assert_eq!(record.slug, "acme");
        assert_eq!(record.theme_color, DEFAULT_THEME_COLOR);
        assert!(record.phone.is_empty());
    }
}
