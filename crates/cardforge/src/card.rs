//! The public card and its contact links.

use crate::profile::{ProfileRecord, DEFAULT_THEME_COLOR};
use crate::validate::is_complete;

/// A tappable contact action on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    /// Button label.
    pub label: &'static str,
    /// Link target.
    pub href: String,
}

/// Everything the public card shows, borrowed from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicCard<'a> {
    /// Card title.
    pub business_name: &'a str,
    /// Person name below the title.
    pub full_name: &'a str,
    /// Colour of the header band.
    pub theme_color: &'a str,
    /// Embedded avatar, if any.
    pub avatar_image: Option<&'a str>,
    /// Description.
    pub bio: &'a str,
    /// Postal address, if any.
    pub address: Option<&'a str>,
    /// Contact actions in display order.
    pub contacts: Vec<ContactLink>,
}

impl<'a> PublicCard<'a> {
    /// Build the card, or `None` if the record is not complete.
    #[must_use]
    pub fn build(record: &'a ProfileRecord) -> Option<Self> {
        if !is_complete(record) {
            return None;
        }

        let mut contacts = vec![
            ContactLink {
                label: "Call",
                href: format!("tel:{}", record.phone),
            },
            ContactLink {
                label: "WhatsApp",
                href: format!("https://wa.me/{}", record.whatsapp_digits()),
            },
            ContactLink {
                label: "Email",
                href: format!("mailto:{}", record.email),
            },
        ];
        if !record.website.is_empty() {
            contacts.push(ContactLink {
                label: "Website",
                href: website_href(&record.website),
            });
        }

        Some(Self {
            business_name: &record.business_name,
            full_name: &record.full_name,
            theme_color: if record.theme_color.is_empty() {
                DEFAULT_THEME_COLOR
            } else {
                &record.theme_color
            },
            avatar_image: record.avatar_image.as_deref(),
            bio: &record.bio,
            address: (!record.address.is_empty()).then_some(record.address.as_str()),
            contacts,
        })
    }
}

/// Prefix `https://` unless the value already names a scheme.
fn website_href(website: &str) -> String {
    if website.contains("://") {
        website.to_string()
    } else {
        format!("https://{website}")
    }
}
