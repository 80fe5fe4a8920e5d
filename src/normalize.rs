// src/normalize.rs
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::models::{EntityKind, EntityRecord, RawRecord};

static EMAIL_FIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});
static EMAIL_VALID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})")
        .expect("valid regex")
});
static HOA_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(estates|village|community|garden|towers|lake|place|terrace|club|hills|palms)\b")
        .expect("valid regex")
});
static PM_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(realty|properties|management|services|rental|leasing)\b")
        .expect("valid regex")
});

const HOA_INDICATORS: &[&str] = &[
    "homeowners association",
    "hoa",
    "condominium association",
    "condo association",
    "community association",
    "property owners association",
    "townhome association",
    "residential association",
    "neighborhood association",
];

const PM_INDICATORS: &[&str] = &[
    "property management",
    "property manager",
    "real estate management",
    "community management",
    "rental management",
    "property services",
    "realty management",
    "rental services",
    "leasing services",
    "landlord services",
    "real estate services",
];

/// Format North American numbers as `(AAA) BBB-CCCC`. Anything that does not
/// clean to 10 digits (or 11 with a leading 1) is passed through unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
        11 if digits.starts_with('1') => {
            format!("({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..])
        }
        _ => phone.to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    !trimmed.is_empty() && EMAIL_VALID_RE.is_match(trimmed)
}

/// Contact fields opportunistically pulled out of unstructured text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Pull the first email-shaped and first phone-shaped substring out of free
/// text. Returns an empty result when nothing matches.
pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: EMAIL_FIND_RE
            .find(text)
            .map(|m| m.as_str().to_lowercase()),
        phone: PHONE_RE.find(text).map(|m| format_phone(m.as_str())),
    }
}

/// Classify a record from its name and description. Indicator lists decide
/// first; a coarse lexical check on the name alone breaks the tie when
/// neither list matches.
pub fn classify_entity_type(name: &str, description: &str) -> EntityKind {
    let text = format!("{} {}", name, description).to_lowercase();
    let is_hoa = HOA_INDICATORS.iter().any(|ind| text.contains(ind));
    let is_pm = PM_INDICATORS.iter().any(|ind| text.contains(ind));
    match (is_hoa, is_pm) {
        (true, false) => EntityKind::Hoa,
        (false, true) => EntityKind::PropertyManagement,
        (true, true) => EntityKind::Both,
        (false, false) => {
            if HOA_NAME_RE.is_match(name) {
                EntityKind::Hoa
            } else if PM_NAME_RE.is_match(name) {
                EntityKind::PropertyManagement
            } else {
                EntityKind::Unknown
            }
        }
    }
}

/// Normalize a raw record into its export shape: phone formatted, email
/// validated or cleared, entity type classified, source metadata stamped.
pub fn finalize_record(
    raw: RawRecord,
    scraped_at: DateTime<Utc>,
    source_type: &str,
    source_region: &str,
) -> EntityRecord {
    let name = raw.name.trim().to_string();
    let snippet = raw.snippet.unwrap_or_default();
    let email = raw
        .email
        .filter(|e| is_valid_email(e))
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    EntityRecord {
        entity_type: classify_entity_type(&name, &snippet),
        name,
        address: raw.address.map(|a| a.trim().to_string()).unwrap_or_default(),
        phone: raw.phone.map(|p| format_phone(&p)).unwrap_or_default(),
        email,
        website: raw.website.unwrap_or_default(),
        scraped_at,
        source_type: source_type.to_string(),
        source_region: source_region.to_string(),
    }
}
