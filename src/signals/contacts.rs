use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Domains whose addresses are dropped as personal or placeholder.
pub const EMAIL_DOMAIN_DENYLIST: [&str; 4] = ["example.com", "test.com", "gmail.com", "yahoo.com"];

const SOCIAL_PLATFORMS: [(&str, &str); 5] = [
    ("linkedin", "linkedin.com"),
    ("twitter", "twitter.com"),
    ("facebook", "facebook.com"),
    ("instagram", "instagram.com"),
    ("youtube", "youtube.com"),
];

/// Deduplicated contact data for one company. Sets keep output stable
/// across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSignals {
    pub emails: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    pub social_links: BTreeMap<String, String>,
}

pub struct ContactExtractor {
    email_regex: Regex,
    us_phone_regex: Regex,
    intl_phone_regex: Regex,
    link_selector: Selector,
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
            us_phone_regex: Regex::new(
                r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}",
            )
            .unwrap(),
            intl_phone_regex: Regex::new(
                r"\+[0-9]{1,3}[-.\s]?[0-9]{3,4}[-.\s]?[0-9]{3,4}[-.\s]?[0-9]{3,4}",
            )
            .unwrap(),
            link_selector: Selector::parse("a[href]").unwrap(),
        }
    }

    /// Emails, phone numbers and social links for one source document.
    /// `text` is the plain-text corpus; `html` is raw markup used for the
    /// anchor scan.
    pub fn extract_contact_signals(&self, text: &str, html: &str) -> ContactSignals {
        let signals = ContactSignals {
            emails: self.extract_emails(text),
            phone_numbers: self.extract_phone_numbers(text),
            social_links: self.extract_social_links(html),
        };
        debug!(
            "Contact signals: {} emails, {} phones, {} social links",
            signals.emails.len(),
            signals.phone_numbers.len(),
            signals.social_links.len()
        );
        signals
    }

    /// Addresses whose domain matches or ends with a denylisted domain are
    /// dropped. Idempotent over its own output.
    pub fn extract_emails(&self, text: &str) -> BTreeSet<String> {
        self.email_regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|email| !is_denylisted(email))
            .collect()
    }

    /// Two surface patterns (US grouped digits, international groups),
    /// validated by requiring at least 10 digits after stripping
    /// formatting, deduplicated by the cleaned string.
    pub fn extract_phone_numbers(&self, text: &str) -> BTreeSet<String> {
        let mut numbers = BTreeSet::new();
        for regex in [&self.us_phone_regex, &self.intl_phone_regex] {
            for m in regex.find_iter(text) {
                let cleaned: String = m
                    .as_str()
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect();
                let digit_count = cleaned.chars().filter(|c| c.is_ascii_digit()).count();
                if digit_count >= 10 {
                    numbers.insert(cleaned);
                }
            }
        }
        numbers
    }

    /// First href per known platform wins, in document order.
    pub fn extract_social_links(&self, html: &str) -> BTreeMap<String, String> {
        let document = Html::parse_document(html);
        let mut links = BTreeMap::new();

        for element in document.select(&self.link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href_lower = href.to_lowercase();
            for (platform, domain) in SOCIAL_PLATFORMS {
                if href_lower.contains(domain) {
                    links
                        .entry(platform.to_string())
                        .or_insert_with(|| href.to_string());
                    break;
                }
            }
        }

        links
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_denylisted(email: &str) -> bool {
    let Some(domain) = email.rsplit('@').next() else {
        return true;
    };
    EMAIL_DOMAIN_DENYLIST
        .iter()
        .any(|d| domain == *d || domain.ends_with(&format!(".{}", d)))
}
