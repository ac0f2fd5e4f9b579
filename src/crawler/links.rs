use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Vocabulary deciding whether a discovered link is worth crawling. One
/// match qualifies a link; there is no ranking by match count.
pub const RELEVANCE_KEYWORDS: [&str; 13] = [
    "about",
    "team",
    "company",
    "leadership",
    "founders",
    "products",
    "services",
    "solutions",
    "contact",
    "careers",
    "investors",
    "press",
    "news",
];

/// Selects a bounded set of same-domain pages worth crawling.
pub struct LinkClassifier {
    link_selector: Selector,
}

impl LinkClassifier {
    pub fn new() -> Self {
        Self {
            link_selector: Selector::parse("a[href]").unwrap(),
        }
    }

    /// Returns relevant same-domain links in encounter order, deduplicated
    /// by resolved absolute URL, capped at `budget`.
    pub fn select_relevant_links(&self, base: &Url, html: &str, budget: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        let base_host = normalized_host(base);

        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for element in document.select(&self.link_selector) {
            if selected.len() >= budget {
                break;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(resolved) = base.join(href) else {
                continue;
            };

            // Same-site only: never follow to third-party domains.
            if normalized_host(&resolved) != base_host {
                continue;
            }

            let anchor_text = element.text().collect::<String>();
            let haystack = format!("{} {}", href, anchor_text).to_lowercase();
            if !RELEVANCE_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
                continue;
            }

            let absolute = resolved.to_string();
            if seen.insert(absolute.clone()) {
                selected.push(absolute);
            }
        }

        debug!("Selected {} relevant links from {}", selected.len(), base);
        selected
    }
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn normalized_host(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.strip_prefix("www.").unwrap_or(h).to_lowercase())
}
