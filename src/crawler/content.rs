use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Converts raw markup into normalized plain text and company-name
/// heuristics. Every method is total: malformed input degrades to a
/// best-effort result, never a panic.
pub struct ContentExtractor {
    script_regex: Regex,
    style_regex: Regex,
    title_selector: Selector,
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self {
            script_regex: Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap(),
            style_regex: Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap(),
            title_selector: Selector::parse("title").unwrap(),
        }
    }

    /// Strips script/style blocks and all markup, collapses whitespace.
    pub fn extract_text(&self, html: &str) -> String {
        let without_scripts = self.script_regex.replace_all(html, " ");
        let without_styles = self.style_regex.replace_all(&without_scripts, " ");

        let document = Html::parse_document(&without_styles);
        document
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Title-based company-name heuristic: first segment of the title on
    /// common separators, only when the full title is under 100 chars.
    pub fn extract_title(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let title = document
            .select(&self.title_selector)
            .next()
            .map(|t| t.text().collect::<String>())?;

        let title = title.trim();
        if title.is_empty() || title.chars().count() >= 100 {
            return None;
        }

        let first = title
            .split(" - ")
            .next()
            .unwrap_or(title)
            .split(" | ")
            .next()
            .unwrap_or(title)
            .trim();

        if first.is_empty() {
            None
        } else {
            Some(first.to_string())
        }
    }

    /// Company-name guess: title heuristic, then the domain's left-most
    /// label capitalized, then a literal fallback. Never fails.
    pub fn extract_company_name(&self, url: &str, html: &str) -> String {
        if let Some(title) = self.extract_title(html) {
            return title;
        }

        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                let host = host.strip_prefix("www.").unwrap_or(host);
                if let Some(label) = host.split('.').next() {
                    if !label.is_empty() {
                        return capitalize(label);
                    }
                }
            }
        }

        "Unknown Company".to_string()
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let extractor = ContentExtractor::new();
        let html = r#"<html><head><style>body { color: red; }</style></head>
            <body><script>var x = "hidden";</script><p>Acme   builds</p>
            <div>rockets</div></body></html>"#;
        let text = extractor.extract_text(html);
        assert_eq!(text, "Acme builds rockets");
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn title_splits_on_separators() {
        let extractor = ContentExtractor::new();
        let html = "<html><head><title>Acme Corp - Home</title></head></html>";
        assert_eq!(extractor.extract_title(html), Some("Acme Corp".to_string()));

        let html = "<html><head><title>Acme Corp | Rockets</title></head></html>";
        assert_eq!(extractor.extract_title(html), Some("Acme Corp".to_string()));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let extractor = ContentExtractor::new();
        let long = "x".repeat(120);
        let html = format!("<html><head><title>{}</title></head></html>", long);
        assert_eq!(extractor.extract_title(&html), None);
    }

    #[test]
    fn company_name_falls_back_to_domain() {
        let extractor = ContentExtractor::new();
        let name = extractor.extract_company_name("https://www.acme.io/about", "<p>no title</p>");
        assert_eq!(name, "Acme");
    }

    #[test]
    fn company_name_is_total() {
        let extractor = ContentExtractor::new();
        for (url, html) in [
            ("", ""),
            ("not a url", "<<<<not html"),
            ("ftp://", "\u{0000}\u{FFFD}"),
        ] {
            let name = extractor.extract_company_name(url, html);
            assert!(!name.is_empty());
        }
        assert_eq!(extractor.extract_company_name("", ""), "Unknown Company");
    }
}
