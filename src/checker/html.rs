// src/checker/html.rs
// =============================================================================
// This module pulls raw link targets out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so broken real-world
//   markup still parses
//
// Note that we return the href values exactly as written in the page.
// Resolving relative links and throwing away mailto:/javascript: links is
// the job of crawl::filter, which knows the page URL and the accepted
// patterns.
// =============================================================================

use scraper::{Html, Selector};

// Extracts the href attribute of every <a> element, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='mailto:me@x.org'>Mail</a>"
//   result = ["/docs", "mailto:me@x.org"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    // "a[href]" means "all <a> tags that have an href attribute"
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        assert_eq!(extract_hrefs(html), vec!["https://www.rust-lang.org"]);
    }

    #[test]
    fn test_keeps_raw_values() {
        let html = r##"
            <a href="/docs">Docs</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="#top">Top</a>
        "##;
        assert_eq!(
            extract_hrefs(html),
            vec!["/docs", "mailto:test@example.com", "#top"]
        );
    }

    #[test]
    fn test_skips_anchors_without_href() {
        let html = r#"<a name="here">Here</a><a href="/there">There</a>"#;
        assert_eq!(extract_hrefs(html), vec!["/there"]);
    }

    #[test]
    fn test_ignores_other_elements() {
        let html = r#"<link href="/style.css"><img src="/logo.png"><p>text</p>"#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_broken_markup_still_parses() {
        let html = r#"<div><a href="/one">one<a href="/two">two</div"#;
        assert_eq!(extract_hrefs(html), vec!["/one", "/two"]);
    }
}
