use crate::domain::collapse_whitespace;
use scraper::{Html, Selector};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub heading: String,
    pub site_name: String,
}

impl PageMetadata {
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self {
            title: extract_title(&document).unwrap_or_default(),
            description: extract_meta(&document, "description").unwrap_or_default(),
            keywords: extract_meta(&document, "keywords").unwrap_or_default(),
            heading: extract_first_text(&document, "h1").unwrap_or_default(),
            site_name: extract_og(&document, "og:site_name").unwrap_or_default(),
        }
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
}

fn extract_first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
}

fn extract_og(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[property='{}']", property)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
}

fn extract_meta(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[name='{}']", name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_title_and_meta_tags() {
        let meta = PageMetadata::from_html(
            r#"<html><head>
                <title>
                  Acme Plumbing | Columbus
                </title>
                <meta name="description" content=" 24/7 plumbing repairs. ">
                <meta name="keywords" content="plumber, drains">
                <meta property="og:site_name" content=" Acme ">
            </head><body><h1>Fast <em>local</em> plumbers</h1><h1>Second</h1></body></html>"#,
        );
        assert_eq!(meta.title, "Acme Plumbing | Columbus");
        assert_eq!(meta.description, "24/7 plumbing repairs.");
        assert_eq!(meta.keywords, "plumber, drains");
        assert_eq!(meta.heading, "Fast local plumbers");
        assert_eq!(meta.site_name, "Acme");
    }

    #[test]
    fn test_missing_tags_are_empty() {
        assert_eq!(PageMetadata::from_html("<p>hi</p>"), PageMetadata::default());
    }
}
