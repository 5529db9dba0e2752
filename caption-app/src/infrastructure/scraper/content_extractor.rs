use crate::domain::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

const ABOUT_CLASS_KEYWORDS: &[&str] = &[
    "about", "mission", "vision", "story", "who-we-are", "company", "intro", "overview",
];
const ABOUT_ID_KEYWORDS: &[&str] = &["about", "mission", "vision", "story", "company"];
const SERVICE_CLASS_KEYWORDS: &[&str] = &[
    "service", "product", "offering", "solution", "feature", "specialty", "expertise",
];
const BOILERPLATE_MARKERS: &[&str] = &["cookie", "privacy", "terms", "menu", "navigation"];

const MAX_ABOUT_SECTIONS: usize = 8;
const MAX_SERVICE_SECTIONS: usize = 12;
const MIN_ABOUT_SEGMENT_CHARS: usize = 50;
const MIN_ABOUT_PAGE_CHARS: usize = 30;
const SERVICE_CHAR_RANGE: (usize, usize) = (15, 200);

/// Prose and service snippets pulled from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub about_text: String,
    pub services: Vec<String>,
}

/// Turns one page of HTML into [`ExtractedContent`]. Cross-page merging is done by the caller.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, html: &str) -> ExtractedContent;
}

/// Class/id keyword heuristics; no layout or DOM-semantics analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordContentExtractor;

impl ContentExtractor for KeywordContentExtractor {
    fn extract(&self, html: &str) -> ExtractedContent {
        let document = Html::parse_document(html);
        ExtractedContent {
            about_text: self.extract_about_text(&document),
            services: self.extract_services(&document),
        }
    }
}

impl KeywordContentExtractor {
    fn extract_about_text(&self, document: &Html) -> String {
        let mut sections = select_matching(
            document,
            "div, section, p, h1, h2, h3, article",
            "class",
            ABOUT_CLASS_KEYWORDS,
        );
        sections.extend(select_matching(document, "div, section", "id", ABOUT_ID_KEYWORDS));
        sections.extend(select_all(document, "main, article"));

        let segments: Vec<String> = dedupe_elements(sections)
            .into_iter()
            .take(MAX_ABOUT_SECTIONS)
            .map(element_text)
            .filter(|text| text.chars().count() > MIN_ABOUT_SEGMENT_CHARS)
            .filter(|text| {
                let lower = text.to_lowercase();
                !BOILERPLATE_MARKERS.iter().any(|marker| lower.contains(marker))
            })
            .collect();

        let combined = segments.join(" ");
        if combined.chars().count() > MIN_ABOUT_PAGE_CHARS {
            combined
        } else {
            String::new()
        }
    }

    fn extract_services(&self, document: &Html) -> Vec<String> {
        let mut sections = select_matching(
            document,
            "div, section, li, h2, h3, h4, article",
            "class",
            SERVICE_CLASS_KEYWORDS,
        );
        sections.extend(select_matching(document, "ul, ol", "class", &["service"]));

        let (min, max) = SERVICE_CHAR_RANGE;
        dedupe_elements(sections)
            .into_iter()
            .take(MAX_SERVICE_SECTIONS)
            .map(element_text)
            .filter(|text| {
                let len = text.chars().count();
                len > min && len < max
            })
            .collect()
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_matching<'a>(
    document: &'a Html,
    css: &str,
    attr: &str,
    keywords: &[&str],
) -> Vec<ElementRef<'a>> {
    select_all(document, css)
        .into_iter()
        .filter(|el| {
            el.value().attr(attr).is_some_and(|value| {
                let value = value.to_lowercase();
                keywords.iter().any(|kw| value.contains(kw))
            })
        })
        .collect()
}

/// Keeps the first occurrence of each element across the concatenated selections.
fn dedupe_elements(elements: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter(|el| seen.insert(el.id()))
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
