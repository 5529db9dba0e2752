use crate::config::{ExtractionConfig, MAX_CANDIDATE_PAGES_LIMIT};
use crate::domain::{collapse_whitespace, CandidatePage};
use scraper::{Html, Selector};
use url::Url;

struct KeywordTier {
    keywords: &'static [&'static str],
    url_points: u32,
    text_points: u32,
}

const KEYWORD_TIERS: &[KeywordTier] = &[
    KeywordTier {
        keywords: &[
            "about", "company", "mission", "vision", "story", "history", "who-we-are",
            "our-team", "leadership", "founders", "values", "culture",
        ],
        url_points: 15,
        text_points: 12,
    },
    KeywordTier {
        keywords: &[
            "service", "product", "offering", "solution", "what-we-do", "expertise",
            "specialties", "capabilities", "features", "portfolio", "work",
        ],
        url_points: 10,
        text_points: 8,
    },
    KeywordTier {
        keywords: &[
            "team", "staff", "experience", "case-studies", "testimonials", "reviews",
            "clients", "projects", "gallery", "showcase",
        ],
        url_points: 7,
        text_points: 5,
    },
];

/// Anchor texts of well-labelled navigation; one match outweighs any keyword tier.
const NAV_PHRASES: &[&str] = &[
    "about us",
    "our services",
    "what we do",
    "our company",
    "our story",
    "meet the team",
    "our mission",
    "company info",
    "get to know us",
    "our expertise",
    "why choose us",
    "our approach",
    "company profile",
];
const NAV_PHRASE_POINTS: u32 = 20;

const SKIP_PATTERNS: &[&str] = &[
    "#", "mailto:", "tel:", "javascript:", ".pdf", ".jpg", ".png", ".gif", ".doc", ".docx",
    ".zip", ".csv", ".xml", "login", "register", "cart", "checkout", "privacy", "terms",
    "cookie", "sitemap.xml", "feed", "rss",
];

/// Scores every usable homepage link and returns the best few, highest score first.
///
/// Links are kept only when they stay on the seed's site (a leading `www.` is ignored),
/// avoid [`SKIP_PATTERNS`], are not the seed page itself, and score above zero.
/// A URL seen twice keeps the score of its first occurrence.
pub fn discover_candidate_pages(
    seed: &Url,
    html: &str,
    config: &ExtractionConfig,
) -> Vec<CandidatePage> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut candidates: Vec<CandidatePage> = Vec::new();

    for link in document.select(&selector).take(config.max_links_examined) {
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || should_skip(&href.to_lowercase()) {
            continue;
        }

        let Some(url) = resolve_same_site(seed, href) else {
            continue;
        };
        if is_same_page(seed, &url) {
            continue;
        }

        let link_text = collapse_whitespace(&link.text().collect::<Vec<_>>().join(" "));
        let score = score_link(&url, &link_text);
        tracing::debug!("Candidate {} scored {}", url, score);

        if score > 0 && !candidates.iter().any(|c| c.url == url.as_str()) {
            candidates.push(CandidatePage::new(url.to_string(), score));
        }
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(config.max_candidate_pages.min(MAX_CANDIDATE_PAGES_LIMIT));
    candidates
}

pub fn score_link(url: &Url, link_text: &str) -> u32 {
    let path = url.path().to_lowercase();
    let text = link_text.to_lowercase();
    let mut score = 0;

    for tier in KEYWORD_TIERS {
        for keyword in tier.keywords {
            if path.contains(keyword) {
                score += tier.url_points;
            }
            if text.contains(keyword) {
                score += tier.text_points;
            }
        }
    }

    if NAV_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        score += NAV_PHRASE_POINTS;
    }

    score + depth_bonus(&path)
}

fn depth_bonus(path: &str) -> u32 {
    match path.matches('/').count() {
        0..=3 => 5,
        4..=5 => 2,
        _ => 0,
    }
}

fn should_skip(href_lower: &str) -> bool {
    SKIP_PATTERNS.iter().any(|pattern| href_lower.contains(pattern))
}

fn resolve_same_site(seed: &Url, href: &str) -> Option<Url> {
    let url = seed.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?;
    let seed_host = seed.host_str()?;
    (bare_host(host) == bare_host(seed_host)).then_some(url)
}

fn bare_host(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

fn is_same_page(seed: &Url, url: &Url) -> bool {
    url.path().trim_end_matches('/') == seed.path().trim_end_matches('/')
        && url.query() == seed.query()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Url {
        Url::parse("https://acme.com/").unwrap()
    }

    fn discover(body: &str) -> Vec<CandidatePage> {
        let html = format!("<html><body>{}</body></html>", body);
        discover_candidate_pages(&seed(), &html, &ExtractionConfig::default())
    }

    #[test]
    fn test_cross_domain_links_are_dropped() {
        let pages = discover(
            r#"<a href="/about">About</a>
               <a href="https://www.acme.com/services">Services</a>
               <a href="https://other.com/about">About them</a>
               <a href="https://acme.com.evil.net/about">About</a>"#,
        );

        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains(&"https://acme.com/about"));
        assert!(urls.contains(&"https://www.acme.com/services"));
        assert!(urls.iter().all(|u| Url::parse(u).unwrap().host_str().unwrap().ends_with("acme.com")));
    }

    #[test]
    fn test_skip_patterns_and_seed_page() {
        let pages = discover(
            r##"<a href="#top">About</a>
               <a href="mailto:hi@acme.com">About</a>
               <a href="/brochure.pdf">About</a>
               <a href="/login">About us</a>
               <a href="/privacy-policy">About</a>
               <a href="/">Home</a>
               <a href="/story">Our story</a>"##,
        );
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "https://acme.com/story");
    }

    #[test]
    fn test_scoring_weights() {
        // path "about" 15 + text "about" 12 + nav phrase 20 + depth 5
        let about = Url::parse("https://acme.com/about").unwrap();
        assert_eq!(score_link(&about, "About Us"), 52);

        // path "service" 10 + depth 5
        let services = Url::parse("https://acme.com/services").unwrap();
        assert_eq!(score_link(&services, ""), 15);

        // no keywords, deep path gets no depth bonus
        let deep = Url::parse("https://acme.com/a/b/c/d/e/f").unwrap();
        assert_eq!(score_link(&deep, "misc"), 0);
    }

    #[test]
    fn test_nav_phrase_dominates_ordering() {
        let pages = discover(
            r#"<a href="/gallery">Gallery</a>
               <a href="/p/1">Why choose us</a>
               <a href="/products">Products</a>"#,
        );
        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://acme.com/p/1", "https://acme.com/products", "https://acme.com/gallery"]
        );
    }

    #[test]
    fn test_first_occurrence_keeps_its_score() {
        let pages = discover(
            r#"<a href="/team">Staff</a>
               <a href="/team">Meet the team</a>"#,
        );
        assert_eq!(pages.len(), 1);
        // path "team" 7 + text "staff" 5 + depth 5
        assert_eq!(pages[0].score, 17);
    }

    #[test]
    fn test_result_is_capped() {
        let links: String = (0..200)
            .map(|i| format!(r#"<a href="/about-{i}">About us</a>"#))
            .collect();
        let pages = discover(&links);
        assert_eq!(pages.len(), 10);

        let generous = ExtractionConfig {
            max_candidate_pages: 50,
            ..ExtractionConfig::default()
        };
        let html = format!("<html><body>{}</body></html>", links);
        assert_eq!(discover_candidate_pages(&seed(), &html, &generous).len(), 10);
    }

    #[test]
    fn test_only_leading_links_are_examined() {
        let filler = |count: usize| -> String {
            (0..count)
                .map(|i| format!(r#"<a href="/n/n/n/n/n/{i}">misc</a>"#))
                .collect()
        };
        let about = r#"<a href="/about">About us</a>"#;

        assert!(discover(&format!("{}{}", filler(150), about)).is_empty());

        let pages = discover(&format!("{}{}", filler(149), about));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "https://acme.com/about");
    }
}
