use super::text::truncate_chars;
use super::SiteAnalysis;
use serde::{Deserialize, Serialize};
use url::Url;

const TITLE_SUFFIXES: &[&str] = &[
    " - Home",
    " | Home",
    " - Official Website",
    " | Official Site",
    " - Homepage",
    " | Homepage",
    " Home Page",
    " | Home Page",
    " | Official Website",
    " - Official Site",
    " | Main Page",
    " - Main Page",
    " | Welcome",
    " - Welcome",
];

const BUSINESS_TYPES: &[(&str, &[&str])] = &[
    ("Restaurant", &["restaurant", "dining", "food", "cuisine", "menu"]),
    ("Tech Company", &["software", "technology", "app", "digital", "tech"]),
    ("Retail Store", &["shop", "store", "retail", "products", "merchandise"]),
    ("Service Provider", &["service", "consulting", "solution", "professional"]),
    ("Healthcare", &["health", "medical", "doctor", "clinic", "hospital"]),
    ("Education", &["education", "school", "training", "course", "learn"]),
];

const AUDIENCES: &[(&str, &[&str])] = &[
    ("Small business owners", &["small business", "entrepreneur", "startup"]),
    ("Professionals", &["professional", "corporate", "business executive"]),
    ("Families", &["family", "parents", "children", "kids"]),
    ("Young adults", &["millennial", "young adult", "college", "student"]),
    ("Seniors", &["senior", "retirement", "elderly", "mature"]),
];

const DEFAULT_AUDIENCE: &str = "General audience";
const BUSINESS_TYPE_WINDOW: usize = 200;
const DESCRIPTION_LIMIT: usize = 200;

/// The five prompt fields; an empty string means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub company_name: String,
    pub business_type: String,
    pub target_audience: String,
    pub product_service: String,
    pub description: String,
}

impl BusinessInfo {
    pub fn from_analysis(analysis: &SiteAnalysis) -> Self {
        let about_lower = analysis.about_text.to_lowercase();
        let audience_haystack = format!(
            "{} {} {}",
            analysis.title.to_lowercase(),
            analysis.meta_description.to_lowercase(),
            about_lower
        );

        let type_window = if about_lower.is_empty() {
            analysis.meta_description.to_lowercase()
        } else {
            truncate_chars(&about_lower, BUSINESS_TYPE_WINDOW)
        };

        let description = if analysis.meta_description.trim().is_empty() {
            truncate_chars(analysis.about_text.trim(), DESCRIPTION_LIMIT)
        } else {
            analysis.meta_description.trim().to_string()
        };

        Self {
            company_name: company_name(analysis),
            business_type: first_match(BUSINESS_TYPES, &type_window)
                .unwrap_or_default()
                .to_string(),
            target_audience: first_match(AUDIENCES, &audience_haystack)
                .unwrap_or(DEFAULT_AUDIENCE)
                .to_string(),
            product_service: analysis.services.first().cloned().unwrap_or_default(),
            description,
        }
    }

    /// Applies `f` to every field, e.g. to scrub text before it reaches a prompt.
    pub fn map_fields(self, f: impl Fn(&str) -> String) -> Self {
        Self {
            company_name: f(&self.company_name),
            business_type: f(&self.business_type),
            target_audience: f(&self.target_audience),
            product_service: f(&self.product_service),
            description: f(&self.description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.company_name.is_empty()
            && self.business_type.is_empty()
            && self.product_service.is_empty()
            && self.description.is_empty()
    }
}

fn first_match(table: &[(&'static str, &[&str])], haystack: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(label, _)| *label)
}

/// Title first, then the homepage `<h1>`, then `og:site_name`, then the domain.
fn company_name(analysis: &SiteAnalysis) -> String {
    let from_title = name_from_title(&analysis.title);
    let name = [from_title.as_str(), analysis.heading.trim(), analysis.site_name.trim()]
        .into_iter()
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| domain_label(&analysis.url))
        .unwrap_or_default();
    name
}

fn name_from_title(title: &str) -> String {
    let mut name = title.trim().to_string();

    for suffix in TITLE_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
        }
    }

    // "Plumbing in Columbus | Acme Plumbing" keeps the trailing brand segment
    let lower = name.to_lowercase();
    if name.contains(" | ") && !["home", "welcome", "official"].iter().any(|w| lower.contains(w)) {
        if let Some(last) = name.rsplit(" | ").next() {
            name = last.to_string();
        }
    }

    name.trim().to_string()
}

fn domain_label(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let parts: Vec<&str> = host.split('.').filter(|p| *p != "www").collect();
    let main = if parts.len() > 1 {
        parts[parts.len() - 2]
    } else {
        parts.first().copied()?
    };

    let mut chars = main.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().collect::<String>() + chars.as_str())
}
