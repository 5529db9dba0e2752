use crate::config::ExtractionConfig;
use crate::domain::WebsiteImage;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const SKIP_IMAGE_PATTERNS: &[&str] = &[
    "logo", "icon", "favicon", "avatar", "thumb", "badge", "button",
];
const MIN_SOCIAL_DIMENSION: u32 = 200;
const FALLBACK_DESCRIPTION: &str = "Website image";

/// Homepage images big enough to post: logos, icons and explicitly tiny images are skipped.
pub fn extract_images(base: &Url, html: &str, config: &ExtractionConfig) -> Vec<WebsiteImage> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .take(config.max_image_tags)
        .filter_map(|img| image_from_tag(base, img))
        .take(config.max_images)
        .collect()
}

fn image_from_tag(base: &Url, img: ElementRef<'_>) -> Option<WebsiteImage> {
    let attrs = img.value();
    let src = attrs
        .attr("src")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| attrs.attr("data-src").map(str::trim).filter(|s| !s.is_empty()))?;

    let url = resolve_image_url(base, src)?;
    let lower = url.to_lowercase();
    if SKIP_IMAGE_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        tracing::debug!("Skipping decorative image {}", url);
        return None;
    }

    if !has_suitable_dimensions(attrs.attr("width"), attrs.attr("height")) {
        tracing::debug!("Skipping small image {}", url);
        return None;
    }

    let alt_text = attrs.attr("alt").unwrap_or_default().trim().to_string();
    let title = attrs.attr("title").unwrap_or_default().trim().to_string();
    let description = [&alt_text, &title]
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

    Some(WebsiteImage {
        url,
        alt_text,
        title,
        description,
    })
}

fn resolve_image_url(base: &Url, src: &str) -> Option<String> {
    if let Some(rest) = src.strip_prefix("//") {
        return Url::parse(&format!("https://{}", rest)).ok().map(String::from);
    }
    base.join(src).ok().map(String::from)
}

/// Only rejects when both dimensions are declared and parse; undeclared sizes pass.
fn has_suitable_dimensions(width: Option<&str>, height: Option<&str>) -> bool {
    let parse = |v: Option<&str>| v.and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok());
    match (parse(width), parse(height)) {
        (Some(w), Some(h)) => w >= MIN_SOCIAL_DIMENSION && h >= MIN_SOCIAL_DIMENSION,
        _ => true,
    }
}
