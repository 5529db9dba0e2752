use super::content_extractor::{ContentExtractor, ExtractedContent, KeywordContentExtractor};
use super::content_merge::{merge_about_texts, merge_services};
use super::image_extractor::extract_images;
use super::page_discovery::discover_candidate_pages;
use super::page_metadata::PageMetadata;
use crate::config::{ExtractionConfig, FetchConfig};
use crate::domain::SiteAnalysis;
use crate::infrastructure::http::PageFetcher;
use crate::infrastructure::security::InputSanitizer;
use caption_errors::AppError;
use std::sync::Arc;
use url::Url;

/// Fetches a homepage plus its most promising sub-pages and merges what they say
/// about the business into one [`SiteAnalysis`].
///
/// Pages are fetched one after another; a sub-page that cannot be fetched is
/// skipped, only a homepage failure fails the analysis.
pub struct SiteContentExtractor {
    fetcher: PageFetcher,
    content_extractor: Arc<dyn ContentExtractor>,
    config: ExtractionConfig,
}

impl SiteContentExtractor {
    pub fn new(fetch: FetchConfig, config: ExtractionConfig) -> Result<Self, AppError> {
        Ok(Self {
            fetcher: PageFetcher::new(fetch)?,
            content_extractor: Arc::new(KeywordContentExtractor),
            config,
        })
    }

    pub fn with_content_extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.content_extractor = extractor;
        self
    }

    pub async fn analyze(&self, url: &str) -> Result<SiteAnalysis, AppError> {
        let seed = InputSanitizer::normalize_url(url)?;
        tracing::info!("Analyzing website {}", seed);

        let homepage = self.fetcher.fetch_with_retries(&seed).await?;
        if homepage.html.trim().is_empty() {
            return Err(AppError::ParseFailed(format!("{} returned an empty page", seed)));
        }

        let metadata = PageMetadata::from_html(&homepage.html);
        let candidates =
            discover_candidate_pages(&homepage.final_url, &homepage.html, &self.config);
        tracing::info!("Found {} candidate pages on {}", candidates.len(), seed);

        let mut analysis = SiteAnalysis::new(seed.to_string())
            .with_title(metadata.title)
            .with_meta_description(metadata.description)
            .with_meta_keywords(metadata.keywords)
            .with_heading(metadata.heading)
            .with_site_name(metadata.site_name);
        let mut pages = vec![self.content_extractor.extract(&homepage.html)];

        for candidate in candidates {
            let Ok(page_url) = Url::parse(&candidate.url) else {
                continue;
            };

            match self.fetcher.fetch_with_retries(&page_url).await {
                Ok(page) => {
                    pages.push(self.content_extractor.extract(&page.html));
                    analysis.record_page(candidate.url);
                }
                Err(e) => tracing::warn!("Skipping {}: {}", candidate.url, e),
            }
        }

        let (about_texts, services): (Vec<String>, Vec<Vec<String>>) = pages
            .into_iter()
            .map(|ExtractedContent { about_text, services }| (about_text, services))
            .unzip();

        let images = extract_images(&homepage.final_url, &homepage.html, &self.config);

        let analysis = analysis
            .with_about_text(merge_about_texts(&about_texts, self.config.about_text_limit))
            .with_services(merge_services(
                services.into_iter().flatten(),
                self.config.max_services,
            ))
            .with_images(images);

        tracing::info!(
            "Analyzed {} pages for {}: {} chars of about text, {} services",
            analysis.pages_analyzed.len(),
            seed,
            analysis.about_text.chars().count(),
            analysis.services.len()
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    const STORY: &str = "Founded in 1987 by two brothers, Acme Plumbing grew from a single van into the most trusted plumbing team in central Ohio.";
    const OTHER: &str = "Our licensed technicians handle emergency repairs, water heaters, sewer lines and full bathroom remodels every day of the week.";

    fn extractor() -> SiteContentExtractor {
        SiteContentExtractor::new(FetchConfig::immediate(), ExtractionConfig::default()).unwrap()
    }

    async fn page(server: &mut ServerGuard, path: &str, status: usize, body: String) {
        server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;
    }

    async fn acme_site() -> ServerGuard {
        let mut server = Server::new_async().await;
        page(
            &mut server,
            "/",
            200,
            format!(
                r#"<html><head>
                    <title>Acme Plumbing - Home</title>
                    <meta name="description" content="Trusted plumbers in Columbus.">
                </head><body>
                    <nav>
                      <a href="/about">About Us</a>
                      <a href="/services">Our Services</a>
                      <a href="/team">Meet the team</a>
                      <a href="https://elsewhere.example/about">About them</a>
                    </nav>
                    <div class="about-intro">{STORY}</div>
                    <img src="/img/van.jpg" alt="Service van">
                    <img src="/img/logo.png">
                </body></html>"#
            ),
        )
        .await;
        page(
            &mut server,
            "/about",
            200,
            format!(r#"<section class="about">{STORY} Call today.</section>"#),
        )
        .await;
        page(
            &mut server,
            "/services",
            200,
            format!(
                r#"<ul class="service-list">
                     <li class="service">Drain cleaning and repair</li>
                     <li class="service">Water heater installation</li>
                     <li class="service">Learn more about financing</li>
                   </ul>
                   <div class="mission">{OTHER}</div>"#
            ),
        )
        .await;
        page(&mut server, "/team", 404, String::new()).await;
        server
    }

    #[tokio::test]
    async fn test_analyze_merges_pages() {
        let server = acme_site().await;
        let base = format!("{}/", server.url());

        let analysis = extractor().analyze(&server.url()).await.unwrap();

        assert_eq!(analysis.title, "Acme Plumbing - Home");
        assert_eq!(analysis.meta_description, "Trusted plumbers in Columbus.");
        assert_eq!(
            analysis.pages_analyzed,
            vec![base.clone(), format!("{base}about"), format!("{base}services")]
        );
        assert_eq!(analysis.about_text, format!("{STORY} {OTHER}"));
        assert_eq!(
            analysis.services,
            vec!["Drain cleaning and repair", "Water heater installation"]
        );
        assert_eq!(analysis.images.len(), 1);
        assert_eq!(analysis.images[0].url, format!("{base}img/van.jpg"));
        assert_eq!(analysis.images[0].description, "Service van");
    }

    #[tokio::test]
    async fn test_blocked_site_reports_fetch_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = extractor().analyze(&server.url()).await.unwrap_err();
        assert!(matches!(err, AppError::FetchFailed(_)));
        assert!(err.is_recoverable_extraction_failure());
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let err = extractor().analyze("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }

    struct FixedExtractor;

    impl ContentExtractor for FixedExtractor {
        fn extract(&self, _html: &str) -> ExtractedContent {
            ExtractedContent {
                about_text: STORY.to_string(),
                services: vec!["Same service every page".to_string()],
            }
        }
    }

    #[tokio::test]
    async fn test_content_strategy_is_pluggable() {
        let server = acme_site().await;

        let analysis = extractor()
            .with_content_extractor(Arc::new(FixedExtractor))
            .analyze(&server.url())
            .await
            .unwrap();

        assert_eq!(analysis.about_text, STORY);
        assert_eq!(analysis.services, vec!["Same service every page"]);
    }
}
