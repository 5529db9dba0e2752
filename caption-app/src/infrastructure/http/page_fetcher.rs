use super::browser_headers::random_browser_headers;
use crate::config::FetchConfig;
use caption_errors::{AppError, FetchError};
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Markers of an interstitial bot challenge served with a 200 status.
const BOT_CHALLENGE_INDICATORS: &[&str] = &[
    "cf-browser-verification",
    "cf-challenge",
    "cf-turnstile",
    "challenge-platform",
    "cf-chl-bypass",
    "checking your browser",
    "enable javascript and cookies to continue",
    "verify you are human",
];

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: Url,
    pub status: u16,
}

/// HTTP GET with a fallback ladder for sites that turn away scrapers with 403s.
pub struct PageFetcher {
    http_client: reqwest::Client,
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, AppError> {
        Ok(Self {
            http_client: build_client(&config)?,
            config,
        })
    }

    /// 1. plain GET with browser headers
    /// 2. on 403 only: fresh client, new headers, random pause
    /// 3. www on/off, https, http variants, first 200 wins
    /// 4. bare domain root
    ///
    /// Any non-403 failure on the first attempt is returned as is.
    pub async fn fetch_with_retries(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match self
            .fetch_once(&self.http_client, url, self.config.timeout())
            .await
        {
            Ok(page) => return Ok(page),
            Err(err) if err.is_blocked() => {
                tracing::warn!("{} blocked direct access, trying alternative methods", url);
            }
            Err(err) => return Err(err),
        }
        let mut attempts = 2;
        match self.fetch_with_fresh_session(url).await {
            Ok(page) => {
                tracing::info!("Fresh session got through for {}", url);
                return Ok(page);
            }
            Err(e) => tracing::warn!("Fresh session failed for {}: {}", url, e),
        }

        for variation in url_variations(url) {
            attempts += 1;
            tokio::time::sleep(self.config.variation_delay.sample()).await;

            if let Some(page) = self.fetch_ok(&variation).await {
                tracing::info!("URL variation {} succeeded for {}", variation, url);
                return Ok(page);
            }
        }

        if let Some(root) = domain_root(url).filter(|root| root != url) {
            attempts += 1;
            if let Some(page) = self.fetch_ok(&root).await {
                tracing::info!("Domain root {} succeeded for {}", root, url);
                return Ok(page);
            }
        }

        tracing::warn!("All {} fetch strategies failed for {}", attempts, url);
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts,
        })
    }

    async fn fetch_with_fresh_session(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let session = build_client(&self.config).map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tokio::time::sleep(self.config.session_delay.sample()).await;
        self.fetch_once(&session, url, self.config.timeout()).await
    }

    /// Only an exact 200 counts as success for the later fallback rungs.
    async fn fetch_ok(&self, url: &Url) -> Option<FetchedPage> {
        match self
            .fetch_once(&self.http_client, url, self.config.variation_timeout())
            .await
        {
            Ok(page) if page.status == StatusCode::OK.as_u16() => Some(page),
            Ok(page) => {
                tracing::debug!("{} answered {}, not accepted", url, page.status);
                None
            }
            Err(e) => {
                tracing::debug!("{} failed: {}", url, e);
                None
            }
        }
    }

    async fn fetch_once(
        &self,
        client: &reqwest::Client,
        url: &Url,
        timeout: Duration,
    ) -> Result<FetchedPage, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = client
            .get(url.as_str())
            .headers(random_browser_headers())
            .timeout(timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(FetchError::Blocked {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(transport)?;

        if is_bot_challenge(&html) {
            tracing::info!("Bot challenge page served for {}", url);
            return Err(FetchError::Blocked {
                url: url.to_string(),
            });
        }

        Ok(FetchedPage {
            html,
            final_url,
            status: status.as_u16(),
        })
    }
}

fn build_client(config: &FetchConfig) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .map_err(|e| AppError::Internal(format!("HTTP client: {}", e)))
}

fn is_bot_challenge(html: &str) -> bool {
    let lower = html.to_lowercase();
    BOT_CHALLENGE_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}

/// `www.` toggled, then forced https, then forced http; the input itself (minus fragment) is excluded.
pub fn url_variations(url: &Url) -> Vec<Url> {
    let mut base = url.clone();
    base.set_fragment(None);

    let mut variations = Vec::new();

    if let Some(domain) = base.domain() {
        let toggled = match domain.strip_prefix("www.") {
            Some(bare) => bare.to_string(),
            None => format!("www.{}", domain),
        };
        let mut candidate = base.clone();
        if candidate.set_host(Some(&toggled)).is_ok() {
            variations.push(candidate);
        }
    }

    for scheme in ["https", "http"] {
        let mut candidate = base.clone();
        if candidate.set_scheme(scheme).is_ok() {
            variations.push(candidate);
        }
    }

    let mut unique: Vec<Url> = Vec::new();
    for candidate in variations {
        if candidate != base && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

pub fn domain_root(url: &Url) -> Option<Url> {
    let host = url.host_str()?;
    let root = match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    };
    Url::parse(&root).ok()
}
