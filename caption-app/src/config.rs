use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "used_captions.json";
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
/// Hard ceiling on sub-pages fetched per analysis, whatever the configuration says.
pub const MAX_CANDIDATE_PAGES_LIMIT: usize = 10;

/// Inclusive millisecond range a randomized delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }
}

impl FromStr for DelayRange {
    type Err = String;

    /// Parses `"MIN-MAX"` or a single fixed value, in milliseconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| v.trim().parse::<u64>().map_err(|e| format!("{v:?}: {e}"));
        match s.split_once('-') {
            Some((min, max)) => {
                let (min, max) = (parse(min)?, parse(max)?);
                if min > max {
                    return Err(format!("delay range {min}-{max} is reversed"));
                }
                Ok(Self::new(min, max))
            }
            None => {
                let fixed = parse(s)?;
                Ok(Self::new(fixed, fixed))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub variation_timeout_secs: u64,
    pub max_redirects: usize,
    /// Pause before the fresh-session retry that follows a 403.
    pub session_delay: DelayRange,
    /// Pause before each URL variation attempt.
    pub variation_delay: DelayRange,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            variation_timeout_secs: 10,
            max_redirects: 5,
            session_delay: DelayRange::new(1000, 3000),
            variation_delay: DelayRange::new(500, 2000),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn variation_timeout(&self) -> Duration {
        Duration::from_secs(self.variation_timeout_secs)
    }

    /// No delays and short timeouts, for tests against local servers.
    pub fn immediate() -> Self {
        Self {
            timeout_secs: 5,
            variation_timeout_secs: 2,
            session_delay: DelayRange::none(),
            variation_delay: DelayRange::none(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_links_examined: usize,
    pub max_candidate_pages: usize,
    pub about_text_limit: usize,
    pub max_services: usize,
    pub max_image_tags: usize,
    pub max_images: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_links_examined: 150,
            max_candidate_pages: MAX_CANDIDATE_PAGES_LIMIT,
            about_text_limit: 1200,
            max_services: 15,
            max_image_tags: 10,
            max_images: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub similarity_threshold: f64,
    pub fetch: FetchConfig,
    pub extraction: ExtractionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            fetch: FetchConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let store_path = lookup("CAPTIONS_STORE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let similarity_threshold = parse_or(
            &lookup,
            "CAPTION_SIMILARITY_THRESHOLD",
            defaults.similarity_threshold,
        )
        .clamp(0.0, 1.0);

        let fetch = FetchConfig {
            timeout_secs: parse_or(&lookup, "FETCH_TIMEOUT_SECS", defaults.fetch.timeout_secs),
            variation_timeout_secs: parse_or(
                &lookup,
                "FETCH_VARIATION_TIMEOUT_SECS",
                defaults.fetch.variation_timeout_secs,
            ),
            session_delay: parse_or(&lookup, "FETCH_RETRY_DELAY_MS", defaults.fetch.session_delay),
            variation_delay: parse_or(
                &lookup,
                "FETCH_VARIATION_DELAY_MS",
                defaults.fetch.variation_delay,
            ),
            ..defaults.fetch
        };

        let extraction = ExtractionConfig {
            max_candidate_pages: parse_or(
                &lookup,
                "MAX_CANDIDATE_PAGES",
                defaults.extraction.max_candidate_pages,
            )
            .min(MAX_CANDIDATE_PAGES_LIMIT),
            ..defaults.extraction
        };

        Self {
            store_path,
            similarity_threshold,
            fetch,
            extraction,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            default
        }),
        None => default,
    }
}
