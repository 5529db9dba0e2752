use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteImage {
    pub url: String,
    pub alt_text: String,
    pub title: String,
    pub description: String,
}

/// Merged view of a website's homepage and its most relevant sub-pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    /// First `<h1>` of the homepage.
    #[serde(default)]
    pub heading: String,
    /// `og:site_name` of the homepage.
    #[serde(default)]
    pub site_name: String,
    pub about_text: String,
    pub services: Vec<String>,
    pub pages_analyzed: Vec<String>,
    pub images: Vec<WebsiteImage>,
}

impl SiteAnalysis {
    pub fn new(url: String) -> Self {
        Self {
            pages_analyzed: vec![url.clone()],
            url,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    pub fn with_meta_description(mut self, meta_description: String) -> Self {
        self.meta_description = meta_description;
        self
    }

    pub fn with_meta_keywords(mut self, meta_keywords: String) -> Self {
        self.meta_keywords = meta_keywords;
        self
    }

    pub fn with_heading(mut self, heading: String) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_site_name(mut self, site_name: String) -> Self {
        self.site_name = site_name;
        self
    }

    pub fn with_about_text(mut self, about_text: String) -> Self {
        self.about_text = about_text;
        self
    }

    pub fn with_services(mut self, services: Vec<String>) -> Self {
        self.services = services;
        self
    }

    pub fn with_images(mut self, images: Vec<WebsiteImage>) -> Self {
        self.images = images;
        self
    }

    pub fn record_page(&mut self, url: String) {
        self.pages_analyzed.push(url);
    }

    pub fn has_content(&self) -> bool {
        !self.about_text.is_empty() || !self.services.is_empty() || !self.meta_description.is_empty()
    }
}
