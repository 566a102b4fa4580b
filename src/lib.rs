pub mod config;
pub mod crawlers;
pub mod discovery;
pub mod error;
pub mod evidence;
pub mod fetch;
pub mod filter;
pub mod matcher;
pub mod parsers;
pub mod politeness;
pub mod reporter;
pub mod results;
pub mod utils;

#[cfg(test)]
mod fakes;

// Re-export commonly used types for convenience
pub use config::{CrawlerConfig, DiscoveryConfig, PatternSet, ScoutConfig};
pub use crawlers::{CrawlReport, MatchVerdict, MenuCrawler};
pub use discovery::{BusinessDiscovery, GooglePlacesClient, PlacesApi};
pub use error::{ConfigError, FetchError, PlacesError, ScoutError};
pub use evidence::{Evidence, MatchaAssessment, MatchaEvaluator, PlaceDetails};
pub use fetch::{Fetcher, HttpFetcher};
pub use reporter::{CrawlEvent, LogReporter, Reporter};
pub use results::{BusinessRecord, write_records};

use politeness::HostThrottle;
use std::sync::Arc;

/// Main builder for matcha checks against single websites or whole areas
pub struct Scout {
    config: ScoutConfig,
    reporter: Arc<dyn Reporter>,
}

impl Scout {
    pub fn new(config: ScoutConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Load configuration from a file
    pub fn with_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(ScoutConfig::from_file(path)?))
    }

    /// Set the page budget per website
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.crawler.max_pages = max_pages;
        self
    }

    /// Set the number of businesses evaluated at once
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.discovery.max_concurrency = max_concurrency;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.config.discovery.location = location.into();
        self
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.config.discovery.radius_m = radius_m;
        self
    }

    pub fn with_pattern_set(mut self, pattern_set: PatternSet) -> Self {
        self.config.crawler.pattern_set = pattern_set;
        self
    }

    /// Receive crawl progress instead of logging it
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    fn crawler(&self, throttle: Arc<HostThrottle>) -> Result<MenuCrawler<HttpFetcher>, ScoutError> {
        let fetcher = HttpFetcher::new(&self.config.crawler)
            .map_err(|e| ScoutError::Client(e.to_string()))?;
        Ok(MenuCrawler::new(fetcher, &self.config.crawler)?
            .with_throttle(throttle)
            .with_reporter(Arc::clone(&self.reporter)))
    }

    /// Crawl one website for matcha on its menu
    pub async fn check_website(&self, url: &str) -> Result<CrawlReport, ScoutError> {
        let throttle = Arc::new(HostThrottle::new(self.config.crawler.politeness_delay()));
        let crawler = self.crawler(throttle)?;
        Ok(crawler.crawl(url).await)
    }

    /// Discover businesses around the configured location and evaluate each one
    pub async fn search(&self, api_key: &str) -> Result<Vec<BusinessRecord>, ScoutError> {
        // One throttle for every concurrent crawl so hosts are spaced across businesses
        let throttle = Arc::new(HostThrottle::new(self.config.crawler.politeness_delay()));
        let evaluator = MatchaEvaluator::new(self.crawler(throttle)?);

        let places = GooglePlacesClient::new(
            api_key,
            &self.config.discovery,
            self.config.crawler.request_timeout(),
        )
        .map_err(|e| ScoutError::Client(e.to_string()))?;

        let discovery = BusinessDiscovery::new(places, evaluator, self.config.discovery.clone());
        Ok(discovery.discover().await?)
    }
}

impl Default for Scout {
    fn default() -> Self {
        Self::new(ScoutConfig::default())
    }
}
