use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Desktop browser User-Agent sent with every page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Which built-in matcha pattern set the crawler scans for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSet {
    /// Drink, base, temperature and quality forms
    #[default]
    Core,
    /// Core plus confection and flavor pairing forms
    Extended,
}

/// Configuration for the menu-verification crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched per website
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Minimum pause between two requests to the same host, in milliseconds
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Response bodies are truncated after this many bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// User-Agent header for page requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// General links are queued only while fewer than `max_pages * general_link_factor`
    /// URLs are pending
    #[serde(default = "default_general_link_factor")]
    pub general_link_factor: usize,

    /// Path or link-text keywords that mark a link as menu-like
    #[serde(default = "default_priority_keywords")]
    pub priority_keywords: Vec<String>,

    /// Regex patterns for URLs that are never followed
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Built-in matcha pattern set
    #[serde(default)]
    pub pattern_set: PatternSet,

    /// Additional matcha regex patterns
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

/// Geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Configuration for business discovery through the places API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Free-form place name to geocode
    #[serde(default = "default_location")]
    pub location: String,

    /// Nearby-search radius in meters
    #[serde(default = "default_radius_m")]
    pub radius_m: u32,

    /// Places type filter for nearby search
    #[serde(default = "default_place_type")]
    pub place_type: String,

    /// Wait before requesting the next result page, in milliseconds
    #[serde(default = "default_page_token_delay_ms")]
    pub page_token_delay_ms: u64,

    /// Number of businesses evaluated concurrently
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Base URL of the places web service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Coordinates used when geocoding returns no result
    #[serde(default = "default_fallback_location")]
    pub fallback_location: LatLng,
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl ScoutConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_max_pages() -> usize {
    7
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_politeness_delay_ms() -> u64 {
    500
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_general_link_factor() -> usize {
    2
}

fn default_priority_keywords() -> Vec<String> {
    ["menu", "drink", "product", "item", "cafe", "beverage"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_location() -> String {
    "London, UK".to_string()
}

fn default_radius_m() -> u32 {
    5000
}

fn default_place_type() -> String {
    "cafe".to_string()
}

fn default_page_token_delay_ms() -> u64 {
    2000
}

fn default_max_concurrency() -> usize {
    4
}

fn default_api_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_fallback_location() -> LatLng {
    LatLng {
        lat: 51.5074,
        lng: -0.1278,
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
            politeness_delay_ms: default_politeness_delay_ms(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
            general_link_factor: default_general_link_factor(),
            priority_keywords: default_priority_keywords(),
            exclude_patterns: Vec::new(),
            pattern_set: PatternSet::default(),
            extra_patterns: Vec::new(),
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    /// Upper bound on pending URLs before general links stop being queued
    pub fn general_link_cap(&self) -> usize {
        self.max_pages.saturating_mul(self.general_link_factor)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            radius_m: default_radius_m(),
            place_type: default_place_type(),
            page_token_delay_ms: default_page_token_delay_ms(),
            max_concurrency: default_max_concurrency(),
            api_base_url: default_api_base_url(),
            fallback_location: default_fallback_location(),
        }
    }
}

impl DiscoveryConfig {
    pub fn page_token_delay(&self) -> Duration {
        Duration::from_millis(self.page_token_delay_ms)
    }
}
