use crate::config::CrawlerConfig;
use regex::Regex;
use url::Url;

/// How a discovered link should be treated by the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Never followed (other host, non-HTTP scheme, excluded)
    Reject,
    /// Menu-like link, always queued
    Priority,
    /// Any other same-host link, queued only while the frontier has room
    General,
}

/// Scores a candidate link relative to the crawl seed
pub trait LinkScorer: Send + Sync {
    /// `text` is the anchor's visible text, already lowercased
    fn score(&self, url: &Url, text: &str, seed: &Url) -> LinkClass;
}

/// Keyword-based link classifier with same-host restriction
#[derive(Debug)]
pub struct LinkClassifier {
    keywords: Vec<String>,
    exclude_regexes: Vec<Regex>,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default()).expect("Default config has no exclude patterns")
    }
}

impl LinkClassifier {
    pub fn new(keywords: Vec<String>, exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            exclude_regexes,
        })
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self, regex::Error> {
        Self::new(config.priority_keywords.clone(), &config.exclude_patterns)
    }

    fn is_menu_like(&self, url: &Url, text: &str) -> bool {
        let path = url.path().to_lowercase();
        self.keywords
            .iter()
            .any(|k| path.contains(k.as_str()) || text.contains(k.as_str()))
    }
}

impl LinkScorer for LinkClassifier {
    fn score(&self, url: &Url, text: &str, seed: &Url) -> LinkClass {
        if !is_http(url) || !same_host(url, seed) {
            return LinkClass::Reject;
        }

        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|r| r.is_match(url_str)) {
            return LinkClass::Reject;
        }

        if self.is_menu_like(url, text) {
            LinkClass::Priority
        } else {
            LinkClass::General
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Network location equality: host and effective port
pub fn same_host(url: &Url, seed: &Url) -> bool {
    url.host_str().is_some()
        && url.host_str() == seed.host_str()
        && url.port_or_known_default() == seed.port_or_known_default()
}

/// Resolve an `href` against the page it was found on.
///
/// Returns `None` for unparseable hrefs and non-HTTP schemes
/// (`mailto:`, `tel:`, `javascript:` and the like).
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = base.join(href).ok()?;
    is_http(&resolved).then_some(resolved)
}

/// Normalized form used for frontier membership (fragment removed)
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}
