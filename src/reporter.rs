use crate::filter::LinkClass;

/// Progress of a single menu crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    Started {
        seed: String,
        max_pages: usize,
    },
    Fetching {
        url: String,
        page: usize,
        max_pages: usize,
    },
    /// Malformed URL, timeout or connection failure
    FetchFailed {
        url: String,
        reason: String,
    },
    /// Response other than 200
    BadStatus {
        url: String,
        status: u16,
    },
    /// 200 response with content the crawler does not scan
    Skipped {
        url: String,
        content_type: Option<String>,
    },
    Matched {
        url: String,
        pattern: String,
    },
    LinkQueued {
        url: String,
        class: LinkClass,
    },
    Finished {
        seed: String,
        found: bool,
        pages_fetched: usize,
    },
}

/// Sink for crawl progress, injected into the crawler
pub trait Reporter: Send + Sync {
    fn report(&self, event: &CrawlEvent);
}

/// Forwards crawl events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: &CrawlEvent) {
        match event {
            CrawlEvent::Started { seed, max_pages } => {
                ::log::info!("Starting menu check for {} (up to {} pages)", seed, max_pages)
            }
            CrawlEvent::Fetching {
                url,
                page,
                max_pages,
            } => ::log::info!("Crawling ({}/{}): {}", page, max_pages, url),
            CrawlEvent::FetchFailed { url, reason } => {
                ::log::warn!("Request error crawling {}: {}", url, reason)
            }
            CrawlEvent::BadStatus { url, status } => {
                ::log::warn!("Failed to fetch {}: status {}", url, status)
            }
            CrawlEvent::Skipped { url, content_type } => ::log::debug!(
                "Skipping {} with unsupported content type {:?}",
                url,
                content_type
            ),
            CrawlEvent::Matched { url, pattern } => {
                ::log::info!("Matcha found on {} with pattern: {}", url, pattern)
            }
            CrawlEvent::LinkQueued { url, class } => {
                ::log::debug!("Queued {:?} link: {}", class, url)
            }
            CrawlEvent::Finished {
                seed,
                found,
                pages_fetched,
            } => {
                if *found {
                    ::log::info!("Menu check for {} matched after {} pages", seed, pages_fetched)
                } else {
                    ::log::info!(
                        "Finished crawling {} ({} pages). Matcha not found in menu pages.",
                        seed,
                        pages_fetched
                    )
                }
            }
        }
    }
}
