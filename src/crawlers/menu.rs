use crate::config::CrawlerConfig;
use crate::crawlers::frontier::{CrawlBudget, CrawlFrontier};
use crate::error::{ConfigError, FetchError};
use crate::fetch::Fetcher;
use crate::filter::{LinkClass, LinkClassifier, LinkScorer, normalize_url, resolve_link};
use crate::matcher::MatchaPatterns;
use crate::parsers::{self, Anchor, ParserType};
use crate::politeness::HostThrottle;
use crate::reporter::{CrawlEvent, LogReporter, Reporter};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Result of scanning a website for matcha
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchVerdict {
    /// A page matched; the crawl stopped there
    Found { url: String, pattern: String },
    /// Frontier or budget exhausted without a match
    NotFound,
}

impl MatchVerdict {
    pub fn found(&self) -> bool {
        matches!(self, MatchVerdict::Found { .. })
    }
}

/// Verdict plus the trail of a finished crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub verdict: MatchVerdict,
    /// Fetch attempts, failed ones included
    pub pages_fetched: usize,
    /// URLs in the order they were taken from the frontier
    pub visited: Vec<String>,
}

impl CrawlReport {
    pub fn found(&self) -> bool {
        self.verdict.found()
    }
}

/// Bounded same-host crawler that looks for matcha on a business website.
///
/// Each `crawl` owns its frontier and budget; only the host throttle is shared
/// between crawls.
pub struct MenuCrawler<F> {
    fetcher: F,
    scorer: Arc<dyn LinkScorer>,
    patterns: MatchaPatterns,
    throttle: Arc<HostThrottle>,
    reporter: Arc<dyn Reporter>,
    max_pages: usize,
    general_link_cap: usize,
}

impl<F: Fetcher> MenuCrawler<F> {
    pub fn new(fetcher: F, config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            scorer: Arc::new(LinkClassifier::from_config(config)?),
            patterns: MatchaPatterns::from_config(config)?,
            throttle: Arc::new(HostThrottle::new(config.politeness_delay())),
            reporter: Arc::new(LogReporter),
            max_pages: config.max_pages,
            general_link_cap: config.general_link_cap(),
        })
    }

    /// Replace the link scoring heuristic
    pub fn with_scorer(mut self, scorer: Arc<dyn LinkScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Share a throttle with other crawlers
    pub fn with_throttle(mut self, throttle: Arc<HostThrottle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// `true` if any page within the budget mentions a matcha menu item
    pub async fn check(&self, seed: &str) -> bool {
        self.crawl(seed).await.found()
    }

    pub async fn crawl(&self, seed: &str) -> CrawlReport {
        let seed = seed.trim();
        if seed.is_empty() {
            return self.finish(seed, MatchVerdict::NotFound, CrawlFrontier::default(), 0);
        }

        // An unparseable seed stays in the frontier as-is and fails at fetch time
        let seed_url = Url::parse(seed).ok().map(|u| normalize_url(&u));
        let mut frontier = CrawlFrontier::seeded(
            seed_url
                .as_ref()
                .map_or_else(|| seed.to_string(), Url::to_string),
        );
        let mut budget = CrawlBudget::new(self.max_pages);

        self.reporter.report(&CrawlEvent::Started {
            seed: seed.to_string(),
            max_pages: budget.max(),
        });

        while !frontier.is_empty() && budget.try_consume() {
            let Some(current) = frontier.pop() else {
                break;
            };
            self.reporter.report(&CrawlEvent::Fetching {
                url: current.clone(),
                page: budget.used(),
                max_pages: budget.max(),
            });

            if let Some(pattern) = self
                .visit(&current, seed_url.as_ref(), &mut frontier, &budget)
                .await
            {
                self.reporter.report(&CrawlEvent::Matched {
                    url: current.clone(),
                    pattern: pattern.clone(),
                });
                let verdict = MatchVerdict::Found {
                    url: current,
                    pattern,
                };
                return self.finish(seed, verdict, frontier, budget.used());
            }
        }

        self.finish(seed, MatchVerdict::NotFound, frontier, budget.used())
    }

    fn finish(
        &self,
        seed: &str,
        verdict: MatchVerdict,
        frontier: CrawlFrontier,
        pages_fetched: usize,
    ) -> CrawlReport {
        self.reporter.report(&CrawlEvent::Finished {
            seed: seed.to_string(),
            found: verdict.found(),
            pages_fetched,
        });
        CrawlReport {
            seed: seed.to_string(),
            verdict,
            pages_fetched,
            visited: frontier.into_visited(),
        }
    }

    /// Fetch and scan one page. Returns the matching pattern, or queues the
    /// page's links and returns `None`.
    async fn visit(
        &self,
        current: &str,
        seed: Option<&Url>,
        frontier: &mut CrawlFrontier,
        budget: &CrawlBudget,
    ) -> Option<String> {
        let url = match Url::parse(current) {
            Ok(url) if url.host_str().is_some() => url,
            _ => {
                self.report_failure(current, FetchError::InvalidUrl(current.to_string()));
                return None;
            }
        };

        self.throttle.wait(url.host_str().unwrap_or_default()).await;

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                self.report_failure(current, e);
                return None;
            }
        };

        if !page.is_ok() {
            self.reporter.report(&CrawlEvent::BadStatus {
                url: current.to_string(),
                status: page.status,
            });
            return None;
        }

        let parser_type = ParserType::detect(page.content_type.as_deref(), current);
        let body = match (&page.body, parser_type) {
            (Some(body), ParserType::Html | ParserType::Text) => body,
            _ => {
                self.reporter.report(&CrawlEvent::Skipped {
                    url: current.to_string(),
                    content_type: page.content_type.clone(),
                });
                return None;
            }
        };

        let parsed = parsers::parse(body, parser_type);
        if let Some(pattern) = self.patterns.find(&parsed.content) {
            return Some(pattern.to_string());
        }

        // Links are only worth collecting while pages remain to spend on them
        if let Some(seed) = seed {
            if parser_type.should_extract_links() && !budget.is_exhausted() {
                self.enqueue_links(&url, seed, &parsed.links, frontier);
            }
        }

        None
    }

    fn enqueue_links(
        &self,
        page: &Url,
        seed: &Url,
        links: &[Anchor],
        frontier: &mut CrawlFrontier,
    ) {
        for anchor in links {
            let Some(resolved) = resolve_link(page, &anchor.href) else {
                continue;
            };
            let resolved = normalize_url(&resolved);

            let class = self.scorer.score(&resolved, &anchor.text, seed);
            let queued = match class {
                LinkClass::Reject => false,
                LinkClass::Priority => frontier.push(resolved.to_string(), class),
                LinkClass::General => {
                    frontier.pending_len() < self.general_link_cap
                        && frontier.push(resolved.to_string(), class)
                }
            };

            if queued {
                self.reporter.report(&CrawlEvent::LinkQueued {
                    url: resolved.to_string(),
                    class,
                });
            }
        }
    }

    fn report_failure(&self, url: &str, error: FetchError) {
        self.reporter.report(&CrawlEvent::FetchFailed {
            url: url.to_string(),
            reason: error.to_string(),
        });
    }
}
