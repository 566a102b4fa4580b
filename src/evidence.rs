use crate::crawlers::{CrawlReport, MenuCrawler};
use crate::fetch::Fetcher;
use crate::utils::excerpt;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Business types that count as supporting evidence
const RELEVANT_TYPES: &[&str] = &["cafe", "coffee_shop", "tea_room"];

/// One user review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorialSummary {
    #[serde(default)]
    pub overview: Option<String>,
}

/// Place details as returned by the places API.
///
/// Every field is optional; anything missing or null counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub editorial_summary: Option<EditorialSummary>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub types: Vec<String>,
    /// Requested as `type`; some payloads carry it next to `types`
    #[serde(
        default,
        rename = "type",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub type_field: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(t)) if t.is_empty() => Vec::new(),
        Some(OneOrMany::One(t)) => vec![t],
        Some(OneOrMany::Many(ts)) => ts,
        None => Vec::new(),
    })
}

impl PlaceDetails {
    /// Website URL, if present and non-blank
    pub fn website(&self) -> Option<&str> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Category tags from both `types` and `type`, without repeats
    pub fn all_types(&self) -> Vec<&str> {
        let mut all: Vec<&str> = Vec::new();
        for t in self.types.iter().chain(&self.type_field) {
            if !all.contains(&t.as_str()) {
                all.push(t);
            }
        }
        all
    }
}

/// Why a verdict or supporting signal was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    /// The website crawl matched a matcha pattern
    MenuMatch,
    ReviewMention,
    NameMention,
    SummaryMention,
    RelevantBusinessType,
    /// Placeholder so the list is never empty
    NoIndicators,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Evidence::MenuMatch => "Found on menu (website scan)",
            Evidence::ReviewMention => "Mentioned in reviews",
            Evidence::NameMention => "Mentioned in name",
            Evidence::SummaryMention => "Mentioned in editorial summary",
            Evidence::RelevantBusinessType => "Relevant business type (e.g., cafe, tea room)",
            Evidence::NoIndicators => "No specific matcha indicators found.",
        };
        f.write_str(text)
    }
}

/// Verdict and evidence for one business
#[derive(Debug, Clone)]
pub struct MatchaAssessment {
    /// Set by the website crawl alone
    pub has_matcha: bool,
    pub evidence: Vec<Evidence>,
    /// Absent when the business has no website
    pub crawl: Option<CrawlReport>,
}

impl MatchaAssessment {
    pub fn evidence_strings(&self) -> Vec<String> {
        self.evidence.iter().map(ToString::to_string).collect()
    }
}

/// Combines the menu crawl with supporting signals from place details
pub struct MatchaEvaluator<F> {
    crawler: MenuCrawler<F>,
}

impl<F: Fetcher> MatchaEvaluator<F> {
    pub fn new(crawler: MenuCrawler<F>) -> Self {
        Self { crawler }
    }

    pub fn crawler(&self) -> &MenuCrawler<F> {
        &self.crawler
    }

    pub async fn evaluate(&self, details: &PlaceDetails) -> MatchaAssessment {
        let name = details.display_name();
        ::log::info!("Checking for matcha at: {}", name);

        let mut evidence = Vec::new();

        let crawl = match details.website() {
            Some(website) => Some(self.crawler.crawl(website).await),
            None => {
                ::log::info!("No website available for menu scan of {}", name);
                None
            }
        };
        let has_matcha = crawl.as_ref().is_some_and(CrawlReport::found);
        if has_matcha {
            evidence.push(Evidence::MenuMatch);
        }

        evidence.extend(supporting_evidence(details));

        if evidence.is_empty() {
            evidence.push(Evidence::NoIndicators);
        }

        ::log::info!(
            "Final result for {}: {} - evidence: {:?}",
            name,
            if has_matcha {
                "has matcha (on menu)"
            } else {
                "no matcha on menu"
            },
            evidence.iter().map(ToString::to_string).collect::<Vec<_>>()
        );

        MatchaAssessment {
            has_matcha,
            evidence,
            crawl,
        }
    }
}

/// Signals that are recorded but never change the verdict
pub fn supporting_evidence(details: &PlaceDetails) -> Vec<Evidence> {
    let mut evidence = Vec::new();

    // One mention is enough; later reviews are not scanned
    if let Some((i, review)) = details
        .reviews
        .iter()
        .enumerate()
        .find(|(_, r)| mentions_matcha(&r.text))
    {
        ::log::info!(
            "Matcha mentioned in review {}: {}...",
            i + 1,
            excerpt(&review.text, 100)
        );
        evidence.push(Evidence::ReviewMention);
    }

    if details.name.as_deref().is_some_and(mentions_matcha) {
        evidence.push(Evidence::NameMention);
    }

    if let Some(overview) = details
        .editorial_summary
        .as_ref()
        .and_then(|s| s.overview.as_deref())
        .filter(|o| mentions_matcha(o))
    {
        ::log::info!(
            "Matcha mentioned in editorial summary: {}...",
            excerpt(overview, 100)
        );
        evidence.push(Evidence::SummaryMention);
    }

    let types = details.all_types();
    ::log::debug!("Business types: {:?}", types);
    if types.iter().any(|t| RELEVANT_TYPES.contains(t)) {
        evidence.push(Evidence::RelevantBusinessType);
    }

    evidence
}

fn mentions_matcha(text: &str) -> bool {
    text.to_lowercase().contains("matcha")
}
