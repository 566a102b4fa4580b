//! Business discovery through the places web service
//!
//! Geocodes a location, pages through nearby search, fetches details for each
//! place and runs the matcha evaluation on it.

use crate::config::{DiscoveryConfig, LatLng};
use crate::error::PlacesError;
use crate::evidence::{MatchaEvaluator, PlaceDetails};
use crate::fetch::Fetcher;
use crate::results::BusinessRecord;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Fields requested from the place details endpoint
const DETAIL_FIELDS: &str = "name,website,reviews,editorial_summary,type,place_id,formatted_address,geometry,opening_hours,photo,rating,user_ratings_total,price_level,business_status";

/// Parameters of a nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    pub location: LatLng,
    pub radius_m: u32,
    pub place_type: String,
}

/// Minimal place entry from nearby search
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSummary {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of nearby-search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyPage {
    #[serde(default)]
    pub results: Vec<PlaceSummary>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Coordinates for a free-form address; `None` when nothing matches
    async fn geocode(&self, address: &str) -> Result<Option<LatLng>, PlacesError>;

    /// First page when `page_token` is `None`, otherwise the page it names
    async fn nearby_search(
        &self,
        request: &NearbyRequest,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, PlacesError>;

    /// Raw details payload (`result` object) for a place
    async fn place_details(&self, place_id: &str) -> Result<Value, PlacesError>;
}

/// Google Places / Geocoding web service client
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(
        api_key: impl Into<String>,
        config: &DiscoveryConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET an endpoint and check the API-level `status` field
    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, PlacesError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        ::log::debug!("Places API request: {} {:?}", endpoint, params);

        let body: Value = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let status = body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN_ERROR");
        let message = body.get("error_message").and_then(Value::as_str);
        match PlacesError::from_status(status, message) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn geocode(&self, address: &str) -> Result<Option<LatLng>, PlacesError> {
        let body = match self
            .get_json("geocode/json", &[("address", address)])
            .await
        {
            Ok(body) => body,
            Err(PlacesError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let results: Vec<GeocodeResult> =
            serde_json::from_value(body.get("results").cloned().unwrap_or(Value::Null))
                .unwrap_or_default();
        Ok(results.into_iter().next().map(|r| r.geometry.location))
    }

    async fn nearby_search(
        &self,
        request: &NearbyRequest,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, PlacesError> {
        let body = match page_token {
            Some(token) => {
                self.get_json("place/nearbysearch/json", &[("pagetoken", token)])
                    .await
            }
            None => {
                let location = format!("{},{}", request.location.lat, request.location.lng);
                let radius = request.radius_m.to_string();
                self.get_json(
                    "place/nearbysearch/json",
                    &[
                        ("location", location.as_str()),
                        ("radius", radius.as_str()),
                        ("type", request.place_type.as_str()),
                    ],
                )
                .await
            }
        };

        match body {
            Ok(body) => Ok(serde_json::from_value(body)?),
            Err(PlacesError::NotFound(_)) => Ok(NearbyPage::default()),
            Err(e) => Err(e),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Value, PlacesError> {
        let mut body = self
            .get_json(
                "place/details/json",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        match body.get_mut("result").map(Value::take) {
            Some(result) if result.is_object() => Ok(result),
            _ => Err(PlacesError::NotFound(place_id.to_string())),
        }
    }
}

/// Drives search → details → evaluation for every place around a location
pub struct BusinessDiscovery<P, F> {
    places: P,
    evaluator: MatchaEvaluator<F>,
    config: DiscoveryConfig,
}

impl<P: PlacesApi, F: Fetcher> BusinessDiscovery<P, F> {
    pub fn new(places: P, evaluator: MatchaEvaluator<F>, config: DiscoveryConfig) -> Self {
        Self {
            places,
            evaluator,
            config,
        }
    }

    pub fn places(&self) -> &P {
        &self.places
    }

    /// Evaluate every place found around the configured location.
    ///
    /// Authorization and quota errors abort the run. Other per-place failures
    /// skip that place; a failure on a later result page ends pagination with
    /// the records gathered so far.
    pub async fn discover(&self) -> Result<Vec<BusinessRecord>, PlacesError> {
        let origin = self.resolve_location().await?;
        let request = NearbyRequest {
            location: origin,
            radius_m: self.config.radius_m,
            place_type: self.config.place_type.clone(),
        };
        ::log::info!(
            "Searching for {} places within {} m of {:?}",
            request.place_type,
            request.radius_m,
            origin
        );

        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0;
        let mut attempted = 0;

        loop {
            page_count += 1;
            ::log::info!("Fetching result page {}", page_count);

            let page = match self
                .places
                .nearby_search(&request, page_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) if e.is_fatal() || page_token.is_none() => return Err(e),
                Err(PlacesError::InvalidRequest(msg)) => {
                    ::log::error!("Page token rejected ({}); stopping pagination", msg);
                    break;
                }
                Err(e) => {
                    ::log::error!("Places API error on page {}: {}", page_count, e);
                    break;
                }
            };
            ::log::info!("Received {} results on page {}", page.results.len(), page_count);

            let place_ids: Vec<String> = page
                .results
                .into_iter()
                .filter_map(|summary| {
                    if summary.place_id.is_none() {
                        ::log::warn!(
                            "Skipping a place without place_id: {}",
                            summary.name.as_deref().unwrap_or("Unknown name")
                        );
                    }
                    summary.place_id
                })
                .collect();
            attempted += place_ids.len();

            let outcomes: Vec<_> = stream::iter(place_ids)
                .map(|place_id| self.process_place(place_id))
                .buffered(self.config.max_concurrency.max(1))
                .collect()
                .await;
            for outcome in outcomes {
                if let Some(record) = outcome? {
                    records.push(record);
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                ::log::info!("No more pages to fetch");
                break;
            }

            // A fresh page token is not valid until a short while after it is issued
            ::log::info!("Waiting before fetching next page...");
            tokio::time::sleep(self.config.page_token_delay()).await;
        }

        ::log::info!(
            "Attempted details for {} places, recorded {} businesses",
            attempted,
            records.len()
        );
        Ok(records)
    }

    async fn resolve_location(&self) -> Result<LatLng, PlacesError> {
        let location = &self.config.location;
        match self.places.geocode(location).await {
            Ok(Some(coords)) => Ok(coords),
            Ok(None) => {
                ::log::warn!(
                    "Could not geocode {}; using fallback coordinates {:?}",
                    location,
                    self.config.fallback_location
                );
                Ok(self.config.fallback_location)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                ::log::warn!(
                    "Error geocoding {} ({}); using fallback coordinates {:?}",
                    location,
                    e,
                    self.config.fallback_location
                );
                Ok(self.config.fallback_location)
            }
        }
    }

    async fn process_place(&self, place_id: String) -> Result<Option<BusinessRecord>, PlacesError> {
        let raw = match self.places.place_details(&place_id).await {
            Ok(raw) => raw,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                ::log::error!("Error fetching details for {}: {}", place_id, e);
                return Ok(None);
            }
        };

        let details: PlaceDetails = match serde_json::from_value(raw.clone()) {
            Ok(details) => details,
            Err(e) => {
                ::log::error!("Unreadable details for {}: {}", place_id, e);
                return Ok(None);
            }
        };

        let assessment = self.evaluator.evaluate(&details).await;
        let record = BusinessRecord::new(place_id, &details, &assessment, raw);
        ::log::info!(
            "Processed: {} - Matcha: {} (Evidence: {:?})",
            details.display_name(),
            record.has_matcha,
            record.matcha_evidence
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::crawlers::MenuCrawler;
    use crate::fakes::{FakePlaces, StaticSite};
    use serde_json::json;

    fn discovery(places: FakePlaces, site: StaticSite) -> BusinessDiscovery<FakePlaces, StaticSite> {
        let crawler_config = CrawlerConfig {
            politeness_delay_ms: 0,
            ..CrawlerConfig::default()
        };
        let evaluator = MatchaEvaluator::new(MenuCrawler::new(site, &crawler_config).unwrap());
        BusinessDiscovery::new(places, evaluator, DiscoveryConfig::default())
    }

    fn kyoto() -> LatLng {
        LatLng {
            lat: 35.0116,
            lng: 135.7681,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_paginates_and_evaluates() {
        let places = FakePlaces::new()
            .geocodes_to(kyoto())
            .page(None, &["a", "b"], Some("tok-2"))
            .page(Some("tok-2"), &["c"], None)
            .details("a", json!({ "name": "Alpha", "website": "https://alpha.test/" }))
            .details("b", json!({ "name": "Matcha Bar" }))
            .details("c", json!({ "name": "Gamma", "types": ["cafe"] }));
        let site = StaticSite::new().page("https://alpha.test/", "<body>Hot matcha</body>");
        let discovery = discovery(places, site);

        let records = discovery.discover().await.unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Alpha", "Matcha Bar", "Gamma"]);
        assert!(records[0].has_matcha);
        assert!(!records[1].has_matcha);
        assert_eq!(records[1].matcha_evidence, vec!["Mentioned in name"]);
        assert_eq!(records[2].matcha_evidence, vec!["Relevant business type (e.g., cafe, tea room)"]);
        assert_eq!(records[0].details["website"], "https://alpha.test/");

        let calls = discovery.places().nearby_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0.location, kyoto());
        assert_eq!(calls[0].1, None);
        assert_eq!(calls[1].1.as_deref(), Some("tok-2"));
    }

    #[tokio::test]
    async fn test_geocode_miss_uses_fallback() {
        let places = FakePlaces::new().page(None, &[], None);
        let discovery = discovery(places, StaticSite::new());

        let records = discovery.discover().await.unwrap();

        assert!(records.is_empty());
        let calls = discovery.places().nearby_calls.lock().unwrap().clone();
        assert_eq!(calls[0].0.location, DiscoveryConfig::default().fallback_location);
    }

    #[tokio::test]
    async fn test_authorization_error_surfaces() {
        let places = FakePlaces::new().page_error(None, || {
            PlacesError::AuthorizationDenied("API key not valid".to_string())
        });
        let discovery = discovery(places, StaticSite::new());

        let err = discovery.discover().await.unwrap_err();

        assert!(matches!(err, PlacesError::AuthorizationDenied(_)));
    }

    #[tokio::test]
    async fn test_geocode_authorization_error_surfaces() {
        let places = FakePlaces::new()
            .geocode_fails(|| PlacesError::AuthorizationDenied("denied".to_string()));
        let discovery = discovery(places, StaticSite::new());

        assert!(matches!(
            discovery.discover().await,
            Err(PlacesError::AuthorizationDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_on_details_surfaces() {
        let places = FakePlaces::new()
            .geocodes_to(kyoto())
            .page(None, &["a"], None)
            .details_error("a", || PlacesError::RateLimited("OVER_QUERY_LIMIT".to_string()));
        let discovery = discovery(places, StaticSite::new());

        let err = discovery.discover().await.unwrap_err();

        assert!(matches!(err, PlacesError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_missing_place_id_and_failed_details_are_skipped() {
        let places = FakePlaces::new()
            .geocodes_to(kyoto())
            .page(None, &["", "gone", "ok"], None)
            .details("ok", json!({ "name": "Okay Cafe" }));
        let discovery = discovery(places, StaticSite::new());

        let records = discovery.discover().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].place_id, "ok");
        let detail_calls = discovery.places().detail_calls.lock().unwrap().clone();
        assert_eq!(detail_calls, vec!["gone", "ok"]);
    }

    #[tokio::test]
    async fn test_partial_details_still_produce_a_record() {
        let places = FakePlaces::new()
            .geocodes_to(kyoto())
            .page(None, &["a", "b"], None)
            .details(
                "a",
                json!({
                    "name": "Kissa",
                    "reviews": [{ "text": null }, { "text": "Lovely matcha" }]
                }),
            )
            .details("b", json!({ "name": "Tea Stop", "type": "cafe", "types": ["cafe"] }));
        let discovery = discovery(places, StaticSite::new());

        let records = discovery.discover().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].matcha_evidence, vec!["Mentioned in reviews"]);
        assert_eq!(
            records[1].matcha_evidence,
            vec!["Relevant business type (e.g., cafe, tea room)"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_page_token_keeps_partial_results() {
        let places = FakePlaces::new()
            .geocodes_to(kyoto())
            .page(None, &["a"], Some("stale"))
            .page_error(Some("stale"), || {
                PlacesError::InvalidRequest("INVALID_REQUEST".to_string())
            })
            .details("a", json!({ "name": "Alpha" }));
        let discovery = discovery(places, StaticSite::new());

        let records = discovery.discover().await.unwrap();

        assert_eq!(records.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_before_next_page() {
        let places = FakePlaces::new()
            .geocodes_to(kyoto())
            .page(None, &[], Some("t2"))
            .page(Some("t2"), &[], None);
        let discovery = discovery(places, StaticSite::new());
        let start = tokio::time::Instant::now();

        discovery.discover().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}
