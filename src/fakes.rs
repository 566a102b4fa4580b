//! In-memory fakes for the network seams (testing only)

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::LatLng;
use crate::discovery::{NearbyPage, NearbyRequest, PlaceSummary, PlacesApi};
use crate::error::{FetchError, PlacesError};
use crate::fetch::{Fetcher, PageFetchResult};
use crate::reporter::{CrawlEvent, Reporter};

// ---------------------------------------------------------------------------
// StaticSite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum FakeResponse {
    Page {
        status: u16,
        content_type: Option<String>,
        body: String,
    },
    Unreachable,
}

/// Fixed URL → response map. Unknown URLs answer 404. Every fetch is recorded.
#[derive(Debug, Default)]
pub struct StaticSite {
    pages: HashMap<String, FakeResponse>,
    fetched: Mutex<Vec<String>>,
}

impl StaticSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.response(url, 200, Some("text/html; charset=utf-8"), html)
    }

    pub fn response(
        mut self,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: &str,
    ) -> Self {
        self.pages.insert(
            url.to_string(),
            FakeResponse::Page {
                status,
                content_type: content_type.map(str::to_string),
                body: body.to_string(),
            },
        );
        self
    }

    /// Requests to `url` fail at the transport level
    pub fn unreachable(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), FakeResponse::Unreachable);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for StaticSite {
    async fn fetch(&self, url: &Url) -> Result<PageFetchResult, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        match self.pages.get(url.as_str()) {
            Some(FakeResponse::Page {
                status,
                content_type,
                body,
            }) => Ok(PageFetchResult {
                status: *status,
                content_type: content_type.clone(),
                body: (*status == 200).then(|| body.clone()),
            }),
            Some(FakeResponse::Unreachable) => {
                Err(FetchError::Transport(format!("connection refused: {}", url)))
            }
            None => Ok(PageFetchResult {
                status: 404,
                content_type: Some("text/html".to_string()),
                body: None,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingReporter
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<CrawlEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<CrawlEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &CrawlEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// FakePlaces
// ---------------------------------------------------------------------------

/// Scripted places API: pages keyed by token (`None` for the first page)
#[derive(Debug, Default)]
pub struct FakePlaces {
    geocode: Option<LatLng>,
    geocode_error: Option<fn() -> PlacesError>,
    pages: HashMap<Option<String>, Result<NearbyPage, fn() -> PlacesError>>,
    details: HashMap<String, Result<Value, fn() -> PlacesError>>,
    pub nearby_calls: Mutex<Vec<(NearbyRequest, Option<String>)>>,
    pub detail_calls: Mutex<Vec<String>>,
}

impl FakePlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geocodes_to(mut self, coords: LatLng) -> Self {
        self.geocode = Some(coords);
        self
    }

    pub fn geocode_fails(mut self, error: fn() -> PlacesError) -> Self {
        self.geocode_error = Some(error);
        self
    }

    pub fn page(mut self, token: Option<&str>, place_ids: &[&str], next: Option<&str>) -> Self {
        let results = place_ids
            .iter()
            .map(|id| PlaceSummary {
                place_id: (!id.is_empty()).then(|| id.to_string()),
                name: Some(format!("Place {}", id)),
            })
            .collect();
        self.pages.insert(
            token.map(str::to_string),
            Ok(NearbyPage {
                results,
                next_page_token: next.map(str::to_string),
            }),
        );
        self
    }

    pub fn page_error(mut self, token: Option<&str>, error: fn() -> PlacesError) -> Self {
        self.pages.insert(token.map(str::to_string), Err(error));
        self
    }

    pub fn details(mut self, place_id: &str, details: Value) -> Self {
        self.details.insert(place_id.to_string(), Ok(details));
        self
    }

    pub fn details_error(mut self, place_id: &str, error: fn() -> PlacesError) -> Self {
        self.details.insert(place_id.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl PlacesApi for FakePlaces {
    async fn geocode(&self, _address: &str) -> Result<Option<LatLng>, PlacesError> {
        match self.geocode_error {
            Some(error) => Err(error()),
            None => Ok(self.geocode),
        }
    }

    async fn nearby_search(
        &self,
        request: &NearbyRequest,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, PlacesError> {
        self.nearby_calls
            .lock()
            .unwrap()
            .push((request.clone(), page_token.map(str::to_string)));

        match self.pages.get(&page_token.map(str::to_string)) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(error)) => Err(error()),
            None => Err(PlacesError::InvalidRequest("unknown page token".to_string())),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Value, PlacesError> {
        self.detail_calls.lock().unwrap().push(place_id.to_string());

        match self.details.get(place_id) {
            Some(Ok(details)) => Ok(details.clone()),
            Some(Err(error)) => Err(error()),
            None => Err(PlacesError::NotFound(place_id.to_string())),
        }
    }
}
