use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::FetchError;
use super::source::{CategoryFilter, FetchSource, ObjectPosition, RegionRecord};
use crate::catalog::SatId;

pub const DEFAULT_BASE_URL: &str = "https://api.n2yo.com/rest/v1/satellite";

/// N2YO category id for geosynchronous objects; 0 means "any".
const GEO_CATEGORY_ID: u32 = 10;

/// REST client for the N2YO satellite API. The api key travels as a query
/// parameter; every call has a bounded timeout.
pub struct N2yoClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl N2yoClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl FetchSource for N2yoClient {
    async fn fetch_region(
        &self,
        lat: f64,
        lng: f64,
        radius_km: u32,
        filter: CategoryFilter,
    ) -> Result<Vec<RegionRecord>, FetchError> {
        let category_id = match filter {
            CategoryFilter::Any => 0,
            CategoryFilter::Geosynchronous => GEO_CATEGORY_ID,
        };
        // /above/{lat}/{lng}/{alt}/{search_radius}/{category_id}/
        let path = format!("above/{lat}/{lng}/0/{radius_km}/{category_id}/");
        let body = self.get_json(&path).await?;
        check_error_field(&body)?;

        let items = body
            .get("above")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<AboveItem>(item) {
                Ok(item) => records.push(RegionRecord {
                    id: item.satid,
                    name: item.satname,
                    lat: item.satlat,
                    lng: item.satlng,
                    alt_km: item.satalt,
                }),
                Err(e) => {
                    // A malformed record is skipped, not fatal to the batch.
                    log::debug!("skipping malformed above record: {e}");
                }
            }
        }
        Ok(records)
    }

    async fn fetch_position(
        &self,
        id: SatId,
        window_seconds: u32,
    ) -> Result<Vec<ObjectPosition>, FetchError> {
        // /positions/{id}/{observer_lat}/{observer_lng}/{observer_alt}/{seconds}/
        let path = format!("positions/{id}/0/0/0/{window_seconds}/");
        let body = self.get_json(&path).await?;
        check_error_field(&body)?;

        let items = body
            .get("positions")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut positions = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<PositionItem>(item) {
                Ok(item) => positions.push(ObjectPosition {
                    lat: item.satlatitude,
                    lng: item.satlongitude,
                    alt_km: item.sataltitude,
                }),
                Err(e) => {
                    log::debug!("skipping malformed position record: {e}");
                }
            }
        }
        Ok(positions)
    }
}

#[derive(Debug, Deserialize)]
struct AboveItem {
    satid: SatId,
    satname: Option<String>,
    satlat: Option<f64>,
    satlng: Option<f64>,
    #[serde(default)]
    satalt: f64,
}

#[derive(Debug, Deserialize)]
struct PositionItem {
    satlatitude: Option<f64>,
    satlongitude: Option<f64>,
    #[serde(default)]
    sataltitude: f64,
}

/// N2YO reports problems as an `error` string inside an HTTP 200 body.
fn check_error_field(body: &serde_json::Value) -> Result<(), FetchError> {
    let Some(msg) = body.get("error").and_then(|v| v.as_str()) else {
        return Ok(());
    };
    Err(classify_upstream_error(msg))
}

fn classify_upstream_error(msg: &str) -> FetchError {
    let lower = msg.to_lowercase();
    if lower.contains("exceeded") || lower.contains("rate limit") {
        FetchError::RateLimited(msg.to_string())
    } else {
        FetchError::Upstream(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_limit_message_is_a_rate_limit_signal() {
        let err = classify_upstream_error("You have exceeded the number of transactions per hour");
        assert!(err.is_rate_limited());

        let err = classify_upstream_error("API rate limit reached");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn other_upstream_errors_are_not_rate_limits() {
        let err = classify_upstream_error("Invalid API key");
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn error_field_in_body_is_rejected() {
        let body = json!({"error": "Invalid API key"});
        assert!(check_error_field(&body).is_err());

        let body = json!({"info": {"satcount": 0}, "above": []});
        assert!(check_error_field(&body).is_ok());
    }

    #[test]
    fn malformed_above_item_fails_item_decode() {
        // Missing satid: the item decode fails and the record is skipped.
        let item = json!({"satname": "MYSTERY", "satlat": 1.0});
        assert!(serde_json::from_value::<AboveItem>(item).is_err());

        let item = json!({"satid": 43013, "satname": "NOAA 20", "satlat": 1.0, "satlng": 2.0});
        let decoded = serde_json::from_value::<AboveItem>(item).unwrap();
        assert_eq!(decoded.satid, 43013);
        assert_eq!(decoded.satalt, 0.0);
    }
}
