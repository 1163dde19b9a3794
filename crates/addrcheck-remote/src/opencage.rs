use crate::http::{build_client, parse_endpoint, read_response};
use crate::Result;
use addrcheck_core::{GeoPoint, Geocoder};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

pub struct OpenCageGeocoder {
    client: Client,
    url: Url,
    api_key: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

impl OpenCageGeocoder {
    pub fn new(url: &str, api_key: String, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(user_agent)?,
            url: parse_endpoint(url)?,
            api_key,
        })
    }

    fn search(&self, query: &str) -> Result<(u16, String)> {
        let response = self
            .client
            .get(self.url.clone())
            .query(&[("q", query), ("key", self.api_key.as_str()), ("limit", "1")])
            .send()?;
        read_response(response)
    }
}

impl Geocoder for OpenCageGeocoder {
    fn geocode(&self, standardized_address: &str) -> Option<GeoPoint> {
        match self.search(standardized_address) {
            Ok((status, body)) => {
                debug!(status, "geocode lookup finished");
                interpret_geocode_response(status, &body)
            }
            Err(err) => {
                // The request url carries the api key.
                let err = match err {
                    crate::RemoteError::Http(http) => http.without_url().to_string(),
                    other => other.to_string(),
                };
                warn!(error = %err, "geocode lookup failed");
                None
            }
        }
    }
}

/// First candidate of a successful response; anything else has no point.
pub fn interpret_geocode_response(status: u16, body: &str) -> Option<GeoPoint> {
    if status != 200 {
        return None;
    }
    let parsed: GeocodeResponse = serde_json::from_str(body).ok()?;
    let first = parsed.results.into_iter().next()?;
    GeoPoint::new(first.geometry.lat, first.geometry.lng)
}

#[cfg(test)]
mod tests {
    use super::interpret_geocode_response;
    use addrcheck_core::GeoPoint;

    #[test]
    fn takes_first_result() {
        let body = r#"{
            "results": [
                {"confidence": 9, "geometry": {"lat": 39.7990, "lng": -89.6440}},
                {"confidence": 5, "geometry": {"lat": 40.0, "lng": -90.0}}
            ],
            "status": {"code": 200, "message": "OK"},
            "total_results": 2
        }"#;
        assert_eq!(
            interpret_geocode_response(200, body),
            GeoPoint::new(39.7990, -89.6440)
        );
    }

    #[test]
    fn zero_results_is_absent() {
        let body = r#"{"results": [], "status": {"code": 200, "message": "OK"}}"#;
        assert_eq!(interpret_geocode_response(200, body), None);
    }

    #[test]
    fn error_status_and_garbage_are_absent() {
        assert_eq!(
            interpret_geocode_response(401, r#"{"status":{"code":401}}"#),
            None
        );
        assert_eq!(interpret_geocode_response(200, "<html>"), None);
    }
}
