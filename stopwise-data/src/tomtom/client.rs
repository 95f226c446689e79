//! HTTP client for the TomTom Matrix Routing and Calculate Route services.
//!
//! [`TomTomClient`] implements both [`TravelTimeProvider`] and
//! [`RoutingService`]. Requests carry the credential as the `key` query
//! parameter; every URL that reaches an error or a log line has it removed.

use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, LineString};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use stopwise_core::{
    Coordinate, RouteGeometry, RouteLeg, RouteSummary, RoutingService, ServiceError,
    TravelTimeProvider, TravelTimes, UNREACHABLE,
};
use url::Url;

use super::config::{ProviderBuildError, TomTomConfig};
use super::wire::{ErrorResponse, MatrixRequest, MatrixResponse, RouteResponse, Summary};

/// Only the fastest route is requested.
const ROUTE_TYPE: &str = "fastest";

const MATRIX_PATH: [&str; 5] = ["routing", "1", "matrix", "sync", "json"];

/// Client for the TomTom Routing API.
///
/// The client is a cheap handle: clone it to share one connection pool
/// between the distance and routing roles.
#[derive(Debug, Clone)]
pub struct TomTomClient {
    client: Client,
    config: TomTomConfig,
    base: Url,
}

/// A request URL together with its loggable form.
struct Endpoint {
    url: Url,
    shown: String,
}

impl TomTomClient {
    /// Create a client for the public API with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(TomTomConfig::new(api_key))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute hierarchical URL
    /// or the HTTP client fails to build.
    pub fn with_config(config: TomTomConfig) -> Result<Self, ProviderBuildError> {
        let base = Url::parse(&config.base_url).map_err(|err| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ProviderBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            base,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TomTomConfig {
        &self.config
    }

    /// Build `{base}/{segments...}?routeType=..&travelMode=..&key=..`.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Endpoint {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("routeType", ROUTE_TYPE)
            .append_pair("travelMode", self.config.travel_mode.as_str());
        let shown = url.to_string();
        url.query_pairs_mut()
            .append_pair("key", self.config.api_key.expose());
        Endpoint { url, shown }
    }

    fn matrix_endpoint(&self) -> Endpoint {
        self.endpoint(MATRIX_PATH)
    }

    fn route_endpoint(&self, stops: &[Coordinate]) -> Endpoint {
        let locations = stops
            .iter()
            .map(|stop| format!("{},{}", stop.latitude(), stop.longitude()))
            .collect::<Vec<_>>()
            .join(":");
        self.endpoint(["routing", "1", "calculateRoute", locations.as_str(), "json"])
    }

    fn ensure_credential(&self) -> Result<(), ServiceError> {
        if self.config.api_key.is_empty() {
            return Err(ServiceError::InvalidCredential { status: None });
        }
        Ok(())
    }

    /// Send `request` and decode a successful JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        shown: &str,
    ) -> Result<T, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, shown))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(convert_status(status, &body, shown));
        }

        response
            .json()
            .await
            .map_err(|err| ServiceError::ParseError {
                message: err.without_url().to_string(),
            })
    }

    /// Convert a reqwest error to a [`ServiceError`].
    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> ServiceError {
        if error.is_timeout() {
            return ServiceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ServiceError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.without_url().to_string(),
            };
        }

        ServiceError::NetworkError {
            url: url.to_owned(),
            message: error.without_url().to_string(),
        }
    }
}

/// Map a non-success status and its body to a [`ServiceError`].
fn convert_status(status: StatusCode, body: &str, url: &str) -> ServiceError {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return ServiceError::InvalidCredential {
            status: Some(status.as_u16()),
        };
    }
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|envelope| envelope.error.text())
        .unwrap_or_else(|_| body.trim().to_owned());
    ServiceError::HttpError {
        url: url.to_owned(),
        status: status.as_u16(),
        message,
    }
}

fn to_duration(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

fn to_summary(summary: Summary) -> RouteSummary {
    RouteSummary {
        length_meters: summary.length_in_meters,
        travel_time: to_duration(summary.travel_time_in_seconds),
    }
}

/// Convert the first matrix row into per-destination travel times.
///
/// Failed cells are [`UNREACHABLE`].
fn convert_matrix(response: MatrixResponse, expected: usize) -> Result<TravelTimes, ServiceError> {
    let row = response
        .matrix
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NoResult {
            message: "matrix response has no rows".to_owned(),
        })?;
    if row.len() != expected {
        return Err(ServiceError::CountMismatch {
            expected,
            actual: row.len(),
        });
    }
    Ok(row
        .iter()
        .map(|cell| {
            cell.summary()
                .map_or(UNREACHABLE, |s| to_duration(s.travel_time_in_seconds))
        })
        .collect())
}

/// Convert the first route into leg geometry.
fn convert_route(response: RouteResponse) -> Result<RouteGeometry, ServiceError> {
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NoResult {
            message: "no route found".to_owned(),
        })?;
    let legs = route
        .legs
        .into_iter()
        .map(|leg| RouteLeg {
            path: leg
                .points
                .iter()
                .map(|p| Coord {
                    x: p.longitude,
                    y: p.latitude,
                })
                .collect::<LineString<f64>>(),
            summary: to_summary(leg.summary),
        })
        .collect();
    Ok(RouteGeometry::new(legs, to_summary(route.summary)))
}

#[async_trait(?Send)]
impl TravelTimeProvider for TomTomClient {
    async fn get_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<TravelTimes, ServiceError> {
        if destinations.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        self.ensure_credential()?;

        let Endpoint { url, shown } = self.matrix_endpoint();
        log::debug!("matrix request for {} destination(s): {shown}", destinations.len());
        let body = MatrixRequest::one_to_many(origin, destinations);
        let response: MatrixResponse = self
            .send_json(self.client.post(url).json(&body), &shown)
            .await?;
        convert_matrix(response, destinations.len())
    }
}

#[async_trait(?Send)]
impl RoutingService for TomTomClient {
    async fn calculate_route(&self, stops: &[Coordinate]) -> Result<RouteGeometry, ServiceError> {
        if stops.len() < 2 {
            return Err(ServiceError::TooFewStops {
                actual: stops.len(),
            });
        }
        self.ensure_credential()?;

        let Endpoint { url, shown } = self.route_endpoint(stops);
        log::debug!("route request through {} stop(s): {shown}", stops.len());
        let response: RouteResponse = self.send_json(self.client.get(url), &shown).await?;
        convert_route(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use stopwise_core::ErrorClass;

    use crate::tomtom::TravelMode;

    fn coordinate(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    #[fixture]
    fn client() -> TomTomClient {
        TomTomClient::with_config(
            TomTomConfig::new("secret-key").with_base_url("https://tomtom.example.com"),
        )
        .expect("client should build")
    }

    fn matrix(json: &str) -> MatrixResponse {
        serde_json::from_str(json).expect("should deserialise")
    }

    #[rstest]
    fn matrix_url_hides_key(client: TomTomClient) {
        let endpoint = client.matrix_endpoint();

        assert_eq!(
            endpoint.shown,
            "https://tomtom.example.com/routing/1/matrix/sync/json?routeType=fastest&travelMode=car"
        );
        assert_eq!(
            endpoint.url.query_pairs().find(|(k, _)| k == "key").map(|(_, v)| v.into_owned()),
            Some("secret-key".to_owned())
        );
    }

    #[rstest]
    fn route_url_joins_stops_in_order(client: TomTomClient) {
        let stops = [coordinate(41.0082, 28.9784), coordinate(41.043, 28.985)];

        let endpoint = client.route_endpoint(&stops);

        assert_eq!(
            endpoint.shown,
            "https://tomtom.example.com/routing/1/calculateRoute/41.0082,28.9784:41.043,28.985/json?routeType=fastest&travelMode=car"
        );
    }

    #[rstest]
    fn base_url_path_is_kept() {
        let client = TomTomClient::with_config(
            TomTomConfig::new("k")
                .with_base_url("http://localhost:8080/proxy/")
                .with_travel_mode(TravelMode::Van),
        )
        .expect("client should build");

        let shown = client.matrix_endpoint().shown;

        assert!(shown.starts_with("http://localhost:8080/proxy/routing/1/"));
        assert!(shown.ends_with("travelMode=van"));
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:ops@example.com")]
    fn rejects_unusable_base_url(#[case] base_url: &str) {
        let err = TomTomClient::with_config(TomTomConfig::new("k").with_base_url(base_url))
            .expect_err("base URL should be rejected");

        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn convert_matrix_reads_travel_times() {
        let response = matrix(
            r#"{"matrix": [[
                {"statusCode": 200, "response": {"routeSummary": {"lengthInMeters": 5000, "travelTimeInSeconds": 600}}},
                {"statusCode": 200, "response": {"routeSummary": {"lengthInMeters": 1500, "travelTimeInSeconds": 200}}}
            ]]}"#,
        );

        let times = convert_matrix(response, 2).expect("should convert");

        assert_eq!(times, vec![Duration::from_secs(600), Duration::from_secs(200)]);
    }

    #[rstest]
    fn convert_matrix_marks_failed_cells_unreachable() {
        let response = matrix(
            r#"{"matrix": [[
                {"statusCode": 400, "response": {"errorText": "Engine error"}},
                {"statusCode": 200, "response": {"routeSummary": {"lengthInMeters": 1, "travelTimeInSeconds": 2}}}
            ]]}"#,
        );

        let times = convert_matrix(response, 2).expect("should convert");

        assert_eq!(times, vec![UNREACHABLE, Duration::from_secs(2)]);
    }

    #[rstest]
    fn convert_matrix_detects_count_mismatch() {
        let response = matrix(
            r#"{"matrix": [[
                {"statusCode": 200, "response": {"routeSummary": {"lengthInMeters": 1, "travelTimeInSeconds": 2}}}
            ]]}"#,
        );

        let err = convert_matrix(response, 3).expect_err("should fail");

        assert_eq!(err, ServiceError::CountMismatch { expected: 3, actual: 1 });
    }

    #[rstest]
    fn convert_matrix_without_rows_is_no_result() {
        let err = convert_matrix(matrix(r#"{"matrix": []}"#), 1).expect_err("should fail");

        assert_eq!(err.class(), ErrorClass::NoResult);
    }

    #[rstest]
    fn convert_route_builds_legs() {
        let response: RouteResponse = serde_json::from_str(
            r#"{"routes": [{
                "summary": {"lengthInMeters": 3000, "travelTimeInSeconds": 420},
                "legs": [
                    {"summary": {"lengthInMeters": 1000, "travelTimeInSeconds": 120},
                     "points": [{"latitude": 41.0, "longitude": 28.9}, {"latitude": 41.1, "longitude": 28.95}]},
                    {"summary": {"lengthInMeters": 2000, "travelTimeInSeconds": 300},
                     "points": [{"latitude": 41.1, "longitude": 28.95}, {"latitude": 41.2, "longitude": 29.0}]}
                ]
            }]}"#,
        )
        .expect("should deserialise");

        let route = convert_route(response).expect("should convert");

        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.summary.travel_time, Duration::from_secs(420));
        assert_eq!(route.legs[1].summary.length_meters, 2000);
        let first = route.legs[0].path.0[0];
        assert_eq!((first.x, first.y), (28.9, 41.0));
    }

    #[rstest]
    fn convert_route_without_routes_is_no_result() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"routes": []}"#).expect("should deserialise");

        let err = convert_route(response).expect_err("should fail");

        assert!(matches!(err, ServiceError::NoResult { .. }));
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::FORBIDDEN)]
    fn auth_statuses_are_invalid_credential(#[case] status: StatusCode) {
        let err = convert_status(status, "", "https://tomtom.example.com/x");

        assert_eq!(
            err,
            ServiceError::InvalidCredential {
                status: Some(status.as_u16())
            }
        );
        assert_eq!(err.class(), ErrorClass::InvalidCredential);
    }

    #[rstest]
    fn other_statuses_carry_service_description() {
        let body = r#"{"error": {"description": "Engine error while executing route request: NO_ROUTE_FOUND"}}"#;

        let err = convert_status(StatusCode::BAD_REQUEST, body, "u");

        match err {
            ServiceError::HttpError { status, message, .. } => {
                assert_eq!(status, 400);
                assert!(message.contains("NO_ROUTE_FOUND"));
            }
            other => panic!("expected HttpError, got {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn empty_destinations_skip_the_network(client: TomTomClient) {
        let err = client
            .get_travel_times(coordinate(41.0, 29.0), &[])
            .await
            .expect_err("should fail");

        assert_eq!(err, ServiceError::EmptyInput);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_key_is_refused_before_sending() {
        let client = TomTomClient::with_config(
            TomTomConfig::new("").with_base_url("http://127.0.0.1:9"),
        )
        .expect("client should build");

        let err = client
            .calculate_route(&[coordinate(41.0, 29.0), coordinate(41.1, 29.1)])
            .await
            .expect_err("should fail");

        assert_eq!(err, ServiceError::InvalidCredential { status: None });
    }

    #[rstest]
    #[tokio::test]
    async fn single_stop_is_too_few(client: TomTomClient) {
        let err = client
            .calculate_route(&[coordinate(41.0, 29.0)])
            .await
            .expect_err("should fail");

        assert_eq!(err, ServiceError::TooFewStops { actual: 1 });
    }
}
