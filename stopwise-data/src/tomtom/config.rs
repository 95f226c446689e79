//! Connection settings for the TomTom client.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default user agent for TomTom requests.
pub const DEFAULT_USER_AGENT: &str = "stopwise-routing/0.1";

/// Public TomTom API host.
pub const DEFAULT_BASE_URL: &str = "https://api.tomtom.com";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "STOPWISE_API_KEY";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Whether no credential was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

/// Vehicle profile used for travel times and routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    /// Passenger car.
    #[default]
    Car,
    /// Delivery van.
    Van,
    /// Truck.
    Truck,
    /// Motorcycle.
    Motorcycle,
    /// Bicycle.
    Bicycle,
    /// On foot.
    Pedestrian,
}

impl TravelMode {
    /// Query parameter value understood by the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Van => "van",
            Self::Truck => "truck",
            Self::Motorcycle => "motorcycle",
            Self::Bicycle => "bicycle",
            Self::Pedestrian => "pedestrian",
        }
    }
}

/// Configuration for [`super::TomTomClient`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stopwise_data::tomtom::{TomTomConfig, TravelMode};
///
/// let config = TomTomConfig::new("secret")
///     .with_base_url("http://localhost:8080")
///     .with_timeout(Duration::from_secs(5))
///     .with_travel_mode(TravelMode::Van);
/// assert_eq!(config.base_url, "http://localhost:8080");
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Debug, Clone)]
pub struct TomTomConfig {
    /// API credential appended to every request.
    pub api_key: ApiKey,
    /// Service root, e.g. `"https://api.tomtom.com"`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Vehicle profile.
    pub travel_mode: TravelMode,
}

impl Default for TomTomConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            travel_mode: TravelMode::default(),
        }
    }
}

impl TomTomConfig {
    /// Create a configuration with the given credential and defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            ..Default::default()
        }
    }

    /// Read the credential from `STOPWISE_API_KEY`.
    ///
    /// A missing variable yields an empty credential; requests then fail with
    /// [`stopwise_core::ServiceError::InvalidCredential`] rather than at
    /// startup.
    #[must_use]
    pub fn from_env() -> Self {
        let key = std::env::var(API_KEY_ENV).unwrap_or_else(|_| {
            log::warn!("{API_KEY_ENV} is not set; service requests will be refused");
            String::new()
        });
        Self::new(key)
    }

    /// Set the service root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the vehicle profile.
    #[must_use]
    pub const fn with_travel_mode(mut self, travel_mode: TravelMode) -> Self {
        self.travel_mode = travel_mode;
        self
    }
}

/// Errors raised while constructing a [`super::TomTomClient`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The base URL could not be parsed or cannot carry a path.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}
