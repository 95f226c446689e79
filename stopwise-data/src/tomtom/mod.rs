//! TomTom Routing API adapters.
//!
//! [`TomTomClient`] answers both collaborator roles the planner needs: travel
//! times from the synchronous Matrix Routing service and drivable geometry
//! from Calculate Route.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use stopwise_core::{Coordinate, TravelTimeProvider};
//! use stopwise_data::tomtom::{TomTomClient, TomTomConfig};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
//! let config = TomTomConfig::from_env().with_timeout(Duration::from_secs(10));
//! let client = TomTomClient::with_config(config)?;
//!
//! let origin = Coordinate::new(41.0082, 28.9784)?;
//! let stop = Coordinate::new(41.0430, 28.9850)?;
//! let times = client.get_travel_times(origin, &[stop]).await?;
//! println!("Travel time: {:?}", times[0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod config;
mod wire;

pub use client::TomTomClient;
pub use config::{
    API_KEY_ENV, ApiKey, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, ProviderBuildError, TomTomConfig,
    TravelMode,
};
