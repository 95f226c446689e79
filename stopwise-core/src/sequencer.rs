//! Order delivery stops by driving time from the origin.
//!
//! One matrix query covers every destination. Results are stable-sorted so
//! stops with equal travel times keep their click order.

use std::time::Duration;

use crate::{Coordinate, ServiceError, TravelTimeProvider};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A destination paired with its travel time from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedDestination {
    /// Destination position.
    pub location: Coordinate,
    /// Driving time from the origin used for ranking.
    pub travel_time: Duration,
}

/// Rank `destinations` by ascending travel time from `origin`.
///
/// Returns an empty vector without querying `provider` when there are no
/// destinations.
///
/// # Errors
///
/// Propagates provider failures. Returns [`ServiceError::CountMismatch`] when
/// the provider answers with a different number of times than destinations.
pub async fn rank_with_times<P>(
    provider: &P,
    origin: Coordinate,
    destinations: &[Coordinate],
) -> Result<Vec<RankedDestination>, ServiceError>
where
    P: TravelTimeProvider + ?Sized,
{
    if destinations.is_empty() {
        return Ok(Vec::new());
    }

    let times = provider.get_travel_times(origin, destinations).await?;
    if times.len() != destinations.len() {
        log::warn!(
            "distance service returned {} travel times for {} destinations",
            times.len(),
            destinations.len()
        );
        return Err(ServiceError::CountMismatch {
            expected: destinations.len(),
            actual: times.len(),
        });
    }

    let mut ranked: Vec<RankedDestination> = destinations
        .iter()
        .zip(times)
        .map(|(location, travel_time)| RankedDestination {
            location: *location,
            travel_time,
        })
        .collect();
    // `sort_by_key` is stable, preserving click order on ties.
    ranked.sort_by_key(|entry| entry.travel_time);
    Ok(ranked)
}

/// Rank `destinations` by ascending travel time, discarding the times.
///
/// # Errors
///
/// See [`rank_with_times`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stopwise_core::{Coordinate, rank};
/// use stopwise_core::test_support::StubTravelTimeProvider;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let origin = Coordinate::new(41.0082, 28.9784)?;
/// let d1 = Coordinate::new(41.01, 28.95)?;
/// let d2 = Coordinate::new(41.02, 28.96)?;
/// let provider = StubTravelTimeProvider::with_times(vec![
///     Duration::from_secs(600),
///     Duration::from_secs(200),
/// ]);
///
/// let ordered = rank(&provider, origin, &[d1, d2]).await?;
/// assert_eq!(ordered, vec![d2, d1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # }).unwrap();
/// ```
pub async fn rank<P>(
    provider: &P,
    origin: Coordinate,
    destinations: &[Coordinate],
) -> Result<Vec<Coordinate>, ServiceError>
where
    P: TravelTimeProvider + ?Sized,
{
    let ranked = rank_with_times(provider, origin, destinations).await?;
    Ok(ranked.into_iter().map(|entry| entry.location).collect())
}
