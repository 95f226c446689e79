//! Travel-time provider trait for one-origin matrix queries.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Coordinate, ServiceError};

/// Travel times aligned by index with the requested destinations.
pub type TravelTimes = Vec<Duration>;

/// Travel time reported for destinations the service could not route to.
///
/// Unreachable destinations sort after every reachable one.
pub const UNREACHABLE: Duration = Duration::MAX;

/// Fetch travel times from a single origin to many destinations.
///
/// Implementers must return exactly one entry per destination where
/// `times[i]` is the travel time from `origin` to `destinations[i]`.
/// Callers treat a length mismatch as a service failure.
///
/// The trait is `?Send`: providers are driven from the single-threaded UI
/// event loop.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use stopwise_core::{Coordinate, ServiceError, TravelTimeProvider, TravelTimes};
///
/// struct ConstantProvider;
///
/// #[async_trait(?Send)]
/// impl TravelTimeProvider for ConstantProvider {
///     async fn get_travel_times(
///         &self,
///         _origin: Coordinate,
///         destinations: &[Coordinate],
///     ) -> Result<TravelTimes, ServiceError> {
///         if destinations.is_empty() {
///             return Err(ServiceError::EmptyInput);
///         }
///         Ok(vec![Duration::from_secs(60); destinations.len()])
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let origin = Coordinate::new(41.0082, 28.9784)?;
/// let stop = Coordinate::new(41.02, 28.99)?;
/// let times = ConstantProvider.get_travel_times(origin, &[stop]).await?;
/// assert_eq!(times, vec![Duration::from_secs(60)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # }).unwrap();
/// ```
#[async_trait(?Send)]
pub trait TravelTimeProvider {
    /// Return travel times from `origin` to each of `destinations`.
    ///
    /// Implementations must return `Err(ServiceError::EmptyInput)` when
    /// `destinations` is empty.
    async fn get_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<TravelTimes, ServiceError>;
}

#[async_trait(?Send)]
impl<T> TravelTimeProvider for &T
where
    T: TravelTimeProvider + ?Sized,
{
    async fn get_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<TravelTimes, ServiceError> {
        (**self).get_travel_times(origin, destinations).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::StubTravelTimeProvider;

    fn coordinate(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    #[rstest]
    #[tokio::test]
    async fn returns_one_time_per_destination() {
        let provider = StubTravelTimeProvider::with_times(vec![
            Duration::from_secs(10),
            Duration::from_secs(20),
        ]);
        let origin = coordinate(0.0, 0.0);
        let times = provider
            .get_travel_times(origin, &[coordinate(1.0, 1.0), coordinate(2.0, 2.0)])
            .await
            .expect("expected travel times from stub");
        assert_eq!(times.len(), 2);
        assert_eq!(times[1], Duration::from_secs(20));
    }

    #[rstest]
    #[tokio::test]
    async fn errors_on_empty_input() {
        let provider = StubTravelTimeProvider::with_times(Vec::new());
        let err = provider
            .get_travel_times(coordinate(0.0, 0.0), &[])
            .await
            .expect_err("expected EmptyInput for empty slice");
        assert_eq!(err, ServiceError::EmptyInput);
    }

    #[rstest]
    #[tokio::test]
    async fn references_forward_to_the_provider() {
        let provider = StubTravelTimeProvider::with_times(vec![Duration::from_secs(5)]);
        let by_ref = &provider;
        let times = by_ref
            .get_travel_times(coordinate(0.0, 0.0), &[coordinate(1.0, 1.0)])
            .await
            .expect("expected travel times via reference");
        assert_eq!(times, vec![Duration::from_secs(5)]);
        assert_eq!(provider.calls(), 1);
    }
}
