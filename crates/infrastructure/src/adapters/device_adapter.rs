//! Host-side device adapters
//!
//! Stand-ins for the platform location stack: a permission prompt with a
//! fixed answer and a sensor that replays configured positions. Used by the
//! CLI and by tests.

use std::sync::Arc;
use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{FixStream, LocationSensorPort, PermissionPort, PositionOptions};
use async_trait::async_trait;
use chrono::Utc;
use domain::{Coordinate, LocationFix};
use futures::StreamExt;
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// Permission prompt that always answers the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedPermission {
    granted: bool,
}

impl FixedPermission {
    pub const fn granted() -> Self {
        Self { granted: true }
    }

    pub const fn denied() -> Self {
        Self { granted: false }
    }
}

#[async_trait]
impl PermissionPort for FixedPermission {
    async fn request_permission(&self) -> bool {
        debug!(granted = self.granted, "Permission prompt answered");
        self.granted
    }
}

/// Sensor replaying a fixed position or a path of positions
///
/// `current_position` reports the last position reached. A watch walks the
/// path one point per interval and then idles on the final point.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    path: Arc<Vec<Coordinate>>,
    position: Arc<Mutex<Option<Coordinate>>>,
    accuracy_m: f64,
    interval: Duration,
}

impl SimulatedSensor {
    /// Sensor parked at `coordinate`
    pub fn at(coordinate: Coordinate) -> Self {
        Self::along(vec![coordinate])
    }

    /// Sensor moving along `path`
    pub fn along(path: Vec<Coordinate>) -> Self {
        Self {
            position: Arc::new(Mutex::new(path.first().copied())),
            path: Arc::new(path),
            accuracy_m: 15.0,
            interval: Duration::from_secs(1),
        }
    }

    /// Sensor without a signal
    pub fn unavailable() -> Self {
        Self::along(Vec::new())
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = accuracy_m;
        self
    }

    fn fix(&self, coordinate: Coordinate) -> LocationFix {
        LocationFix::new(coordinate, self.accuracy_m, Utc::now())
    }
}

/// Drop points closer than `min_m` meters to the previously kept point
fn filter_by_distance(path: &[Coordinate], min_m: f64) -> Vec<Coordinate> {
    let mut kept: Vec<Coordinate> = Vec::with_capacity(path.len());
    for point in path {
        let far_enough = kept
            .last()
            .is_none_or(|last| last.distance_km(point) * 1000.0 >= min_m);
        if far_enough {
            kept.push(*point);
        }
    }
    kept
}

#[async_trait]
impl LocationSensorPort for SimulatedSensor {
    #[instrument(skip(self, _options))]
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<LocationFix, ApplicationError> {
        let position = *self.position.lock();
        position
            .map(|coordinate| self.fix(coordinate))
            .ok_or_else(|| ApplicationError::LocationUnavailable("no signal".to_string()))
    }

    #[instrument(skip(self, options))]
    async fn watch_position(
        &self,
        options: &PositionOptions,
    ) -> Result<FixStream, ApplicationError> {
        if self.path.is_empty() {
            return Err(ApplicationError::LocationUnavailable(
                "no signal".to_string(),
            ));
        }

        let points = filter_by_distance(&self.path, options.distance_filter_m);
        debug!(points = points.len(), "Starting simulated watch");

        let sensor = self.clone();
        let interval = self.interval;
        let stream = futures::stream::iter(points.into_iter().enumerate())
            .then(move |(index, coordinate)| {
                let sensor = sensor.clone();
                async move {
                    if index > 0 {
                        tokio::time::sleep(interval).await;
                    }
                    *sensor.position.lock() = Some(coordinate);
                    sensor.fix(coordinate)
                }
            })
            .chain(futures::stream::pending());

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lng)
    }

    #[tokio::test]
    async fn fixed_permission_answers() {
        assert!(FixedPermission::granted().request_permission().await);
        assert!(!FixedPermission::denied().request_permission().await);
    }

    #[tokio::test]
    async fn parked_sensor_reports_position() {
        let sensor = SimulatedSensor::at(Coordinate::lahore()).with_accuracy(5.0);
        let fix = sensor
            .current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(fix.coordinate, Coordinate::lahore());
        assert!((fix.accuracy_m - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unavailable_sensor_fails() {
        let sensor = SimulatedSensor::unavailable();
        let options = PositionOptions::default();
        assert!(matches!(
            sensor.current_position(&options).await,
            Err(ApplicationError::LocationUnavailable(_))
        ));
        assert!(sensor.watch_position(&options).await.is_err());
    }

    #[test]
    fn distance_filter_drops_jitter() {
        let path = vec![
            point(31.5204, 74.3587),
            point(31.52041, 74.35871),
            point(31.5300, 74.3600),
        ];
        let kept = filter_by_distance(&path, 10.0);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1], point(31.5300, 74.3600));
    }

    #[tokio::test(start_paused = true)]
    async fn watch_walks_the_path() {
        let path = vec![point(31.52, 74.35), point(31.53, 74.36), point(31.54, 74.37)];
        let sensor = SimulatedSensor::along(path.clone()).with_interval(Duration::from_secs(2));
        let mut stream = sensor
            .watch_position(&PositionOptions::default())
            .await
            .unwrap();

        let started = tokio::time::Instant::now();
        for expected in &path {
            let fix = stream.next().await.unwrap();
            assert_eq!(fix.coordinate, *expected);
        }
        assert_eq!(started.elapsed(), Duration::from_secs(4));

        let current = sensor
            .current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(current.coordinate, path[2]);
    }
}
