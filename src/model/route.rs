//! Canonical route model built from activity streams.
//!
//! Elevation gain is taken from the activity summary while elevation loss is summed
//! locally from the samples. The two figures are deliberately not derived the same way.

use std::fmt;
use chrono::TimeDelta;
use tracing::trace;

use crate::common::types::*;
use crate::common::error::*;
use crate::input::polyline;
use crate::input::stream::*;


const EARTH_RADIUS: Meters = 6_371_008.8;


#[derive(Debug, Clone, PartialEq)]
/// Figures derived from a route's points and its activity summary
pub struct RouteStatistics {
    pub distance: Meters,
    pub elevation_gain: Meters,
    pub elevation_loss: Meters,
    pub min_elevation: Height,
    pub max_elevation: Height,
    pub duration: Seconds,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
/// Named route with ordered points, statistics and bounds
pub struct RouteData {
    name: String,
    points: Vec<GeoPoint>,
    stats: RouteStatistics,
    bounds: BoundingBox,
}

impl RouteData {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points in temporal order
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn stats(&self) -> &RouteStatistics {
        &self.stats
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Copy of the points for path simplification
    pub fn to_path(&self) -> Vec<GeoPoint> {
        self.points.clone()
    }
}

impl fmt::Display for RouteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "name {}", self.name)?;
        writeln!(f, "points {}", self.points.len())?;
        writeln!(f, "distance_m {:.1}", s.distance)?;
        writeln!(f, "elevation_gain_m {:.1}", s.elevation_gain)?;
        writeln!(f, "elevation_loss_m {:.1}", s.elevation_loss)?;
        writeln!(f, "min_elevation_m {:.1}", s.min_elevation)?;
        writeln!(f, "max_elevation_m {:.1}", s.max_elevation)?;
        writeln!(f, "duration_s {}", s.duration)?;
        writeln!(f, "start_time {}", s.start_time.to_rfc3339())?;
        match s.end_time {
            Some(t) => writeln!(f, "end_time {}", t.to_rfc3339())?,
            None => writeln!(f, "end_time -")?,
        }
        write!(f, "bounds {} {} {} {}",
            self.bounds.southwest.0, self.bounds.southwest.1,
            self.bounds.northeast.0, self.bounds.northeast.1)
    }
}

/// Great-circle distance between two points, ignoring elevation
pub fn haversine(a: &GeoPoint, b: &GeoPoint) -> Meters {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi/2.0).sin().powi(2) + phi1.cos()*phi2.cos()*(d_lambda/2.0).sin().powi(2);
    2.0*EARTH_RADIUS*h.sqrt().min(1.0).asin()
}

/// Segment length; includes the elevation delta when both ends carry elevation
pub fn segment_distance(a: &GeoPoint, b: &GeoPoint) -> Meters {
    let horizontal = haversine(a, b);
    match (a.elevation, b.elevation) {
        (Some(h0), Some(h1)) => horizontal.hypot(h1 - h0),
        _ => horizontal,
    }
}

/// Sum of the drops between consecutive elevation samples
pub fn elevation_loss(elevations: &[Height]) -> Meters {
    elevations.windows(2)
        .map(|w| w[1] - w[0])
        .filter(|delta| *delta<0.0)
        .map(|delta| -delta)
        .sum()
}

/// Minimum and maximum elevation, (0, 0) without samples
fn elevation_range(elevations: &[Height]) -> (Height, Height) {
    if elevations.is_empty() {
        return (0.0, 0.0);
    }
    elevations.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), h| (lo.min(*h), hi.max(*h)))
}

fn end_time(start_time: Timestamp, duration: Seconds) -> Option<Timestamp> {
    if duration>0.0 {
        TimeDelta::try_milliseconds((duration*1000.0).round() as i64)
            .and_then(|d| start_time.checked_add_signed(d))
    } else {
        None
    }
}

/// Builds the canonical route from an activity stream and its summary.
///
/// An empty stream yields a route without points unless `require_points` is set,
/// in which case it fails with [`RouteError::EmptyStream`].
pub fn normalize(summary: &ActivitySummary, stream: &ActivityStream, require_points: bool)
        -> Result<RouteData, RouteError> {

    let points = stream.points();
    if points.is_empty() && require_points {
        return Err(RouteError::EmptyStream);
    }

    let elevations: Vec<Height> = points.iter().filter_map(|p| p.elevation).collect();
    let (min_elevation, max_elevation) = elevation_range(&elevations);

    let distance = summary.distance.unwrap_or_else(|| {
        points.windows(2).map(|w| segment_distance(&w[0], &w[1])).sum()
    });

    let stats = RouteStatistics {
        distance,
        elevation_gain: summary.elevation_gain.unwrap_or(0.0),
        elevation_loss: elevation_loss(&elevations),
        min_elevation,
        max_elevation,
        duration: summary.duration,
        start_time: summary.start_time,
        end_time: end_time(summary.start_time, summary.duration),
    };
    let bounds = BoundingBox::from_points(&points);

    trace!(name = %summary.name, points = points.len(), "normalized route");

    Ok(RouteData {
        name: summary.name.clone(),
        points,
        stats,
        bounds,
    })
}

/// Normalizes a summary polyline, which carries neither elevation nor time samples
pub fn normalize_polyline(summary: &ActivitySummary, encoded: &str, require_points: bool)
        -> Result<RouteData, RouteError> {
    let latlng = polyline::decode(encoded)?;
    normalize(summary, &ActivityStream::from_latlng(latlng), require_points)
}
