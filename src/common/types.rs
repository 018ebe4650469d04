use chrono::{DateTime, Utc};


/// Elevation in meters
pub type Height = f64;

/// Coordinate in degrees
pub type Coord = f64;

/// Duration or elapsed time in seconds
pub type Seconds = f64;

/// Distance in meters
pub type Meters = f64;

/// Point in time
pub type Timestamp = DateTime<Utc>;

/// Coordinate pair as delivered by activity streams and polylines: (latitude, longitude)
pub type LatLng = (Coord, Coord);

/// Coordinate pair in map order: (longitude, latitude)
pub type LngLat = (Coord, Coord);

/// Geopoints counter
pub type GeoPointIndex = usize;

#[derive(Debug, Clone, Copy)]
/// Geopoint as longitude and latitude with optional elevation and elapsed time
pub struct GeoPoint {
    pub longitude: Coord,
    pub latitude: Coord,
    pub elevation: Option<Height>,
    pub elapsed: Option<Seconds>,
}

impl GeoPoint {
    /// Point without elevation
    pub fn new(longitude: Coord, latitude: Coord) -> Self {
        GeoPoint {longitude, latitude, elevation: None, elapsed: None}
    }

    /// Point with elevation
    pub fn with_elevation(longitude: Coord, latitude: Coord, elevation: Height) -> Self {
        GeoPoint {longitude, latitude, elevation: Some(elevation), elapsed: None}
    }

    pub fn lng_lat(&self) -> LngLat {
        (self.longitude, self.latitude)
    }
}

// Elapsed time is a sample attribute, not part of the point's position
impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.longitude==other.longitude
            && self.latitude==other.latitude
            && self.elevation==other.elevation
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Axis-aligned box in (longitude, latitude)
pub struct BoundingBox {
    pub southwest: LngLat,
    pub northeast: LngLat,
}

impl BoundingBox {
    /// Box returned for routes without points
    pub const DEGENERATE: BoundingBox = BoundingBox {southwest: (0.0, 0.0), northeast: (0.0, 0.0)};

    /// Computes the box with one scan over the points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Self {
        let extrema = points.into_iter().fold(None, |acc: Option<(Coord, Coord, Coord, Coord)>, p| {
            Some(match acc {
                None => (p.latitude, p.latitude, p.longitude, p.longitude),
                Some((north, south, east, west)) => (
                    north.max(p.latitude),
                    south.min(p.latitude),
                    east.max(p.longitude),
                    west.min(p.longitude),
                ),
            })
        });

        match extrema {
            None => BoundingBox::DEGENERATE,
            Some((north, south, east, west)) =>
                BoundingBox {southwest: (west, south), northeast: (east, north)},
        }
    }

    /// Length of the box diagonal in coordinate units
    pub fn diagonal(&self) -> Coord {
        let dx = self.northeast.0 - self.southwest.0;
        let dy = self.northeast.1 - self.southwest.1;
        dx.hypot(dy)
    }
}
