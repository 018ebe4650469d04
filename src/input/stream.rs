use tracing::warn;

use crate::common::types::*;
use crate::common::util::*;


#[derive(Debug, Clone, Default, PartialEq)]
/// Parallel per-sample arrays of an activity; `elevation` and `elapsed` may be shorter than `latlng`
pub struct ActivityStream {
    pub latlng: Vec<LatLng>,
    pub elevation: Vec<Height>,
    pub elapsed: Vec<Seconds>,
}

#[derive(Debug, Clone, PartialEq)]
/// Aggregate figures reported by the activity source
pub struct ActivitySummary {
    pub name: String,
    pub start_time: Timestamp,
    pub elevation_gain: Option<Meters>,
    pub duration: Seconds,
    pub distance: Option<Meters>,
}

impl ActivityStream {
    /// Stream of coordinates only
    pub fn from_latlng(latlng: Vec<LatLng>) -> Self {
        ActivityStream {latlng, ..Default::default()}
    }

    /// Zips the parallel arrays index-wise; missing samples become `None`
    pub fn points(&self) -> Vec<GeoPoint> {
        if self.elevation.len()>self.latlng.len() || self.elapsed.len()>self.latlng.len() {
            warn!(
                latlng = self.latlng.len(),
                elevation = self.elevation.len(),
                elapsed = self.elapsed.len(),
                "stream arrays longer than latlng, extra samples ignored");
        }

        self.latlng.iter()
            .enumerate()
            .map(|(i, &(latitude, longitude))| GeoPoint {
                longitude,
                latitude,
                elevation: self.elevation.get(i).copied(),
                elapsed: self.elapsed.get(i).copied(),
            })
            .collect()
    }

    /// Builds a stream from `lat lng [elevation [elapsed]]` rows
    pub fn from_rows(rows: &[Row]) -> Result<Self, String> {
        let mut stream = ActivityStream::default();
        for (i, row) in rows.iter().enumerate() {
            match row.as_slice() {
                [lat, lng, rest @ ..] => {
                    stream.latlng.push((*lat, *lng));
                    // a sample without elevation ends the elevation array
                    if let Some(h) = rest.first() {
                        if stream.elevation.len()==i {
                            stream.elevation.push(*h);
                        }
                    }
                    if let Some(t) = rest.get(1) {
                        if stream.elapsed.len()==i {
                            stream.elapsed.push(*t);
                        }
                    }
                },
                _ => return Err(format!("Row {} needs at least latitude and longitude", i+1)),
            }
        }
        Ok(stream)
    }

    /// Reads a stream file
    pub fn load(filepath: &str) -> Result<Self, String> {
        let file_content = read_lines(filepath)?;
        let rows = parse_rows(&file_content, 2, 4)?;
        Self::from_rows(&rows)
    }
}
