//! Signed-delta polyline codec.
//!
//! Every coordinate is stored as the zigzag-encoded difference from the previous value,
//! scaled by 1e5 and split into 5-bit chunks. Chunks carry a continuation bit (0x20)
//! and are offset by 63 to land in printable ASCII. Latitude precedes longitude.

use crate::common::types::*;
use crate::common::error::*;


const PRECISION: f64 = 1e5;
const CHAR_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;
const MAX_CHAR: u8 = b'~';


/// Reads one zigzag-encoded value starting at `offset`, returns it with the next offset
fn decode_value(bytes: &[u8], mut offset: usize) -> Result<(i64, usize), DecodeError> {
    let start = offset;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = *bytes.get(offset).ok_or(DecodeError::Truncated {offset})?;
        if !(CHAR_OFFSET..=MAX_CHAR).contains(&byte) {
            return Err(DecodeError::InvalidCharacter {offset, found: byte as char});
        }
        if shift>=64 {
            return Err(DecodeError::Overflow {offset: start});
        }

        let chunk = (byte - CHAR_OFFSET) as u64;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        offset += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let value = if result & 1 == 1 {!(result >> 1) as i64} else {(result >> 1) as i64};
    Ok((value, offset))
}

/// Decodes a polyline into (latitude, longitude) pairs
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while offset<bytes.len() {
        let (d_lat, next) = decode_value(bytes, offset)?;
        let (d_lng, next) = decode_value(bytes, next)?;
        offset = next;

        lat = lat.wrapping_add(d_lat);
        lng = lng.wrapping_add(d_lng);
        points.push((lat as Coord / PRECISION, lng as Coord / PRECISION));
    }

    Ok(points)
}

/// Appends one value in zigzag chunks
fn encode_value(value: i64, out: &mut String) {
    let mut v = if value<0 {!((value as u64) << 1)} else {(value as u64) << 1};
    while v>=CONTINUATION_BIT {
        out.push((((v & CHUNK_MASK) | CONTINUATION_BIT) as u8 + CHAR_OFFSET) as char);
        v >>= 5;
    }
    out.push((v as u8 + CHAR_OFFSET) as char);
}

/// Encodes (latitude, longitude) pairs, rounding to 1e-5 degrees
pub fn encode(points: &[LatLng]) -> String {
    let mut out = String::with_capacity(points.len()*8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for (lat, lng) in points {
        let lat = (lat*PRECISION).round() as i64;
        let lng = (lng*PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}
