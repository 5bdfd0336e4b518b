//! Encoded polyline codec
//!
//! Directions providers ship route geometry as an ASCII string. Each point is
//! stored as the delta from the previous point (the first from 0,0), scaled by
//! 1e5. Each delta is zig-zag mapped to an unsigned value, split into 5-bit
//! groups least significant first, every group but the last flagged with
//! `0x20`, and each group written as the character `group + 63`.

use crate::errors::DomainError;
use crate::value_objects::Coordinate;

/// Scale between decimal degrees and encoded integers
const PRECISION: f64 = 1e5;

const CHAR_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const GROUP_MASK: u64 = 0x1f;

/// Decode a polyline string into coordinates
///
/// # Errors
///
/// Returns `DomainError::MalformedPolyline` when the string contains bytes
/// outside `'?'..='~'`, ends inside a value, ends after a latitude without
/// its longitude, or carries a delta that overflows the running total.
/// Returns `DomainError::InvalidCoordinates` when a decoded point lies
/// outside the valid range.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DomainError> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::with_capacity(bytes.len() / 4);
    let mut position = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while position < bytes.len() {
        lat = accumulate(lat, next_value(bytes, &mut position)?, position)?;
        if position >= bytes.len() {
            return Err(DomainError::MalformedPolyline {
                position,
                reason: "latitude without longitude".to_string(),
            });
        }
        lng = accumulate(lng, next_value(bytes, &mut position)?, position)?;

        #[allow(clippy::cast_precision_loss)]
        path.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION)?);
    }

    Ok(path)
}

fn accumulate(total: i64, delta: i64, position: usize) -> Result<i64, DomainError> {
    total
        .checked_add(delta)
        .ok_or_else(|| DomainError::MalformedPolyline {
            position,
            reason: "coordinate overflow".to_string(),
        })
}

/// Read one zig-zag encoded value starting at `position`, advancing it
fn next_value(bytes: &[u8], position: &mut usize) -> Result<i64, DomainError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*position) else {
            return Err(DomainError::MalformedPolyline {
                position: *position,
                reason: "truncated value".to_string(),
            });
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(DomainError::MalformedPolyline {
                position: *position,
                reason: format!("unexpected character {:?}", char::from(byte)),
            });
        }
        if shift > 60 {
            return Err(DomainError::MalformedPolyline {
                position: *position,
                reason: "value too long".to_string(),
            });
        }

        let group = u64::from(byte - CHAR_OFFSET);
        *position += 1;
        result |= (group & GROUP_MASK) << shift;
        shift += 5;

        if group < CONTINUATION {
            break;
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };
    Ok(value)
}

/// Encode coordinates as a polyline string (5 decimal places)
#[must_use]
pub fn encode(path: &[Coordinate]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in path {
        let lat = scale(point.latitude());
        let lng = scale(point.longitude());
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

#[allow(clippy::cast_possible_truncation)]
fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

fn push_value(out: &mut String, value: i64) {
    #[allow(clippy::cast_sign_loss)]
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;

    while zigzag >= CONTINUATION {
        push_group(out, (zigzag & GROUP_MASK) | CONTINUATION);
        zigzag >>= 5;
    }
    push_group(out, zigzag);
}

#[allow(clippy::cast_possible_truncation)]
fn push_group(out: &mut String, group: u64) {
    out.push(char::from(group as u8 + CHAR_OFFSET));
}
