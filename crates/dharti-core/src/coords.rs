//! Coordinate decoder.
//!
//! The record store serializes a single point in several shapes: a GeoJSON
//! geometry, a bare `[lng, lat]` array, `{lat, lng}` / `{lat, lon}` objects,
//! or the hex EWKB literal some PostGIS drivers return for
//! `geography(Point, 4326)`. Everything funnels through [`decode_coordinate`].

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::LatLng;

/// EWKB prefix for a little-endian point with SRID 4326.
///
/// `01` byte order, `01000020` point type with the SRID flag, `E6100000` SRID.
pub const EWKB_POINT_4326_HEADER: &str = "0101000020E6100000";

const F64_HEX_LEN: usize = 16;

/// The recognised encodings, in the order they are attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateValue {
    /// `{"type": "Point", "coordinates": [lng, lat, ...]}`
    GeoJson(Vec<f64>),
    /// `[lng, lat, ...]`
    Array(Vec<f64>),
    /// `{"lat": .., "lng": ..}`
    LatLng { lat: f64, lng: f64 },
    /// `{"lat": .., "lon": ..}`
    LatLon { lat: f64, lon: f64 },
    /// Hex EWKB string starting with [`EWKB_POINT_4326_HEADER`].
    Ewkb(String),
}

impl CoordinateValue {
    /// Picks the first encoding `value` matches; does not decode yet.
    pub fn classify(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(obj) => {
                if let Some(nums) = obj.get("coordinates").and_then(numeric_array) {
                    return Ok(Self::GeoJson(nums));
                }
                if let (Some(lat), Some(lng)) = (number(obj, "lat"), number(obj, "lng")) {
                    return Ok(Self::LatLng { lat, lng });
                }
                if let (Some(lat), Some(lon)) = (number(obj, "lat"), number(obj, "lon")) {
                    return Ok(Self::LatLon { lat, lon });
                }
                Err(DecodeError::Unrecognized("object"))
            }
            Value::Array(_) => {
                numeric_array(value).map(Self::Array).ok_or(DecodeError::Unrecognized("array"))
            }
            Value::String(s) => {
                let s = s.trim();
                let has_header = s
                    .get(..EWKB_POINT_4326_HEADER.len())
                    .is_some_and(|h| h.eq_ignore_ascii_case(EWKB_POINT_4326_HEADER));
                if has_header {
                    Ok(Self::Ewkb(s.to_string()))
                } else {
                    Err(DecodeError::Unrecognized("string"))
                }
            }
            Value::Number(_) => Err(DecodeError::Unrecognized("number")),
            Value::Bool(_) => Err(DecodeError::Unrecognized("bool")),
            Value::Null => Err(DecodeError::Unrecognized("null")),
        }
    }

    /// Decodes to a point and range-checks it.
    pub fn to_lat_lng(&self) -> Result<LatLng, DecodeError> {
        let point = match self {
            Self::GeoJson(nums) | Self::Array(nums) => LatLng::new(nums[1], nums[0]),
            Self::LatLng { lat, lng } => LatLng::new(*lat, *lng),
            Self::LatLon { lat, lon } => LatLng::new(*lat, *lon),
            Self::Ewkb(hex) => decode_ewkb_point(hex)?,
        };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(DecodeError::OutOfRange { lat: point.lat, lng: point.lng })
        }
    }
}

/// Decodes any supported encoding to a validated point.
pub fn decode_coordinate(value: &Value) -> Result<LatLng, DecodeError> {
    CoordinateValue::classify(value)?.to_lat_lng()
}

/// Only returns arrays with at least two elements, all numeric.
fn numeric_array(value: &Value) -> Option<Vec<f64>> {
    let arr = value.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    arr.iter().map(Value::as_f64).collect()
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn decode_ewkb_point(literal: &str) -> Result<LatLng, DecodeError> {
    let body = literal
        .get(EWKB_POINT_4326_HEADER.len()..)
        .ok_or_else(|| DecodeError::MalformedGeography("missing header".to_string()))?;
    let lng_hex = body.get(..F64_HEX_LEN);
    let lat_hex = body.get(F64_HEX_LEN..2 * F64_HEX_LEN);
    let (Some(lng_hex), Some(lat_hex)) = (lng_hex, lat_hex) else {
        return Err(DecodeError::MalformedGeography(format!(
            "expected {} hex digits after header, got {}",
            2 * F64_HEX_LEN,
            body.len()
        )));
    };
    Ok(LatLng::new(le_f64_from_hex(lat_hex)?, le_f64_from_hex(lng_hex)?))
}

fn le_f64_from_hex(chunk: &str) -> Result<f64, DecodeError> {
    let mut bytes = [0u8; 8];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let pair = chunk
            .get(2 * i..2 * i + 2)
            .ok_or_else(|| DecodeError::MalformedGeography(format!("short chunk {chunk:?}")))?;
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| DecodeError::MalformedGeography(format!("non-hex digits {pair:?}")))?;
    }
    Ok(f64::from_le_bytes(bytes))
}

/// Hex EWKB literal for `point`, as a PostGIS driver would emit it.
pub fn encode_ewkb_point(point: LatLng) -> String {
    let mut out = String::with_capacity(EWKB_POINT_4326_HEADER.len() + 2 * F64_HEX_LEN);
    out.push_str(EWKB_POINT_4326_HEADER);
    for v in [point.lng, point.lat] {
        for b in v.to_le_bytes() {
            out.push_str(&format!("{b:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn geojson_takes_precedence_over_lat_lng_keys() {
        let v = json!({"type": "Point", "coordinates": [10.0, 20.0], "lat": 1.0, "lng": 2.0});
        assert!(matches!(CoordinateValue::classify(&v), Ok(CoordinateValue::GeoJson(_))));
        assert_eq!(decode_coordinate(&v), Ok(LatLng::new(20.0, 10.0)));
    }

    #[test]
    fn lat_lng_wins_over_lat_lon() {
        let v = json!({"lat": 1.0, "lng": 2.0, "lon": 3.0});
        assert_eq!(decode_coordinate(&v), Ok(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn extra_array_elements_are_ignored() {
        assert_eq!(decode_coordinate(&json!([77.5, 12.9, 920.0])), Ok(LatLng::new(12.9, 77.5)));
    }

    fn rejected_as(value: Value) -> Option<&'static str> {
        match decode_coordinate(&value) {
            Err(DecodeError::Unrecognized(kind)) => Some(kind),
            _ => None,
        }
    }

    #[test]
    fn short_or_mixed_arrays_are_rejected() {
        assert_eq!(rejected_as(json!([77.5])), Some("array"));
        assert_eq!(rejected_as(json!([77.5, "12.9"])), Some("array"));
        assert_eq!(rejected_as(json!({"coordinates": [1.0]})), Some("object"));
    }

    #[test]
    fn scalars_are_unrecognized() {
        assert_eq!(rejected_as(json!(42)), Some("number"));
        assert_eq!(rejected_as(Value::Null), Some("null"));
        assert_eq!(rejected_as(json!("12.9, 77.5")), Some("string"));
    }

    #[test]
    fn ewkb_header_is_case_insensitive() {
        let lit = encode_ewkb_point(LatLng::new(-33.5, 151.25)).to_lowercase();
        assert_eq!(decode_coordinate(&json!(lit)), Ok(LatLng::new(-33.5, 151.25)));
    }

    #[test]
    fn truncated_ewkb_is_malformed() {
        let lit = format!("{EWKB_POINT_4326_HEADER}0000");
        assert!(matches!(decode_coordinate(&json!(lit)), Err(DecodeError::MalformedGeography(_))));
        let lit = format!("{EWKB_POINT_4326_HEADER}{}", "ZZ".repeat(16));
        assert!(matches!(decode_coordinate(&json!(lit)), Err(DecodeError::MalformedGeography(_))));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            decode_coordinate(&json!({"lat": 95.0, "lng": 10.0})),
            Err(DecodeError::OutOfRange { lat: 95.0, lng: 10.0 })
        );
        // GeoJSON order swapped by mistake: lat ends up at 200.
        assert!(matches!(
            decode_coordinate(&json!([10.0, 200.0])),
            Err(DecodeError::OutOfRange { .. })
        ));
    }
}
