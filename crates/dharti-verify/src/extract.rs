use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use dharti_core::LatLng;

pub const NO_TEXT_PLACEHOLDER: &str = "(no extractable text)";

/// Shortest printable run kept when pulling text out of a binary upload.
const MIN_RUN: usize = 4;

/// A decimal pair not embedded in a longer number on either side.
const LAT_LON_PATTERN: &str = concat!(
    r"(?:^|[^\d.])",
    r"(?P<lat>[-+]?\d{1,2}\.\d+)\s*[,;]\s*(?P<lon>[-+]?\d{1,3}\.\d+)",
    r"(?:$|[^\d.])",
);

static LAT_LON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(LAT_LON_PATTERN)
        .unwrap_or_else(|err| panic!("invalid regex literal {LAT_LON_PATTERN}: {err}"))
});

/// Coordinates as reported to uploaders. Serializes to `{lat, lon}`, which the
/// coordinate decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<LatLon> for LatLng {
    fn from(p: LatLon) -> Self {
        LatLng::new(p.lat, p.lon)
    }
}

/// Best-effort text from an uploaded document. UTF-8 is taken as is; anything
/// else (PDFs, scans) contributes its printable ASCII runs.
pub fn extract_text(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.trim().to_string(),
        Err(_) => printable_runs(bytes),
    };
    if text.is_empty() {
        NO_TEXT_PLACEHOLDER.to_string()
    } else {
        text
    }
}

fn printable_runs(bytes: &[u8]) -> String {
    bytes
        .split(|b| !(b.is_ascii_graphic() || *b == b' '))
        .filter(|run| run.len() >= MIN_RUN)
        .filter_map(|run| std::str::from_utf8(run).ok())
        .map(str::trim)
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `lat, lon` pair in `text` whose values are in range.
pub fn scan_coordinates(text: &str) -> Option<LatLon> {
    LAT_LON.captures_iter(text).find_map(|caps| {
        let lat = caps["lat"].parse::<f64>().ok()?;
        let lon = caps["lon"].parse::<f64>().ok()?;
        LatLng::new(lat, lon).is_valid().then_some(LatLon { lat, lon })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_kept() {
        assert_eq!(extract_text(b"  Survey No. 42\n"), "Survey No. 42");
    }

    #[test]
    fn binary_keeps_long_printable_runs() {
        let bytes = b"%PDF\x00\x01ab\x02Plot at 12.97, 77.59\xff\xfe";
        assert_eq!(extract_text(bytes), "%PDF Plot at 12.97, 77.59");
    }

    #[test]
    fn nothing_printable_gives_placeholder() {
        assert_eq!(extract_text(&[0xff, 0x00, 0x01, b'a', 0xfe]), NO_TEXT_PLACEHOLDER);
        assert_eq!(extract_text(b"   "), NO_TEXT_PLACEHOLDER);
    }

    #[test]
    fn first_in_range_pair_wins() {
        let text = "ref 99.5, 10.0 then site 28.6139, 77.2090 and 19.0760; 72.8777";
        assert_eq!(scan_coordinates(text), Some(LatLon { lat: 28.6139, lon: 77.209 }));
    }

    #[test]
    fn digits_inside_longer_numbers_are_not_a_pair() {
        assert_eq!(scan_coordinates("Survey area 123.45, 67.89 sq units"), None);
        assert_eq!(scan_coordinates("Plot 12.34, 56.789.1"), None);
        assert_eq!(scan_coordinates("12.5, 77.25"), Some(LatLon { lat: 12.5, lon: 77.25 }));
        assert_eq!(
            scan_coordinates("area 123.45, 67.89; site (-12.5, 130.25)"),
            Some(LatLon { lat: -12.5, lon: 130.25 })
        );
    }

    #[test]
    fn no_pair_no_coordinates() {
        assert_eq!(scan_coordinates("Khata 1234, Ward 56"), None);
        assert_eq!(scan_coordinates("NO_COORDINATES_FOUND"), None);
    }
}
