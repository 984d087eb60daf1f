use dharti_core::LatLng;

/// Even-odd ray cast. `path` is treated as implicitly closed.
pub fn path_contains(path: &[LatLng], point: LatLng) -> bool {
    if path.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = path.len() - 1;
    for i in 0..path.len() {
        let (a, b) = (path[i], path[j]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let cross_lng = (b.lng - a.lng) * (point.lat - a.lat) / (b.lat - a.lat) + a.lng;
            if point.lng < cross_lng {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_contains_center_not_outside() {
        let sq = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ];
        assert!(path_contains(&sq, LatLng::new(0.5, 0.5)));
        assert!(!path_contains(&sq, LatLng::new(1.5, 0.5)));
        assert!(!path_contains(&sq, LatLng::new(0.5, -0.1)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape open to the north between lng 1 and 2.
        let u = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 3.0),
            LatLng::new(3.0, 3.0),
            LatLng::new(3.0, 2.0),
            LatLng::new(1.0, 2.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(3.0, 1.0),
            LatLng::new(3.0, 0.0),
        ];
        assert!(path_contains(&u, LatLng::new(0.5, 1.5)));
        assert!(!path_contains(&u, LatLng::new(2.0, 1.5)));
    }

    #[test]
    fn degenerate_path_contains_nothing() {
        let segment = [LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)];
        assert!(!path_contains(&segment, LatLng::new(0.5, 0.5)));
    }
}
