//! Built-in demo registry: two clusters of square mock parcels, one around
//! Bengaluru (`KA-BLR-1001..1050`) and one around Chennai (`TN-CHN-2001..2020`).

use dharti_core::{LatLng, Parcel};

pub const BENGALURU: LatLng = LatLng::new(12.9716, 77.5946);
pub const CHENNAI: LatLng = LatLng::new(13.0827, 80.2707);

const EDGE_DEG: f64 = 0.002;
const STEP_LNG: f64 = 0.004;
const STEP_LAT: f64 = 0.0035;

const BLR_OWNERS: [&str; 20] = [
    "Arjun Rao", "Meera Nair", "Kiran Reddy", "Priya Sharma", "Vikas Gupta",
    "Ananya Sharma", "Rohit Kumar", "Neha Verma", "Sanjay Mehta", "Dhruv Shah",
    "Pooja Jain", "Harpreet Singh", "Amit Patel", "Rajesh Kumar", "Lalita Mehta",
    "Imran Khan", "Tanya Malik", "Kabir Thakur", "Ritika Kapoor", "Shalini Joshi",
];

const CHN_OWNERS: [&str; 20] = [
    "S. Karthik", "P. Lakshmi", "R. Srinivasan", "A. Priyanka", "V. Bharath",
    "N. Keerthana", "M. Aravind", "T. Divya", "G. Prakash", "K. Nithya",
    "D. Vignesh", "S. Sandhya", "R. Harish", "A. Meenakshi", "V. Sanjay",
    "K. Gayathri", "M. Naveen", "P. Anitha", "S. Dinesh", "R. Kavya",
];

const CHN_GRID: [(i32, i32); 20] = [
    (-3, -2), (-1, -2), (1, -2), (3, -2),
    (-4, -1), (-2, -1), (0, -1), (2, -1), (4, -1),
    (-3, 0), (-1, 0), (1, 0), (3, 0),
    (-4, 1), (-2, 1), (0, 1), (2, 1), (4, 1),
    (-1, 2), (1, 2),
];

/// Axis-aligned square with its south-west corner at `base + (dy, dx)`.
fn square(base: LatLng, dx: f64, dy: f64) -> Vec<LatLng> {
    let (lat, lng) = (base.lat + dy, base.lng + dx);
    vec![
        LatLng::new(lat, lng),
        LatLng::new(lat, lng + EDGE_DEG),
        LatLng::new(lat + EDGE_DEG, lng + EDGE_DEG),
        LatLng::new(lat + EDGE_DEG, lng),
    ]
}

/// Short fingerprint standing in for the title-deed hash.
fn doc_digest(id: &str, owner: &str) -> String {
    let a = blake3::hash(id.as_bytes()).to_hex();
    let b = blake3::hash(owner.as_bytes()).to_hex();
    format!("0x{}…{}", &a.as_str()[..6], &b.as_str()[58..])
}

fn mock(id: &str, owner: &str, path: Vec<LatLng>, area_sq_m: f64, jurisdiction: &str) -> Parcel {
    Parcel {
        id: id.to_string(),
        owner: owner.to_string(),
        bounding_path: path,
        area_sq_m,
        jurisdiction: jurisdiction.to_string(),
        encumbrances: Default::default(),
        chain_asset_id: format!("parcel:{id}:l2-rollup-01"),
        doc_digest: doc_digest(id, owner),
    }
}

fn bengaluru(id: &str, owner: &str, dx: f64, dy: f64, area_sq_m: f64) -> Parcel {
    let parcel = mock(id, owner, square(BENGALURU, dx, dy), area_sq_m, "BBMP · Karnataka");
    if id.ends_with('2') {
        parcel.with_encumbrance("Bank Lien: KBL-2024-19")
    } else {
        parcel
    }
}

fn chennai(id: &str, owner: &str, dx: f64, dy: f64, area_sq_m: f64) -> Parcel {
    let path = square(CHENNAI, dx, dy);
    let parcel = mock(id, owner, path, area_sq_m, "Greater Chennai · Tamil Nadu");
    if id.ends_with('7') {
        parcel.with_encumbrance("Encumbrance: EC-2024-07")
    } else {
        parcel
    }
}

/// The 70 demo parcels, in generation order.
pub fn demo_parcels() -> Vec<Parcel> {
    let mut parcels = vec![
        bengaluru("KA-BLR-1001", "Anita Rao", 0.0, 0.0, 980.0),
        bengaluru("KA-BLR-1002", "Rahul Singh", 0.004, 0.003, 1125.0),
        bengaluru("KA-BLR-1003", "Lalita Mehta", -0.004, -0.0035, 870.0),
    ];

    for i in 4..=50usize {
        let gx = (i % 10) as f64 - 5.0;
        let gy = (i / 10) as f64 - 2.0;
        let area = 800 + (i * 37) % 600;
        let owner = BLR_OWNERS[(i + 3) % BLR_OWNERS.len()];
        let id = format!("KA-BLR-{}", 1000 + i);
        parcels.push(bengaluru(&id, owner, gx * STEP_LNG, gy * STEP_LAT, area as f64));
    }

    for (i, (gx, gy)) in CHN_GRID.iter().enumerate() {
        let area = 900 + (i * 53) % 700;
        let owner = CHN_OWNERS[i % CHN_OWNERS.len()];
        parcels.push(chennai(
            &format!("TN-CHN-{}", 2001 + i),
            owner,
            f64::from(*gx) * STEP_LNG,
            f64::from(*gy) * STEP_LAT,
            area as f64,
        ));
    }
    parcels
}
