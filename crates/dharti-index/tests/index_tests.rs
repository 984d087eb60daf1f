use dharti_core::{LatLng, Parcel};
use dharti_index::demo::{demo_parcels, BENGALURU};
use dharti_index::ParcelIndex;

fn square(id: &str, owner: &str, lat: f64, lng: f64) -> Parcel {
    let path = vec![
        LatLng::new(lat, lng),
        LatLng::new(lat, lng + 0.002),
        LatLng::new(lat + 0.002, lng + 0.002),
        LatLng::new(lat + 0.002, lng),
    ];
    Parcel::new(id, owner, path).expect("parcel")
}

#[test]
fn shared_owner_substring_resolves_to_one_parcel_regardless_of_input_order() {
    let a = square("KA-BLR-2002", "Rahul Verma", 12.0, 77.0);
    let b = square("KA-BLR-2001", "Rahul Singh", 12.1, 77.1);

    let forward = ParcelIndex::new([a.clone(), b.clone()]).expect("index");
    let reverse = ParcelIndex::new([b, a]).expect("index");

    let hit = forward.find_by_owner("rahul").expect("one parcel");
    assert_eq!(hit.id, "KA-BLR-2001");
    assert_eq!(reverse.find_by_owner("Rahul").map(|p| p.id.as_str()), Some("KA-BLR-2001"));
}

#[test]
fn demo_registry_answers_documented_queries() {
    let idx = ParcelIndex::new(demo_parcels()).expect("demo index");
    assert_eq!(idx.len(), 70);
    assert_eq!(idx.find_by_id("KA-BLR-1002").map(|p| p.owner.as_str()), Some("Rahul Singh"));
    assert_eq!(idx.find_by_id("tn-chn-2003").map(|p| p.id.as_str()), Some("TN-CHN-2003"));
    // The first hand-placed parcel has its corner on the city centre.
    let nudge = LatLng::new(BENGALURU.lat + 0.001, BENGALURU.lng + 0.001);
    assert_eq!(idx.find_containing(nudge).map(|p| p.id.as_str()), Some("KA-BLR-1001"));
}

#[test]
fn outlines_cover_every_parcel() {
    let idx = ParcelIndex::new(demo_parcels()).expect("demo index");
    let outlines = idx.outlines();
    assert_eq!(outlines.len(), idx.len());
    assert!(outlines.iter().all(|o| o.path.len() == 4));
}
