//! Integration tests for the HTML parsers using fixture files.

use parts_pricer::carpart::parser::{
    parse_hidden_fields, parse_results_page, parse_search_page, SearchPage,
};
use parts_pricer::carpart::stats::{dedupe_listings, summarize};
use parts_pricer::carpart::HeaderDictionary;
use parts_pricer::vinmatch::parser::parse_decode_page;

const RESULTS_FIXTURE: &str = include_str!("fixtures/carpart_results.html");
const INTERCHANGE_FIXTURE: &str = include_str!("fixtures/carpart_interchange.html");
const DECODE_FIXTURE: &str = include_str!("fixtures/vinmatch_decode.html");

#[test]
fn test_parse_results_fixture() {
    let listings = parse_results_page(RESULTS_FIXTURE, "Hood", &HeaderDictionary::default());

    // Layout tables are skipped and the colspan footer row is too short
    assert_eq!(listings.len(), 4);

    let first = &listings[0];
    assert_eq!(first.part_name, "Hood");
    assert_eq!(first.year, "2000");
    assert_eq!(first.description, "silver, (1E3)");
    assert_eq!(first.grade, "A");
    assert_eq!(first.stock_number, "H1024");
    assert_eq!(first.price, "$250");
    assert_eq!(first.vendor_name, "Joe's Auto Salvage");
    assert_eq!(first.location, "Denver, CO");
    assert_eq!(first.phone, "303-555-0100");
    assert_eq!(first.distance_miles, "12");

    let canadian = &listings[2];
    assert_eq!(canadian.year, "1999");
    assert_eq!(canadian.price, "$1,150.00");
    assert_eq!(canadian.vendor_name, "Prairie Pull-A-Part");
    assert_eq!(canadian.location, "Calgary, AB");

    let call = &listings[3];
    assert_eq!(call.price, "Call");
    assert_eq!(call.vendor_name, "Desert Auto Recyclers");
}

#[test]
fn test_results_fixture_summary() {
    let listings = parse_results_page(RESULTS_FIXTURE, "Hood", &HeaderDictionary::default());
    assert_eq!(dedupe_listings(listings.clone()).len(), 3);

    let summary = summarize("Hood", listings);
    assert_eq!(summary.listing_count, 3);
    assert_eq!(summary.average_price, Some(700.0));
    assert_eq!(summary.low_price, Some(250.0));
}

#[test]
fn test_results_fixture_is_results_page() {
    match parse_search_page(RESULTS_FIXTURE, "Hood", &HeaderDictionary::default()) {
        SearchPage::Results(listings) => assert_eq!(listings.len(), 4),
        other => panic!("expected results page, got {:?}", other),
    }
}

#[test]
fn test_parse_interchange_fixture() {
    match parse_search_page(INTERCHANGE_FIXTURE, "Hood", &HeaderDictionary::default()) {
        SearchPage::Interchange { choice, hidden } => {
            assert_eq!(choice, "640-01234");
            assert_eq!(hidden.get("userSearch"), Some("exact"));
            assert_eq!(hidden.get("dbModel"), Some("11.7.1"));
            assert_eq!(hidden.len(), 4);
        }
        other => panic!("expected interchange page, got {:?}", other),
    }

    let hidden = parse_hidden_fields(INTERCHANGE_FIXTURE);
    assert_eq!(hidden.get("userPart"), Some("Hood"));
    assert_eq!(hidden.get("userInterchange"), None);
}

#[test]
fn test_parse_decode_fixture() {
    let vehicle = parse_decode_page(DECODE_FIXTURE, "JT3HN86R0X0197825").unwrap();

    assert_eq!(vehicle.title(), "1999 Toyota 4Runner");
    assert_eq!(vehicle.trim(), "4dr SR5 3.4L Auto 4WD");
    assert_eq!(vehicle.engine(), "3.4L V-6 DOHC 24V");
    assert_eq!(vehicle.transmission.as_deref(), Some("4-Speed Automatic"));
    assert_eq!(vehicle.axle_ratio.as_deref(), Some("4.10"));
    assert_eq!(vehicle.body_style.as_deref(), Some("Sport Utility"));
    assert_eq!(vehicle.drive_type.as_deref(), Some("4WD"));
    assert_eq!(vehicle.fuel_type.as_deref(), Some("Gasoline"));
    assert_eq!(vehicle.fuel_economy.as_deref(), Some("15/19/17 MPG"));
    assert_eq!(vehicle.fuel_tank.as_deref(), Some("18.5 gal"));
    assert_eq!(vehicle.engine_cylinders.as_deref(), Some("6"));
    assert_eq!(vehicle.exterior_color.as_deref(), Some("Millennium Silver Metallic"));
    assert_eq!(vehicle.interior_color.as_deref(), Some("Oak"));
}
