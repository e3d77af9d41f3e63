use crate::models::{PickupLocationEntry, Region};

const BROOKLYN: &str = "Brooklyn: East New York McDonald's";
const BROOKLYN_ADDR: &str = "12 Pennsylvania Avenue";
const QUEENS: &str = "Queens: Jamaica Station LIRR";
const QUEENS_ADDR: &str = "Corner of Sutphin BLVD";
const BRONX: &str = "Bronx: 161 McDonald's - Yankee Stadium";
const BRONX_GATE6: &str = "Bronx: 161 Yankee Stadium Gate 6";
const BRONX_ADDR: &str = "51-67 161st St";
const SUNDAY_ONLY: Option<&str> = Some("Sunday Only");

const fn stop(
    name: &'static str,
    time: &'static str,
    address: &'static str,
    value: &'static str,
    note: Option<&'static str>,
) -> PickupLocationEntry {
    PickupLocationEntry {
        name,
        time,
        address,
        value,
        note,
    }
}

const SOUTHERN_STOPS: &[PickupLocationEntry] = &[
    stop(BROOKLYN, "4:00 AM", BROOKLYN_ADDR, "brooklyn-enm", None),
    stop(QUEENS, "4:15 AM", QUEENS_ADDR, "queens-jamaica", None),
    stop(BRONX, "5:00 AM", BRONX_ADDR, "bronx-yankee", None),
];

const NORTHERN_STOPS: &[PickupLocationEntry] = &[
    stop(BROOKLYN, "12:00 AM", BROOKLYN_ADDR, "brooklyn-enm", None),
    stop(BRONX, "12:30 AM", BRONX_ADDR, "bronx-yankee", None),
];

const CENTRAL_STOPS: &[PickupLocationEntry] = &[
    stop(BROOKLYN, "2:00 AM", BROOKLYN_ADDR, "brooklyn-enm", None),
    stop(QUEENS, "2:15 AM", QUEENS_ADDR, "queens-jamaica", None),
    stop(BRONX, "3:00 AM", BRONX_ADDR, "bronx-yankee", None),
];

const SUNDAY_STOPS: &[PickupLocationEntry] = &[
    stop(BROOKLYN, "12:00 AM", BROOKLYN_ADDR, "brooklyn-enm", SUNDAY_ONLY),
    stop(BRONX_GATE6, "12:30 AM", BRONX_ADDR, "bronx-gate6", SUNDAY_ONLY),
];

const FACILITIES: &[(&str, Region)] = &[
    ("Coxsackie Correctional Facility", Region::Southern),
    ("Greene Correctional Facility", Region::Southern),
    ("Washington Correctional Facility", Region::Southern),
    ("Clinton Correctional Facility", Region::Northern),
    ("Altona Correctional Facility", Region::Northern),
    ("Franklin Correctional Facility", Region::Northern),
    ("Barehill Correctional Facility", Region::Northern),
    ("Upstate Correctional Facility", Region::Northern),
    ("Adirondack Correctional Facility", Region::Northern),
    ("Raybrook Correctional Facility", Region::Northern),
    ("Mohawk Correctional Facility", Region::Central),
    ("Mid-State Correctional Facility", Region::Central),
    ("Marcy Correctional Facility", Region::Central),
    ("Collins Correctional Facility", Region::Western),
    ("Lakeview Correctional Facility", Region::Western),
    ("Riverview Correctional Facility", Region::SundayOnly),
    ("Gouverneur Correctional Facility", Region::SundayOnly),
    ("Cape Vincent Correctional Facility", Region::SundayOnly),
];

fn stops_for(region: Region) -> &'static [PickupLocationEntry] {
    match region {
        Region::Southern => SOUTHERN_STOPS,
        Region::Northern => NORTHERN_STOPS,
        Region::Central => CENTRAL_STOPS,
        Region::Western | Region::SundayOnly => SUNDAY_STOPS,
    }
}

pub fn region_for(facility: &str) -> Option<Region> {
    FACILITIES
        .iter()
        .find(|(name, _)| *name == facility)
        .map(|(_, region)| *region)
}

/// Pickup stops for a facility in boarding order. Unknown facilities get an
/// empty slice; callers show a "contact us" message instead of failing.
pub fn pickup_options_for(facility: &str) -> &'static [PickupLocationEntry] {
    region_for(facility).map(stops_for).unwrap_or(&[])
}

pub fn find_pickup(facility: &str, value: &str) -> Option<&'static PickupLocationEntry> {
    pickup_options_for(facility).iter().find(|entry| entry.value == value)
}

pub fn facilities() -> impl Iterator<Item = &'static str> {
    FACILITIES.iter().map(|(name, _)| *name)
}
