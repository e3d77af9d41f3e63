use serde::Serialize;

/// Facilities are grouped by how far they are from the city, which sets the
/// departure band for every pickup stop.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Southern,
    Northern,
    Central,
    Western,
    SundayOnly,
}

impl Region {
    pub fn time_band(&self) -> &'static str {
        match self {
            Region::Southern => "4:00 AM - 5:00 AM",
            Region::Northern => "12:00 AM - 12:30 AM",
            Region::Central => "2:00 AM - 3:00 AM",
            Region::Western | Region::SundayOnly => "12:00 AM - 12:30 AM (Sunday only)",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PickupLocationEntry {
    pub name: &'static str,
    pub time: &'static str,
    pub address: &'static str,
    pub value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}
