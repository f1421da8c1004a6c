use serde::Deserialize;

/// Raw table rows exactly as they appear in the feed. Times and dates stay
/// as strings here; the dataset builder performs the coercions.
///
/// Every field defaults so that a column absent from a feed reads as an
/// empty value rather than an error.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsShapePoint {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_desc: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsRoute {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_type: i32,
    pub route_color: String,
    pub route_text_color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsTrip {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    pub shape_id: String,
    pub trip_headsign: String,
    pub direction_id: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsStopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_time: String,
    pub departure_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsCalendar {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtfsCalendarDate {
    pub service_id: String,
    pub date: String,
    pub exception_type: u8,
}
