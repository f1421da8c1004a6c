use headway::dataset::Trip;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TripDto {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    pub shape_id: Option<String>,
    pub trip_headsign: String,
    pub direction_id: Option<u8>,
}

impl TripDto {
    pub fn from(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id.to_string(),
            route_id: trip.route_id.to_string(),
            service_id: trip.service_id.to_string(),
            shape_id: trip.shape_id.as_ref().map(|id| id.to_string()),
            trip_headsign: trip.headsign.to_string(),
            direction_id: trip.direction_id,
        }
    }
}
