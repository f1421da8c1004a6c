use std::sync::Arc;

use chrono::NaiveDate;

use crate::shared::{
    geo::{Coordinate, Distance},
    time::Time,
};

/// One vertex of a trip polyline with the running distance from its start.
#[derive(Debug, Clone, Copy)]
pub struct ShapePoint {
    pub coordinate: Coordinate,
    /// Great-circle distance accumulated from the first point. Always
    /// derived from the geometry, never read from the feed.
    pub cumulative_distance: Distance,
}

/// The physical path a trip traverses, ordered by point sequence.
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: Arc<str>,
    pub points: Arc<[ShapePoint]>,
}

/// A physical point where passengers board or alight.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub description: Arc<str>,
    pub coordinate: Coordinate,
}

/// A line as riders know it, grouping trips under one name and colour.
#[derive(Debug, Clone)]
pub struct Route {
    pub id: Arc<str>,
    pub short_name: Arc<str>,
    pub long_name: Arc<str>,
    /// Vehicle category (0 tram, 1 subway, 3 bus, ...).
    pub route_type: i32,
    pub color: Arc<str>,
    pub text_color: Arc<str>,
}

/// One scheduled run of a vehicle along a route.
#[derive(Debug, Clone)]
pub struct Trip {
    pub id: Arc<str>,
    pub route_id: Arc<str>,
    pub service_id: Arc<str>,
    pub shape_id: Option<Arc<str>>,
    pub headsign: Arc<str>,
    pub direction_id: Option<u8>,
    /// Range of this trip's records in the global stop-time array.
    pub stop_times: StopTimeSlice,
}

/// A contiguous range within the global `stop_times` array.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopTimeSlice {
    pub start: u32,
    pub count: u32,
}

/// One call of a trip at a stop.
#[derive(Debug, Clone)]
pub struct StopTime {
    pub stop_idx: u32,
    pub stop_sequence: u32,
    pub arrival: Time,
    pub departure: Time,
    /// Distance along the trip's shape, derived at load.
    pub shape_dist: Distance,
}

/// Weekly service pattern with an inclusive validity range.
#[derive(Debug, Clone)]
pub struct Calendar {
    pub service_id: Arc<str>,
    /// Indexed by the weekday's days-from-Sunday (Sun = 0 .. Sat = 6).
    pub weekdays: [bool; 7],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Per-date overlay on a service calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    Added,
    Removed,
}
