use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rayon::prelude::*;

use crate::{
    dataset::{Dataset, ShapePoint, StopTime, Trip},
    shared::geo::{Coordinate, Distance},
};

use super::calendar::active_services;

/// Where a vehicle is and what it is doing at the query instant.
#[derive(Debug, Clone)]
pub struct VehiclePosition {
    pub trip_idx: u32,
    pub coordinate: Coordinate,
    pub shape_dist: Distance,
    pub status: VehicleStatus,
}

#[derive(Debug, Clone)]
pub enum VehicleStatus {
    /// Dwelling at a stop between arrival and departure.
    AtStop { stop_idx: u32 },
    /// Between two consecutive stops, interpolated along the shape.
    InTransit { from_stop_idx: u32, to_stop_idx: u32 },
}

/// Positions of every vehicle dwelling or in motion at `datetime`, keyed
/// by trip id. `routes` restricts the sweep to the given route ids.
///
/// The query instant is split into the service day and a plain
/// seconds-since-midnight value, so trips running past local midnight
/// (times above 86 400) only answer when the caller frames the query in
/// the originating service day via [`vehicles_at_seconds`].
pub fn vehicles_at(
    dataset: &Dataset,
    datetime: NaiveDateTime,
    routes: Option<&HashSet<String>>,
) -> BTreeMap<Arc<str>, VehiclePosition> {
    vehicles_at_seconds(
        dataset,
        datetime.date(),
        datetime.time().num_seconds_from_midnight(),
        routes,
    )
}

/// Same sweep with the instant given as a service day plus raw seconds,
/// which may exceed 86 400 for past-midnight service.
pub fn vehicles_at_seconds(
    dataset: &Dataset,
    date: NaiveDate,
    seconds: u32,
    routes: Option<&HashSet<String>>,
) -> BTreeMap<Arc<str>, VehiclePosition> {
    let services = active_services(dataset, date);
    let mut candidates: Vec<u32> = Vec::new();
    for service_id in &services {
        candidates.extend_from_slice(dataset.trips_for_service(service_id));
    }

    // The dataset is immutable, so the per-trip sweep fans out freely.
    candidates
        .par_iter()
        .filter_map(|&trip_idx| {
            let trip = dataset.trip(trip_idx);
            if let Some(routes) = routes {
                if !routes.contains(trip.route_id.as_ref()) {
                    return None;
                }
            }
            locate(dataset, trip_idx, trip, seconds)
                .map(|position| (trip.id.clone(), position))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn locate(dataset: &Dataset, trip_idx: u32, trip: &Trip, t: u32) -> Option<VehiclePosition> {
    let stop_times = dataset.stop_times_for(trip);
    let (first, last) = match (stop_times.first(), stop_times.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return None,
    };
    if t < first.arrival.as_seconds() || t > last.departure.as_seconds() {
        return None;
    }

    // Dwell wins over the segment between overlapping stops.
    for stop_time in stop_times {
        if stop_time.arrival.as_seconds() <= t && t <= stop_time.departure.as_seconds() {
            let stop = dataset.stop(stop_time.stop_idx);
            return Some(VehiclePosition {
                trip_idx,
                coordinate: stop.coordinate,
                shape_dist: stop_time.shape_dist,
                status: VehicleStatus::AtStop {
                    stop_idx: stop_time.stop_idx,
                },
            });
        }
    }

    let (from, to) = bracketing_pair(stop_times, t)?;
    let shape = trip.shape_id.as_deref().and_then(|id| dataset.shape_by_id(id))?;

    let span = to.arrival.as_seconds() - from.departure.as_seconds();
    let ratio = (t - from.departure.as_seconds()) as f64 / span as f64;
    let expected = Distance::from_meters(
        from.shape_dist.as_meters()
            + ratio * (to.shape_dist.as_meters() - from.shape_dist.as_meters()),
    );
    let coordinate = point_at_distance(&shape.points, expected)?;
    Some(VehiclePosition {
        trip_idx,
        coordinate,
        shape_dist: expected,
        status: VehicleStatus::InTransit {
            from_stop_idx: from.stop_idx,
            to_stop_idx: to.stop_idx,
        },
    })
}

/// The unique consecutive pair whose departure/arrival window strictly
/// contains `t`.
fn bracketing_pair(stop_times: &[StopTime], t: u32) -> Option<(&StopTime, &StopTime)> {
    stop_times.windows(2).find_map(|pair| {
        let (from, to) = (&pair[0], &pair[1]);
        (from.departure.as_seconds() < t && t < to.arrival.as_seconds()).then_some((from, to))
    })
}

/// First shape segment bracketing `distance`, linearly interpolated.
/// Zero-length segments collapse onto their start point.
fn point_at_distance(points: &[ShapePoint], distance: Distance) -> Option<Coordinate> {
    points.windows(2).find_map(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        if a.cumulative_distance <= distance && distance <= b.cumulative_distance {
            let span = b.cumulative_distance.as_meters() - a.cumulative_distance.as_meters();
            let fraction = if span == 0.0 {
                0.0
            } else {
                (distance.as_meters() - a.cumulative_distance.as_meters()) / span
            };
            Some(a.coordinate.interpolate(&b.coordinate, fraction))
        } else {
            None
        }
    })
}
