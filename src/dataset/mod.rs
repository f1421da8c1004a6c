use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::warn;

use crate::{
    gtfs::{self, Gtfs},
    shared::{
        geo::{Coordinate, Distance},
        time::Time,
    },
};

mod distance;
mod entities;
pub use entities::*;

type IdToIndex = HashMap<Arc<str>, usize>;

/// Immutable, fully indexed snapshot of one GTFS feed.
///
/// Built once at startup, then shared read-only between request handlers;
/// cloning is cheap since every collection sits behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    shapes: Arc<[Shape]>,
    stops: Arc<[Stop]>,
    routes: Arc<[Route]>,
    trips: Arc<[Trip]>,
    stop_times: Arc<[StopTime]>,
    calendars: Arc<[Calendar]>,

    // Lookup tables
    shape_lookup: Arc<IdToIndex>,
    stop_lookup: Arc<IdToIndex>,
    route_lookup: Arc<IdToIndex>,
    trip_lookup: Arc<IdToIndex>,
    trips_by_service: Arc<HashMap<Arc<str>, Arc<[u32]>>>,
    exceptions_by_date: Arc<HashMap<NaiveDate, Vec<(Arc<str>, ExceptionKind)>>>,

    counts: TableCounts,
}

/// Row counts recorded at load, surfaced by the health endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableCounts {
    pub shapes: usize,
    pub stops: usize,
    pub routes: usize,
    pub trips: usize,
    pub stop_times: usize,
    pub calendars: usize,
    pub calendar_dates: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Default::default()
    }

    /// Streams every table of the feed into the indexed dataset, then runs
    /// the geometric post-pass that anchors stops into the shape distance
    /// system. A missing table leaves its index empty; a dangling
    /// cross-reference makes the affected trip unservable, never a failure.
    pub fn with_gtfs(mut self, gtfs: &Gtfs) -> Result<Self, gtfs::Error> {
        // Shapes: group points by id, order each polyline, accumulate
        // great-circle distances. Any shape_dist_traveled in the feed is
        // ignored so that one consistent distance system survives.
        let mut shape_lookup: IdToIndex = HashMap::new();
        let mut raw_shapes: Vec<(Arc<str>, Vec<(u32, Coordinate)>)> = Vec::new();
        let present = gtfs.stream_shapes(|row| {
            if row.shape_id.is_empty() {
                return;
            }
            let coordinate = Coordinate {
                latitude: row.shape_pt_lat,
                longitude: row.shape_pt_lon,
            };
            let index = match shape_lookup.get(row.shape_id.as_str()) {
                Some(index) => *index,
                None => {
                    let id: Arc<str> = row.shape_id.into();
                    shape_lookup.insert(id.clone(), raw_shapes.len());
                    raw_shapes.push((id, Vec::new()));
                    raw_shapes.len() - 1
                }
            };
            raw_shapes[index].1.push((row.shape_pt_sequence, coordinate));
        })?;
        if !present {
            warn!("shapes.txt not found, shape index left empty");
        }
        let shapes: Vec<Shape> = raw_shapes
            .into_iter()
            .map(|(id, mut points)| {
                points.sort_by_key(|(sequence, _)| *sequence);
                let coordinates: Vec<Coordinate> =
                    points.into_iter().map(|(_, coordinate)| coordinate).collect();
                Shape {
                    id,
                    points: distance::accumulate(&coordinates).into(),
                }
            })
            .collect();
        self.counts.shapes = shapes.len();
        self.shapes = shapes.into();
        self.shape_lookup = shape_lookup.into();

        // Stops
        let mut stop_lookup: IdToIndex = HashMap::new();
        let mut stops: Vec<Stop> = Vec::new();
        let present = gtfs.stream_stops(|row| {
            if row.stop_id.is_empty() {
                return;
            }
            let stop = Stop {
                id: row.stop_id.into(),
                name: row.stop_name.into(),
                description: row.stop_desc.into(),
                coordinate: Coordinate {
                    latitude: row.stop_lat,
                    longitude: row.stop_lon,
                },
            };
            stop_lookup.insert(stop.id.clone(), stops.len());
            stops.push(stop);
        })?;
        if !present {
            warn!("stops.txt not found, stop index left empty");
        }
        self.counts.stops = stops.len();

        // Routes
        let mut route_lookup: IdToIndex = HashMap::new();
        let mut routes: Vec<Route> = Vec::new();
        let present = gtfs.stream_routes(|row| {
            if row.route_id.is_empty() {
                return;
            }
            let route = Route {
                id: row.route_id.into(),
                short_name: row.route_short_name.into(),
                long_name: row.route_long_name.into(),
                route_type: row.route_type,
                color: row.route_color.into(),
                text_color: row.route_text_color.into(),
            };
            route_lookup.insert(route.id.clone(), routes.len());
            routes.push(route);
        })?;
        if !present {
            warn!("routes.txt not found, route index left empty");
        }
        self.counts.routes = routes.len();
        self.routes = routes.into();
        self.route_lookup = route_lookup.into();

        // Trips
        let mut trip_lookup: IdToIndex = HashMap::new();
        let mut trips: Vec<Trip> = Vec::new();
        let mut trips_by_service: HashMap<Arc<str>, Vec<u32>> = HashMap::new();
        let present = gtfs.stream_trips(|row| {
            if row.trip_id.is_empty() {
                return;
            }
            let service_id: Arc<str> = row.service_id.into();
            let trip = Trip {
                id: row.trip_id.into(),
                route_id: row.route_id.into(),
                service_id: service_id.clone(),
                shape_id: if row.shape_id.is_empty() {
                    None
                } else {
                    Some(row.shape_id.into())
                },
                headsign: row.trip_headsign.into(),
                direction_id: row.direction_id,
                stop_times: StopTimeSlice::default(),
            };
            trip_lookup.insert(trip.id.clone(), trips.len());
            trips_by_service
                .entry(service_id)
                .or_default()
                .push(trips.len() as u32);
            trips.push(trip);
        })?;
        if !present {
            warn!("trips.txt not found, trip index left empty");
        }
        self.counts.trips = trips.len();

        // Calendar
        let mut calendars: Vec<Calendar> = Vec::new();
        let present = gtfs.stream_calendar(|row| {
            let (Some(start_date), Some(end_date)) = (
                parse_service_date(&row.start_date),
                parse_service_date(&row.end_date),
            ) else {
                warn!(service = %row.service_id, "skipping calendar row with invalid date range");
                return;
            };
            calendars.push(Calendar {
                service_id: row.service_id.into(),
                weekdays: [
                    row.sunday,
                    row.monday,
                    row.tuesday,
                    row.wednesday,
                    row.thursday,
                    row.friday,
                    row.saturday,
                ]
                .map(|flag| flag == 1),
                start_date,
                end_date,
            });
        })?;
        if !present {
            warn!("calendar.txt not found, calendar index left empty");
        }
        self.counts.calendars = calendars.len();
        self.calendars = calendars.into();

        // Calendar exceptions
        let mut exceptions_by_date: HashMap<NaiveDate, Vec<(Arc<str>, ExceptionKind)>> =
            HashMap::new();
        let mut calendar_dates = 0usize;
        let present = gtfs.stream_calendar_dates(|row| {
            let Some(date) = parse_service_date(&row.date) else {
                warn!(service = %row.service_id, "skipping exception with invalid date");
                return;
            };
            let kind = match row.exception_type {
                1 => ExceptionKind::Added,
                2 => ExceptionKind::Removed,
                other => {
                    warn!(service = %row.service_id, exception_type = other, "skipping exception with unknown type");
                    return;
                }
            };
            exceptions_by_date
                .entry(date)
                .or_default()
                .push((row.service_id.into(), kind));
            calendar_dates += 1;
        })?;
        if !present {
            warn!("calendar_dates.txt not found, exception index left empty");
        }
        self.counts.calendar_dates = calendar_dates;
        self.exceptions_by_date = exceptions_by_date.into();

        // Stop times, bucketed per trip. A reference to an unknown stop
        // poisons its whole trip: the trip stays listed but can never
        // produce a position.
        let mut buckets: HashMap<u32, Vec<StopTime>> = HashMap::new();
        let mut poisoned: HashSet<u32> = HashSet::new();
        let present = gtfs.stream_stop_times(|row| {
            let Some(trip_idx) = trip_lookup.get(row.trip_id.as_str()).map(|i| *i as u32) else {
                warn!(trip = %row.trip_id, "stop time references unknown trip");
                return;
            };
            let Some(stop_idx) = stop_lookup.get(row.stop_id.as_str()).map(|i| *i as u32) else {
                warn!(trip = %row.trip_id, stop = %row.stop_id, "stop time references unknown stop, trip will be skipped");
                poisoned.insert(trip_idx);
                return;
            };
            let (Some(arrival), Some(departure)) = (
                Time::from_hms(&row.arrival_time),
                Time::from_hms(&row.departure_time),
            ) else {
                warn!(trip = %row.trip_id, "skipping stop time with unparseable times");
                return;
            };
            buckets.entry(trip_idx).or_default().push(StopTime {
                stop_idx,
                stop_sequence: row.stop_sequence,
                arrival,
                departure,
                shape_dist: Distance::default(),
            });
        })?;
        if !present {
            warn!("stop_times.txt not found, stop time index left empty");
        }

        let mut per_trip: Vec<Vec<StopTime>> = (0..trips.len() as u32)
            .map(|trip_idx| {
                if poisoned.contains(&trip_idx) {
                    Vec::new()
                } else {
                    let mut bucket = buckets.remove(&trip_idx).unwrap_or_default();
                    bucket.sort_unstable_by_key(|stop_time| stop_time.stop_sequence);
                    bucket
                }
            })
            .collect();

        // Geometric post-pass, independent per trip.
        let shapes = self.shapes.clone();
        let shape_lookup = self.shape_lookup.clone();
        per_trip
            .par_iter_mut()
            .enumerate()
            .for_each(|(trip_idx, stop_times)| {
                let shape_points = trips[trip_idx]
                    .shape_id
                    .as_deref()
                    .and_then(|id| shape_lookup.get(id))
                    .map(|&shape_idx| shapes[shape_idx].points.as_ref())
                    .filter(|points| !points.is_empty());
                distance::assign_shape_distances(stop_times, &stops, shape_points);
            });

        let mut stop_times: Vec<StopTime> = Vec::new();
        for (trip, bucket) in trips.iter_mut().zip(per_trip) {
            trip.stop_times = StopTimeSlice {
                start: stop_times.len() as u32,
                count: bucket.len() as u32,
            };
            stop_times.extend(bucket);
        }
        self.counts.stop_times = stop_times.len();
        self.stop_times = stop_times.into();

        self.stops = stops.into();
        self.stop_lookup = stop_lookup.into();
        self.trips = trips.into();
        self.trip_lookup = trip_lookup.into();
        self.trips_by_service = trips_by_service
            .into_iter()
            .map(|(service_id, trip_idxs)| (service_id, trip_idxs.into()))
            .collect::<HashMap<_, Arc<[u32]>>>()
            .into();

        Ok(self)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn calendars(&self) -> &[Calendar] {
        &self.calendars
    }

    pub fn shape_by_id(&self, id: &str) -> Option<&Shape> {
        let index = self.shape_lookup.get(id)?;
        Some(&self.shapes[*index])
    }

    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(id)?;
        Some(&self.stops[*index])
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        Some(&self.routes[*index])
    }

    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        let index = self.trip_lookup.get(id)?;
        Some(&self.trips[*index])
    }

    /// Indexed access for references produced by this dataset.
    pub fn trip(&self, trip_idx: u32) -> &Trip {
        &self.trips[trip_idx as usize]
    }

    pub fn stop(&self, stop_idx: u32) -> &Stop {
        &self.stops[stop_idx as usize]
    }

    /// The trip's stop times ordered by stop sequence.
    pub fn stop_times_for(&self, trip: &Trip) -> &[StopTime] {
        let start = trip.stop_times.start as usize;
        let end = start + trip.stop_times.count as usize;
        &self.stop_times[start..end]
    }

    /// Indices of the trips bound to a service, empty for unknown ids.
    pub fn trips_for_service(&self, service_id: &str) -> &[u32] {
        self.trips_by_service
            .get(service_id)
            .map(|trip_idxs| trip_idxs.as_ref())
            .unwrap_or(&[])
    }

    /// Calendar exceptions registered for one date.
    pub fn exceptions_on(&self, date: NaiveDate) -> &[(Arc<str>, ExceptionKind)] {
        self.exceptions_by_date
            .get(&date)
            .map(|exceptions| exceptions.as_slice())
            .unwrap_or(&[])
    }

    pub fn counts(&self) -> TableCounts {
        self.counts
    }
}

fn parse_service_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}
