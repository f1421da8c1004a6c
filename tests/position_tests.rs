mod common;

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use headway::{
    resolver::{vehicles_at, vehicles_at_seconds, VehicleStatus},
    shared::geo::Coordinate,
};

fn datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap()
}

const EVERYDAY_CALENDAR: &str = "\
service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
svc1,1,1,1,1,1,1,1,20250101,20251231
";

const ROUTES: &str = "\
route_id,route_short_name,route_long_name,route_type
r1,1,Line One,3
";

const EQUATOR_SHAPE: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence
sh1,0.0,0.0,1
sh1,0.0,1.0,2
";

const EQUATOR_STOPS: &str = "\
stop_id,stop_name,stop_lat,stop_lon
a,Origin,0.0,0.0
b,Terminus,0.0,1.0
";

#[test]
fn dwelling_vehicle_sits_at_stop() {
    let stops = "\
stop_id,stop_name,stop_lat,stop_lon
s1,Lone Stop,10.0,20.0
";
    let trips = "\
trip_id,route_id,service_id
t1,r1,svc1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t1,s1,1,09:00:00,09:00:30
";
    let dataset = common::load_dataset(&[
        ("calendar.txt", EVERYDAY_CALENDAR),
        ("routes.txt", ROUTES),
        ("stops.txt", stops),
        ("trips.txt", trips),
        ("stop_times.txt", stop_times),
    ]);

    let vehicles = vehicles_at(&dataset, datetime("2025-01-03T09:00:15"), None);
    assert_eq!(vehicles.len(), 1);
    let vehicle = &vehicles["t1"];
    assert!(matches!(vehicle.status, VehicleStatus::AtStop { .. }));
    assert_eq!(
        vehicle.coordinate,
        Coordinate {
            latitude: 10.0,
            longitude: 20.0
        }
    );

    // One second after departure the trip is out of service.
    assert!(vehicles_at(&dataset, datetime("2025-01-03T09:00:31"), None).is_empty());
    assert!(vehicles_at(&dataset, datetime("2025-01-03T08:59:59"), None).is_empty());
}

fn equator_dataset() -> headway::dataset::Dataset {
    let trips = "\
trip_id,route_id,service_id,shape_id
t2,r1,svc1,sh1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t2,a,1,10:00:00,10:00:00
t2,b,2,10:10:00,10:10:00
";
    common::load_dataset(&[
        ("calendar.txt", EVERYDAY_CALENDAR),
        ("routes.txt", ROUTES),
        ("shapes.txt", EQUATOR_SHAPE),
        ("stops.txt", EQUATOR_STOPS),
        ("trips.txt", trips),
        ("stop_times.txt", stop_times),
    ])
}

#[test]
fn midpoint_interpolation_on_straight_segment() {
    let dataset = equator_dataset();

    let vehicles = vehicles_at(&dataset, datetime("2025-01-03T10:05:00"), None);
    let vehicle = &vehicles["t2"];
    assert!(matches!(
        vehicle.status,
        VehicleStatus::InTransit { .. }
    ));

    let expected = Coordinate {
        latitude: 0.0,
        longitude: 0.5,
    };
    let deviation = vehicle.coordinate.haversine_distance(&expected);
    assert!(deviation.as_meters() < 1.0, "off by {deviation:?}");

    let total = dataset.shape_by_id("sh1").unwrap().points[1].cumulative_distance;
    assert!((vehicle.shape_dist.as_meters() - total.as_meters() / 2.0).abs() < 1.0);

    if let VehicleStatus::InTransit {
        from_stop_idx,
        to_stop_idx,
    } = vehicle.status
    {
        assert_eq!(dataset.stop(from_stop_idx).id.as_ref(), "a");
        assert_eq!(dataset.stop(to_stop_idx).id.as_ref(), "b");
    }
}

#[test]
fn outside_service_window_yields_nothing() {
    let dataset = equator_dataset();
    assert!(vehicles_at(&dataset, datetime("2025-01-03T09:59:00"), None).is_empty());
    assert!(vehicles_at(&dataset, datetime("2025-01-03T10:11:00"), None).is_empty());
}

#[test]
fn zero_dwell_prefers_at_stop_over_in_transit() {
    let dataset = equator_dataset();
    let vehicles = vehicles_at(&dataset, datetime("2025-01-03T10:00:00"), None);
    let vehicle = &vehicles["t2"];
    assert!(matches!(vehicle.status, VehicleStatus::AtStop { .. }));
}

#[test]
fn past_midnight_trip_answers_to_service_day_queries_only() {
    let trips = "\
trip_id,route_id,service_id,shape_id
t3,r1,svc1,sh1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t3,a,1,25:00:00,25:00:00
t3,b,2,25:30:00,25:30:00
";
    let dataset = common::load_dataset(&[
        ("calendar.txt", EVERYDAY_CALENDAR),
        ("routes.txt", ROUTES),
        ("shapes.txt", EQUATOR_SHAPE),
        ("stops.txt", EQUATOR_STOPS),
        ("trips.txt", trips),
        ("stop_times.txt", stop_times),
    ]);

    // The wall-clock datetime of the following day never matches raw
    // seconds above 86 400.
    let wall_clock = vehicles_at(&dataset, datetime("2025-01-03T01:15:00"), None);
    assert!(wall_clock.is_empty());

    // Framed in the originating service day the vehicle appears mid-run.
    let service_day = vehicles_at_seconds(
        &dataset,
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        25 * 3600 + 15 * 60,
        None,
    );
    let vehicle = &service_day["t3"];
    assert!(matches!(vehicle.status, VehicleStatus::InTransit { .. }));
}

#[test]
fn shapeless_trip_is_skipped_between_stops() {
    let trips = "\
trip_id,route_id,service_id
t4,r1,svc1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t4,a,1,10:00:00,10:00:00
t4,b,2,10:10:00,10:10:00
";
    let dataset = common::load_dataset(&[
        ("calendar.txt", EVERYDAY_CALENDAR),
        ("routes.txt", ROUTES),
        ("stops.txt", EQUATOR_STOPS),
        ("trips.txt", trips),
        ("stop_times.txt", stop_times),
    ]);

    assert!(vehicles_at(&dataset, datetime("2025-01-03T10:05:00"), None).is_empty());
    // Dwell positions need no shape.
    let at_origin = vehicles_at(&dataset, datetime("2025-01-03T10:00:00"), None);
    assert!(matches!(
        at_origin["t4"].status,
        VehicleStatus::AtStop { .. }
    ));
}

#[test]
fn trip_with_unknown_stop_is_unservable() {
    let trips = "\
trip_id,route_id,service_id
t5,r1,svc1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t5,a,1,10:00:00,10:00:00
t5,ghost,2,10:10:00,10:10:00
";
    let dataset = common::load_dataset(&[
        ("calendar.txt", EVERYDAY_CALENDAR),
        ("routes.txt", ROUTES),
        ("stops.txt", EQUATOR_STOPS),
        ("trips.txt", trips),
        ("stop_times.txt", stop_times),
    ]);

    assert!(dataset.trip_by_id("t5").is_some());
    assert!(vehicles_at(&dataset, datetime("2025-01-03T10:00:00"), None).is_empty());
}

#[test]
fn route_filter_prunes_and_unions() {
    let routes = "\
route_id,route_short_name,route_long_name,route_type
ra,A,Line A,3
rb,B,Line B,3
";
    let trips = "\
trip_id,route_id,service_id,shape_id
ta,ra,svc1,sh1
tb,rb,svc1,sh1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
ta,a,1,10:00:00,10:00:00
ta,b,2,10:10:00,10:10:00
tb,a,1,10:00:00,10:00:00
tb,b,2,10:10:00,10:10:00
";
    let dataset = common::load_dataset(&[
        ("calendar.txt", EVERYDAY_CALENDAR),
        ("routes.txt", routes),
        ("shapes.txt", EQUATOR_SHAPE),
        ("stops.txt", EQUATOR_STOPS),
        ("trips.txt", trips),
        ("stop_times.txt", stop_times),
    ]);
    let instant = datetime("2025-01-03T10:05:00");

    let only_a: HashSet<String> = ["ra".to_string()].into();
    let only_b: HashSet<String> = ["rb".to_string()].into();
    let both: HashSet<String> = ["ra".to_string(), "rb".to_string()].into();

    let a = vehicles_at(&dataset, instant, Some(&only_a));
    let b = vehicles_at(&dataset, instant, Some(&only_b));
    let ab = vehicles_at(&dataset, instant, Some(&both));

    assert_eq!(a.keys().map(AsRef::as_ref).collect::<Vec<_>>(), vec!["ta"]);
    assert_eq!(b.keys().map(AsRef::as_ref).collect::<Vec<_>>(), vec!["tb"]);

    let union: Vec<&str> = a.keys().chain(b.keys()).map(AsRef::as_ref).collect();
    let combined: Vec<&str> = ab.keys().map(AsRef::as_ref).collect();
    assert_eq!(union, combined);

    // Unfiltered sweeps see both vehicles.
    assert_eq!(vehicles_at(&dataset, instant, None).len(), 2);
}
