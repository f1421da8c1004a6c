mod common;

const CURVED_SHAPE: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled
sh1,59.30,18.00,1,99999
sh1,59.31,18.02,2,1
sh1,59.33,18.05,3,1
sh1,59.36,18.06,4,0
";

const CITY_STOPS: &str = "\
stop_id,stop_name,stop_desc,stop_lat,stop_lon
s1,First,main entrance,59.30,18.00
s2,Second,,59.33,18.05
s3,Third,,59.36,18.06
";

const CITY_ROUTES: &str = "\
route_id,route_short_name,route_long_name,route_type,route_color
r1,4,Blue Line,1,0000FF
";

const CITY_TRIPS: &str = "\
trip_id,route_id,service_id,shape_id,trip_headsign,direction_id
t1,r1,svc1,sh1,Northbound,0
";

const CITY_CALENDAR: &str = "\
service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
svc1,1,1,1,1,1,1,1,20250101,20251231
";

// Rows deliberately out of sequence order.
const CITY_STOP_TIMES: &str = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time,shape_dist_traveled
t1,s3,3,08:20:00,08:20:00,5
t1,s1,1,08:00:00,08:01:00,12345
t1,s2,2,08:10:00,08:11:00,7
";

fn city_dataset() -> headway::dataset::Dataset {
    common::load_dataset(&[
        ("shapes.txt", CURVED_SHAPE),
        ("stops.txt", CITY_STOPS),
        ("routes.txt", CITY_ROUTES),
        ("trips.txt", CITY_TRIPS),
        ("calendar.txt", CITY_CALENDAR),
        ("stop_times.txt", CITY_STOP_TIMES),
    ])
}

#[test]
fn cumulative_distances_start_at_zero_and_never_decrease() {
    let dataset = city_dataset();
    let shape = dataset.shape_by_id("sh1").unwrap();

    assert_eq!(shape.points[0].cumulative_distance.as_meters(), 0.0);
    for pair in shape.points.windows(2) {
        assert!(pair[0].cumulative_distance <= pair[1].cumulative_distance);
    }
    // The feed's shape_dist_traveled column is junk and must be ignored.
    assert!(shape.points[3].cumulative_distance.as_meters() > 1000.0);
}

#[test]
fn stop_times_are_ordered_and_anchored_to_the_shape() {
    let dataset = city_dataset();
    let trip = dataset.trip_by_id("t1").unwrap();
    let stop_times = dataset.stop_times_for(trip);

    assert_eq!(stop_times.len(), 3);
    for pair in stop_times.windows(2) {
        assert!(pair[0].stop_sequence < pair[1].stop_sequence);
        assert!(pair[0].arrival <= pair[0].departure);
        assert!(pair[0].departure <= pair[1].arrival);
        assert!(pair[0].shape_dist <= pair[1].shape_dist);
    }

    // Stops sit exactly on shape points here, so the derived distances
    // must equal the cumulative distances of those points.
    let shape = dataset.shape_by_id("sh1").unwrap();
    assert_eq!(stop_times[0].shape_dist, shape.points[0].cumulative_distance);
    assert_eq!(stop_times[1].shape_dist, shape.points[2].cumulative_distance);
    assert_eq!(stop_times[2].shape_dist, shape.points[3].cumulative_distance);
}

#[test]
fn trip_without_shape_gets_stop_to_stop_distances() {
    let trips = "\
trip_id,route_id,service_id
t2,r1,svc1
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t2,s1,1,08:00:00,08:00:00
t2,s2,2,08:10:00,08:10:00
t2,s3,3,08:20:00,08:20:00
";
    let dataset = common::load_dataset(&[
        ("stops.txt", CITY_STOPS),
        ("trips.txt", trips),
        ("calendar.txt", CITY_CALENDAR),
        ("stop_times.txt", stop_times),
    ]);

    let trip = dataset.trip_by_id("t2").unwrap();
    let stop_times = dataset.stop_times_for(trip);
    assert_eq!(stop_times[0].shape_dist.as_meters(), 0.0);

    let first = dataset.stop_by_id("s1").unwrap().coordinate;
    let second = dataset.stop_by_id("s2").unwrap().coordinate;
    assert_eq!(stop_times[1].shape_dist, first.haversine_distance(&second));
    assert!(stop_times[2].shape_dist > stop_times[1].shape_dist);
}

#[test]
fn unknown_shape_reference_falls_back_to_stop_distances() {
    let trips = "\
trip_id,route_id,service_id,shape_id
t3,r1,svc1,missing
";
    let stop_times = "\
trip_id,stop_id,stop_sequence,arrival_time,departure_time
t3,s1,1,08:00:00,08:00:00
t3,s2,2,08:10:00,08:10:00
";
    let dataset = common::load_dataset(&[
        ("stops.txt", CITY_STOPS),
        ("trips.txt", trips),
        ("calendar.txt", CITY_CALENDAR),
        ("stop_times.txt", stop_times),
    ]);

    let trip = dataset.trip_by_id("t3").unwrap();
    let stop_times = dataset.stop_times_for(trip);
    assert_eq!(stop_times[0].shape_dist.as_meters(), 0.0);
    assert!(stop_times[1].shape_dist.as_meters() > 0.0);
}

#[test]
fn missing_tables_leave_empty_indexes() {
    let dataset = common::load_dataset(&[]);
    let counts = dataset.counts();

    assert_eq!(counts.shapes, 0);
    assert_eq!(counts.stops, 0);
    assert_eq!(counts.routes, 0);
    assert_eq!(counts.trips, 0);
    assert_eq!(counts.stop_times, 0);
    assert_eq!(counts.calendars, 0);
    assert_eq!(counts.calendar_dates, 0);
    assert!(dataset.trip_by_id("t1").is_none());
}

#[test]
fn counts_reflect_loaded_rows() {
    let dataset = city_dataset();
    let counts = dataset.counts();

    assert_eq!(counts.shapes, 1);
    assert_eq!(counts.stops, 3);
    assert_eq!(counts.routes, 1);
    assert_eq!(counts.trips, 1);
    assert_eq!(counts.stop_times, 3);
    assert_eq!(counts.calendars, 1);
    assert_eq!(counts.calendar_dates, 0);
}

#[test]
fn descriptive_fields_survive_the_load() {
    let dataset = city_dataset();

    let stop = dataset.stop_by_id("s1").unwrap();
    assert_eq!(stop.name.as_ref(), "First");
    assert_eq!(stop.description.as_ref(), "main entrance");

    let route = dataset.route_by_id("r1").unwrap();
    assert_eq!(route.long_name.as_ref(), "Blue Line");
    assert_eq!(route.route_type, 1);
    assert_eq!(route.color.as_ref(), "0000FF");
    // Column absent from the feed reads as empty, never an error.
    assert_eq!(route.text_color.as_ref(), "");

    let trip = dataset.trip_by_id("t1").unwrap();
    assert_eq!(trip.headsign.as_ref(), "Northbound");
    assert_eq!(trip.direction_id, Some(0));
    assert_eq!(trip.shape_id.as_deref(), Some("sh1"));
}
