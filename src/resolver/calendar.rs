use std::{collections::HashSet, sync::Arc};

use chrono::{Datelike, NaiveDate};

use crate::dataset::{Dataset, ExceptionKind};

/// Service ids running on `date`: every calendar whose validity range
/// covers the date and whose weekday flag is set, overlaid with the
/// per-date exceptions (added services join, removed services leave).
///
/// The weekday index is chrono's days-from-Sunday on the proleptic
/// Gregorian calendar, which matches the column order of the feed and is
/// independent of the host locale.
pub fn active_services(dataset: &Dataset, date: NaiveDate) -> HashSet<Arc<str>> {
    let weekday = date.weekday().num_days_from_sunday() as usize;
    let mut services: HashSet<Arc<str>> = dataset
        .calendars()
        .iter()
        .filter(|calendar| {
            calendar.start_date <= date
                && date <= calendar.end_date
                && calendar.weekdays[weekday]
        })
        .map(|calendar| calendar.service_id.clone())
        .collect();

    for (service_id, kind) in dataset.exceptions_on(date) {
        match kind {
            ExceptionKind::Added => {
                services.insert(service_id.clone());
            }
            ExceptionKind::Removed => {
                services.remove(service_id);
            }
        }
    }
    services
}

/// Indices of the trips bound to the services running on `date`, in
/// stable trip order.
pub fn active_trips(dataset: &Dataset, date: NaiveDate) -> Vec<u32> {
    let services = active_services(dataset, date);
    let mut trips: Vec<u32> = services
        .iter()
        .flat_map(|service_id| dataset.trips_for_service(service_id))
        .copied()
        .collect();
    trips.sort_unstable();
    trips
}
