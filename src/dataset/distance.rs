use crate::shared::geo::{Coordinate, Distance};

use super::{ShapePoint, Stop, StopTime};

/// Running great-circle distances over an ordered polyline. The first
/// point sits at distance zero.
pub(crate) fn accumulate(coordinates: &[Coordinate]) -> Vec<ShapePoint> {
    let mut points = Vec::with_capacity(coordinates.len());
    let mut total = Distance::default();
    for (i, coordinate) in coordinates.iter().enumerate() {
        if i > 0 {
            total = total + coordinates[i - 1].haversine_distance(coordinate);
        }
        points.push(ShapePoint {
            coordinate: *coordinate,
            cumulative_distance: total,
        });
    }
    points
}

/// Index of the shape point geographically closest to `target`; ties keep
/// the earliest point.
pub(crate) fn nearest_point(points: &[ShapePoint], target: &Coordinate) -> Option<usize> {
    let mut best: Option<(usize, Distance)> = None;
    for (i, point) in points.iter().enumerate() {
        let distance = point.coordinate.haversine_distance(target);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Anchors each stop of one trip into the shared distance system. With a
/// shape available every stop snaps to its nearest shape point; without
/// one the distances fall back to the running stop-to-stop sum.
pub(crate) fn assign_shape_distances(
    stop_times: &mut [StopTime],
    stops: &[Stop],
    shape: Option<&[ShapePoint]>,
) {
    match shape {
        Some(points) => {
            for stop_time in stop_times.iter_mut() {
                let stop = &stops[stop_time.stop_idx as usize];
                if let Some(index) = nearest_point(points, &stop.coordinate) {
                    stop_time.shape_dist = points[index].cumulative_distance;
                }
            }
        }
        None => {
            let mut total = Distance::default();
            let mut previous: Option<Coordinate> = None;
            for stop_time in stop_times.iter_mut() {
                let coordinate = stops[stop_time.stop_idx as usize].coordinate;
                if let Some(previous) = previous {
                    total = total + previous.haversine_distance(&coordinate);
                }
                stop_time.shape_dist = total;
                previous = Some(coordinate);
            }
        }
    }
}
