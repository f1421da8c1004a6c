use geojson::{Feature, Geometry, JsonObject, Value};
use headway::{
    dataset::{Dataset, Shape, Stop},
    resolver::{VehiclePosition, VehicleStatus},
    shared::geo::Coordinate,
};
use serde_json::json;

use super::RouteDto;

/// GeoJSON positions are `[longitude, latitude]`.
fn position(coordinate: &Coordinate) -> Vec<f64> {
    vec![coordinate.longitude, coordinate.latitude]
}

pub fn shape_feature(shape: &Shape) -> Feature {
    let line = shape
        .points
        .iter()
        .map(|point| position(&point.coordinate))
        .collect();
    let mut properties = JsonObject::new();
    properties.insert("shape_id".into(), json!(shape.id.as_ref()));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn stop_feature(stop: &Stop) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("stop_id".into(), json!(stop.id.as_ref()));
    properties.insert("stop_name".into(), json!(stop.name.as_ref()));
    properties.insert("stop_desc".into(), json!(stop.description.as_ref()));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(position(&stop.coordinate)))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn vehicle_feature(
    dataset: &Dataset,
    vehicle: &VehiclePosition,
) -> Result<Feature, serde_json::Error> {
    let trip = dataset.trip(vehicle.trip_idx);
    let route = match dataset.route_by_id(&trip.route_id) {
        Some(route) => serde_json::to_value(RouteDto::from(route))?,
        None => serde_json::Value::Null,
    };

    let mut properties = JsonObject::new();
    properties.insert("trip_id".into(), json!(trip.id.as_ref()));
    properties.insert("route".into(), route);
    properties.insert(
        "shape_dist_traveled".into(),
        json!(vehicle.shape_dist.as_meters()),
    );
    match &vehicle.status {
        VehicleStatus::AtStop { stop_idx } => {
            let stop = dataset.stop(*stop_idx);
            properties.insert("stop_id".into(), json!(stop.id.as_ref()));
            properties.insert("stop_name".into(), json!(stop.name.as_ref()));
            properties.insert("status".into(), json!("at_stop"));
        }
        VehicleStatus::InTransit {
            from_stop_idx,
            to_stop_idx,
        } => {
            properties.insert(
                "from_stop_id".into(),
                json!(dataset.stop(*from_stop_idx).id.as_ref()),
            );
            properties.insert(
                "to_stop_id".into(),
                json!(dataset.stop(*to_stop_idx).id.as_ref()),
            );
            properties.insert("status".into(), json!("in_transit"));
        }
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(position(&vehicle.coordinate)))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}
