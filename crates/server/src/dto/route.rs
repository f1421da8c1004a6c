use headway::dataset::Route;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RouteDto {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_type: i32,
    pub route_color: String,
    pub route_text_color: String,
}

impl RouteDto {
    pub fn from(route: &Route) -> Self {
        Self {
            route_id: route.id.to_string(),
            route_short_name: route.short_name.to_string(),
            route_long_name: route.long_name.to_string(),
            route_type: route.route_type,
            route_color: route.color.to_string(),
            route_text_color: route.text_color.to_string(),
        }
    }
}
