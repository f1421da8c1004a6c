pub mod calendar;
pub mod position;

pub use calendar::{active_services, active_trips};
pub use position::{vehicles_at, vehicles_at_seconds, VehiclePosition, VehicleStatus};
