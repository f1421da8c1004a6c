pub mod blob;
pub mod dataset;
pub mod gtfs;
pub mod resolver;
pub mod shared;
