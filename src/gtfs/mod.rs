use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::blob::{BlobError, BlobSource};

mod config;
pub mod models;
pub use config::*;
use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("blob source error: {0}")]
    Blob(#[from] BlobError),
    #[error("csv error in {file}: {source}")]
    Csv { file: String, source: csv::Error },
}

/// Streaming access to the tables of one GTFS feed over a blob source.
///
/// Each `stream_*` call parses its table row by row and hands every record
/// to the callback; nothing is buffered beyond the parser state. The
/// returned flag is `false` when the table file is absent from the feed.
pub struct Gtfs {
    source: Box<dyn BlobSource>,
    config: Config,
}

impl Gtfs {
    pub fn new(source: Box<dyn BlobSource>) -> Self {
        Self {
            source,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn stream_shapes<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsShapePoint),
    {
        self.stream_table(&self.config.shapes_path, f)
    }

    pub fn stream_stops<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsStop),
    {
        self.stream_table(&self.config.stops_path, f)
    }

    pub fn stream_routes<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsRoute),
    {
        self.stream_table(&self.config.routes_path, f)
    }

    pub fn stream_trips<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsTrip),
    {
        self.stream_table(&self.config.trips_path, f)
    }

    pub fn stream_calendar<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsCalendar),
    {
        self.stream_table(&self.config.calendar_path, f)
    }

    pub fn stream_calendar_dates<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsCalendarDate),
    {
        self.stream_table(&self.config.calendar_dates_path, f)
    }

    pub fn stream_stop_times<F>(&self, f: F) -> Result<bool, Error>
    where
        F: FnMut(GtfsStopTime),
    {
        self.stream_table(&self.config.stop_times_path, f)
    }

    fn stream_table<T, F>(&self, name: &str, mut f: F) -> Result<bool, Error>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        if !self.source.exists(name)? {
            return Ok(false);
        }
        let reader = self.source.open(name)?;
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        for record in rdr.deserialize::<T>() {
            match record {
                Ok(row) => f(row),
                // A broken transport surfaces; a malformed row does not.
                Err(err) if err.is_io_error() => {
                    return Err(Error::Csv {
                        file: name.to_string(),
                        source: err,
                    })
                }
                Err(err) => warn!(file = name, "skipping malformed row: {err}"),
            }
        }
        Ok(true)
    }
}
