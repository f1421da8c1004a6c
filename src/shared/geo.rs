use std::{
    cmp,
    fmt::Display,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every great-circle computation.
pub const EARTH_RADIUS: Distance = Distance::from_meters(6_371_000.0);

#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Self {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

impl Coordinate {
    pub fn haversine_distance(&self, coord: &Self) -> Distance {
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_meters(EARTH_RADIUS.as_meters() * c)
    }

    /// Point at `fraction` of the way towards `coord`, component-wise.
    /// Shape segments are short enough that linear interpolation stays
    /// within a metre of the great-circle arc.
    pub fn interpolate(&self, coord: &Self, fraction: f64) -> Self {
        Self {
            latitude: self.latitude + (coord.latitude - self.latitude) * fraction,
            longitude: self.longitude + (coord.longitude - self.longitude) * fraction,
        }
    }
}

#[test]
fn haversine_paris_london_test() {
    let coord_a = Coordinate {
        latitude: 48.85800943005911,
        longitude: 2.3514350059357927,
    };

    let coord_b = Coordinate {
        latitude: 51.5052389927712,
        longitude: -0.12495407345099824,
    };
    let d = coord_a.haversine_distance(&coord_b);
    assert!((d.as_kilometers() - 343.0).abs() < 2.0);
}

#[test]
fn haversine_zero_test() {
    let coord = Coordinate {
        latitude: 59.3293,
        longitude: 18.0686,
    };
    assert_eq!(coord.haversine_distance(&coord).as_meters(), 0.0);
}

#[test]
fn interpolate_midpoint_test() {
    let coord_a = Coordinate {
        latitude: 0.0,
        longitude: 0.0,
    };
    let coord_b = Coordinate {
        latitude: 0.0,
        longitude: 1.0,
    };
    let mid = coord_a.interpolate(&coord_b, 0.5);
    assert_eq!(mid.latitude, 0.0);
    assert_eq!(mid.longitude, 0.5);
}

#[test]
fn interpolate_endpoints_test() {
    let coord_a = Coordinate {
        latitude: 10.0,
        longitude: 20.0,
    };
    let coord_b = Coordinate {
        latitude: 11.0,
        longitude: 21.0,
    };
    assert_eq!(coord_a.interpolate(&coord_b, 0.0), coord_a);
    assert_eq!(coord_a.interpolate(&coord_b, 1.0), coord_b);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}
