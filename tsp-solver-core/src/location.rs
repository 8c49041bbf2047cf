use geo::Coord;

/// A place a vehicle must visit, or the depot it starts from.
///
/// Coordinates are WGS84 degrees. [`Location::coord`] maps them onto a
/// planar [`Coord`] with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use tsp_solver_core::Location;
///
/// let depot = Location::new(52.52, 13.405);
/// let coord = depot.coord();
/// assert_eq!(coord.x, 13.405);
/// assert_eq!(coord.y, 52.52);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Degrees north of the equator.
    pub latitude: f64,
    /// Degrees east of the prime meridian.
    pub longitude: f64,
}

impl Location {
    /// Construct a location from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Planar coordinate for distance computations.
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Whether both components are finite numbers.
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<Location> for Coord<f64> {
    fn from(location: Location) -> Self {
        location.coord()
    }
}
