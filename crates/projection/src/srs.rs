//! Spatial reference system identifiers.

use std::fmt;

/// Spatial reference systems the checker can reproject from.
///
/// Radar footprints are gridded in UTM on the WGS84 ellipsoid; geographic
/// WGS84 is accepted as a degenerate case (identity transform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialRef {
    /// WGS84 geographic (EPSG:4326), lat/lon in degrees.
    Geographic,
    /// UTM on WGS84: EPSG:326xx (north) / EPSG:327xx (south).
    UtmWgs84 { zone: u8, north: bool },
}

impl SpatialRef {
    /// Build from a numeric EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, SrsError> {
        match code {
            4326 => Ok(SpatialRef::Geographic),
            32601..=32660 => Ok(SpatialRef::UtmWgs84 {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(SpatialRef::UtmWgs84 {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(SrsError::Unsupported(code)),
        }
    }

    /// Parse an authority string like `"EPSG:32632"` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, SrsError> {
        let (authority, code) = s
            .split_once(':')
            .ok_or_else(|| SrsError::BadFormat(s.to_string()))?;
        if !authority.eq_ignore_ascii_case("epsg") {
            return Err(SrsError::BadFormat(s.to_string()));
        }
        let code: u32 = code
            .trim()
            .parse()
            .map_err(|_| SrsError::BadFormat(s.to_string()))?;
        Self::from_epsg(code)
    }

    /// The EPSG code of this reference system.
    pub fn epsg(&self) -> u32 {
        match self {
            SpatialRef::Geographic => 4326,
            SpatialRef::UtmWgs84 { zone, north: true } => 32600 + u32::from(*zone),
            SpatialRef::UtmWgs84 { zone, north: false } => 32700 + u32::from(*zone),
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, SpatialRef::Geographic)
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    #[error("spatial reference string '{0}' is not of the form EPSG:<code>")]
    BadFormat(String),

    #[error("unsupported EPSG code: {0}")]
    Unsupported(u32),
}
