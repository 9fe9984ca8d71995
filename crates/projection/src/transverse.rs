//! Ellipsoidal Transverse Mercator projection.
//!
//! This is the projection behind the UTM grid system that radar footprints
//! use. The series expansions follow Snyder, "Map Projections: A Working
//! Manual" (USGS PP 1395), equations 3-21, 8-9..8-13 (forward) and
//! 8-17..8-25 (inverse), on the WGS84 ellipsoid. Accuracy is well below a
//! millimeter inside a UTM zone, far tighter than the 1e-4 degree
//! tolerance the coordinate audit uses.

use std::f64::consts::PI;

/// WGS84 semi-major axis (meters).
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// UTM scale factor on the central meridian.
const UTM_K0: f64 = 0.9996;
/// UTM false easting (meters).
const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for the southern hemisphere (meters).
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Transverse Mercator projection parameters.
///
/// Constants that depend only on the ellipsoid are precomputed at
/// construction.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// Semi-major axis (meters)
    pub a: f64,
    /// First eccentricity squared
    e2: f64,
    /// Second eccentricity squared
    ep2: f64,
    /// Rectifying-latitude coefficient: a * (1 - e2/4 - 3e4/64 - 5e6/256)
    mu_denom: f64,
    /// Footpoint-latitude series constant e1
    e1: f64,
}

impl TransverseMercator {
    /// Create a projection with an arbitrary central meridian (degrees).
    pub fn new(lon0_deg: f64, k0: f64, false_easting: f64, false_northing: f64) -> Self {
        let a = WGS84_A;
        let f = WGS84_F;
        let e2 = f * (2.0 - f);
        let ep2 = e2 / (1.0 - e2);
        let mu_denom = a * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0);
        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);

        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            a,
            e2,
            ep2,
            mu_denom,
            e1,
        }
    }

    /// Create the projection for a UTM zone (1..=60).
    ///
    /// Central meridian is `zone * 6 - 183` degrees; northern-hemisphere
    /// zones have zero false northing.
    pub fn utm(zone: u8, north: bool) -> Self {
        let lon0_deg = f64::from(zone) * 6.0 - 183.0;
        let false_northing = if north { 0.0 } else { UTM_FALSE_NORTHING_SOUTH };
        Self::new(lon0_deg, UTM_K0, UTM_FALSE_EASTING, false_northing)
    }

    /// Meridian distance from the equator to latitude `phi` (radians).
    fn meridian_distance(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }

    /// Project geographic (lat, lon in degrees) to (easting, northing).
    pub fn geographic_to_projected(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let lam = lon_deg.to_radians();

        // Normalize longitude difference to [-pi, pi]
        let mut dlon = lam - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let tan_phi = phi.tan();

        let n = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a_term = cos_phi * dlon;
        let m = self.meridian_distance(phi);

        let a2 = a_term * a_term;
        let a3 = a2 * a_term;
        let a4 = a3 * a_term;
        let a5 = a4 * a_term;
        let a6 = a5 * a_term;

        let x = self.false_easting
            + self.k0
                * n
                * (a_term
                    + (1.0 - t + c) * a3 / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a5 / 120.0);

        let y = self.false_northing
            + self.k0
                * (m + n
                    * tan_phi
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a6
                            / 720.0));

        (x, y)
    }

    /// Invert (easting, northing) to geographic (lat, lon) in degrees.
    pub fn projected_to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let xp = x - self.false_easting;
        let yp = y - self.false_northing;

        // Footpoint latitude from the rectifying latitude mu
        let mu = yp / self.k0 / self.mu_denom;
        let e1 = self.e1;
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = self.ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let denom = 1.0 - self.e2 * sin_phi1 * sin_phi1;
        let n1 = self.a / denom.sqrt();
        let r1 = self.a * (1.0 - self.e2) / (denom * denom.sqrt());
        let d = xp / (n1 * self.k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2
                    + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_phi1;

        (lat.to_degrees(), lon.to_degrees())
    }
}
