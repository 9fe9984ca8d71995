//! Signal-to-rainfall-rate estimation.
//!
//! Counts encode reflectivity at 0.5 dBZ per count with a -32 dBZ offset;
//! reflectivity converts to rain rate through the Marshall-Palmer
//! relation Z = 200 * R^1.6. A zero count is the radar's no-echo level and
//! reports zero rain. The product pipeline applies the same conversion, so
//! the audit only requires the two sides to agree.

use radar_common::MaskedGrid;

/// dBZ per 8-bit count.
const DBZ_GAIN: f64 = 0.5;
/// dBZ at count zero.
const DBZ_OFFSET: f64 = -32.0;
/// Marshall-Palmer multiplier.
const ZR_A: f64 = 200.0;
/// Marshall-Palmer exponent.
const ZR_B: f64 = 1.6;

/// Convert a masked signal grid to rainfall rate in mm/h.
///
/// Masked cells stay masked.
pub fn estimate_rainfall(signal: &MaskedGrid) -> MaskedGrid {
    signal.map(|count| {
        if count <= 0.0 {
            return 0.0;
        }
        let dbz = count * DBZ_GAIN + DBZ_OFFSET;
        let z = 10f64.powf(dbz / 10.0);
        (z / ZR_A).powf(1.0 / ZR_B)
    })
}
