//! Radiometric conversion of quantized and calibrated Digital
//! Numbers (DN) to top-of-atmosphere (TOA) radiance, reflectance or
//! brightness temperature.
//!
//! Pure elementwise transforms; band-specific calibration scalars
//! come from the scene's MTL document (see [`crate::scene::Band`]).

use ndarray::Array2;

/// Convert DN to TOA spectral radiance.
pub fn to_radiance(dn: &Array2<f64>, gain: f64, bias: f64) -> Array2<f64> {
    dn.mapv(|v| gain * v + bias)
}

/// Convert DN to TOA spectral reflectance, optionally correcting for
/// the sun elevation angle (degrees).
pub fn to_reflectance(
    dn: &Array2<f64>,
    gain: f64,
    bias: f64,
    sun_elevation: Option<f64>,
) -> Array2<f64> {
    let reflectance = dn.mapv(|v| gain * v + bias);
    match sun_elevation {
        Some(angle) => {
            let correction = angle.to_radians().sin();
            reflectance.mapv(|v| v / correction)
        }
        None => reflectance,
    }
}

/// Convert TOA spectral radiance to TOA brightness temperature using
/// the band-specific thermal constants K1 and K2.
pub fn to_brightness_temperature(radiance: &Array2<f64>, k1: f64, k2: f64) -> Array2<f64> {
    radiance.mapv(|r| k2 / (k1 / (r + 1.0)).ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_to_radiance() {
        let dn = array![[0.0, 100.0], [200.0, 255.0]];
        let radiance = to_radiance(&dn, 0.5, -1.0);
        assert_eq!(radiance, array![[-1.0, 49.0], [99.0, 126.5]]);
    }

    #[test]
    fn test_to_reflectance_sun_correction() {
        let dn = array![[1000.0]];
        let uncorrected = to_reflectance(&dn, 2.0e-5, -0.1, None);
        assert!((uncorrected[[0, 0]] - (-0.08)).abs() < 1e-12);

        // sin(30°) = 0.5, so the corrected value doubles.
        let corrected = to_reflectance(&dn, 2.0e-5, -0.1, Some(30.0));
        assert!((corrected[[0, 0]] - (-0.16)).abs() < 1e-12);
    }

    #[test]
    fn test_to_brightness_temperature() {
        // TM band 6 constants.
        let (k1, k2) = (607.76, 1260.56);
        let radiance = array![[10.0]];
        let bt = to_brightness_temperature(&radiance, k1, k2);
        let expected = k2 / (k1 / 11.0_f64).ln();
        assert!((bt[[0, 0]] - expected).abs() < 1e-9);
        // A plausible earth-surface temperature, in kelvins.
        assert!(bt[[0, 0]] > 250.0 && bt[[0, 0]] < 350.0);
    }
}
