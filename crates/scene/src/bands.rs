//! Per-sensor band reference tables and name resolution.
//!
//! Each sensor generation carries its own fixed file-suffix → long
//! name table, keyed by the MTL `SENSOR_ID`. The tables are static
//! reference data, initialized at compile time and never mutated.
//!
//! The ETM+ thermal channel is downlinked twice at different gain
//! settings; suffixes `B6_VCID_1` and `B6_VCID_2` are sub-band
//! variants of nominal band 6 and map to combined numbers 61 and 62.

use landsat_common::{LandsatError, LandsatResult};

/// Multispectral Scanner (Landsat 1–5), heritage band numbering.
const MSS_BANDS: &[(&str, &str)] = &[
    ("B4", "Green"),
    ("B5", "Red"),
    ("B6", "Near Infrared 1"),
    ("B7", "Near Infrared 2"),
    ("BQA", "Quality Assessment"),
];

/// Thematic Mapper (Landsat 4–5).
const TM_BANDS: &[(&str, &str)] = &[
    ("B1", "Blue"),
    ("B2", "Green"),
    ("B3", "Red"),
    ("B4", "Near Infrared (NIR)"),
    ("B5", "Shortwave Infrared 1"),
    ("B6", "Thermal Infrared"),
    ("B7", "Shortwave Infrared 2"),
    ("BQA", "Quality Assessment"),
];

/// Enhanced Thematic Mapper Plus (Landsat 7).
const ETM_BANDS: &[(&str, &str)] = &[
    ("B1", "Blue"),
    ("B2", "Green"),
    ("B3", "Red"),
    ("B4", "Near Infrared (NIR)"),
    ("B5", "Shortwave Infrared 1"),
    ("B6_VCID_1", "Low-gain Thermal Infrared"),
    ("B6_VCID_2", "High-gain Thermal Infrared"),
    ("B7", "Shortwave Infrared 2"),
    ("B8", "Panchromatic"),
    ("BQA", "Quality Assessment"),
];

/// Operational Land Imager + Thermal Infrared Sensor (Landsat 8).
const OLI_TIRS_BANDS: &[(&str, &str)] = &[
    ("B1", "Coastal Aerosol"),
    ("B2", "Blue"),
    ("B3", "Green"),
    ("B4", "Red"),
    ("B5", "Near Infrared (NIR)"),
    ("B6", "Shortwave Infrared 1"),
    ("B7", "Shortwave Infrared 2"),
    ("B8", "Panchromatic"),
    ("B9", "Cirrus"),
    ("B10", "Thermal Infrared 1"),
    ("B11", "Thermal Infrared 2"),
    ("BQA", "Quality Assessment"),
];

/// Suffix → long-name table for a sensor identifier.
pub fn band_table(sensor: &str) -> LandsatResult<&'static [(&'static str, &'static str)]> {
    match sensor {
        "MSS" => Ok(MSS_BANDS),
        "TM" => Ok(TM_BANDS),
        "ETM" => Ok(ETM_BANDS),
        "OLI_TIRS" => Ok(OLI_TIRS_BANDS),
        other => Err(LandsatError::SensorNotFound(other.to_string())),
    }
}

/// Long name of a band file suffix for a sensor.
pub fn long_name(sensor: &str, suffix: &str) -> LandsatResult<&'static str> {
    band_table(sensor)?
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|(_, name)| *name)
        .ok_or_else(|| LandsatError::BandNotFound(format!("{} ({})", suffix, sensor)))
}

/// Short band name, e.g. `Near Infrared (NIR)` becomes `nir` and
/// `Red` becomes `red`.
pub fn short_name(long_name: &str) -> String {
    let short = match (long_name.find('('), long_name.find(')')) {
        (Some(start), Some(end)) if start < end => &long_name[start + 1..end],
        _ => return long_name.replace([' ', '-'], "_").to_lowercase(),
    };
    short.to_lowercase()
}

/// Find the file suffix for a band name (long or short) on a sensor.
pub fn suffix_from_name(sensor: &str, name: &str) -> LandsatResult<&'static str> {
    for (suffix, long) in band_table(sensor)? {
        if name == *long || name == short_name(long) {
            return Ok(suffix);
        }
    }
    Err(LandsatError::BandNotFound(format!("{} ({})", name, sensor)))
}

/// Whether a file suffix denotes a spectral or quality band raster
/// with a band number (`B` followed by a digit).
pub fn is_band_suffix(suffix: &str) -> bool {
    let mut bytes = suffix.bytes();
    bytes.next() == Some(b'B') && bytes.next().is_some_and(|b| b.is_ascii_digit())
}

/// Numeric band identifier for a file suffix.
///
/// Split thermal sub-bands fold into combined identifiers:
/// `B6_VCID_1` is 61 and `B6_VCID_2` is 62.
pub fn band_number(suffix: &str) -> LandsatResult<u8> {
    if !is_band_suffix(suffix) {
        return Err(LandsatError::BandNotFound(format!(
            "suffix {} does not refer to a band",
            suffix
        )));
    }
    let rest = &suffix[1..];
    let parsed = if let Some((nominal, vcid)) = rest.split_once("_VCID_") {
        format!("{}{}", nominal, vcid).parse::<u8>()
    } else {
        rest.parse::<u8>()
    };
    parsed.map_err(|_| LandsatError::BandNotFound(format!("unparsable band suffix {}", suffix)))
}

/// File suffix for a numeric band identifier.
pub fn suffix_from_number(number: u8) -> String {
    match number {
        61 => "B6_VCID_1".to_string(),
        62 => "B6_VCID_2".to_string(),
        n => format!("B{}", n),
    }
}

/// Whether a band number is a thermal channel on the given sensor.
pub fn is_thermal(sensor: &str, number: u8) -> bool {
    match sensor {
        "TM" => number == 6,
        "ETM" => number == 61 || number == 62,
        "OLI_TIRS" => number == 10 || number == 11,
        _ => false,
    }
}

/// Whether a band number lies in the reflective spectrum on the
/// given sensor.
pub fn is_reflective(sensor: &str, number: u8) -> bool {
    !is_thermal(sensor, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Near Infrared (NIR)"), "nir");
        assert_eq!(short_name("Red"), "red");
        assert_eq!(short_name("Low-gain Thermal Infrared"), "low_gain_thermal_infrared");
        assert_eq!(short_name("Shortwave Infrared 1"), "shortwave_infrared_1");
    }

    #[test]
    fn test_suffix_from_name() {
        assert_eq!(suffix_from_name("TM", "red").unwrap(), "B3");
        assert_eq!(suffix_from_name("TM", "Red").unwrap(), "B3");
        assert_eq!(suffix_from_name("OLI_TIRS", "cirrus").unwrap(), "B9");
        assert!(suffix_from_name("TM", "cirrus").is_err());
        assert!(matches!(
            suffix_from_name("VIIRS", "red").unwrap_err(),
            LandsatError::SensorNotFound(_)
        ));
    }

    #[test]
    fn test_is_band_suffix() {
        assert!(is_band_suffix("B1"));
        assert!(is_band_suffix("B6_VCID_1"));
        assert!(!is_band_suffix("BQA"));
        assert!(!is_band_suffix("MTL"));
        assert!(!is_band_suffix("C1"));
    }

    #[test]
    fn test_band_number() {
        assert_eq!(band_number("B1").unwrap(), 1);
        assert_eq!(band_number("B10").unwrap(), 10);
        assert_eq!(band_number("B6_VCID_1").unwrap(), 61);
        assert_eq!(band_number("B6_VCID_2").unwrap(), 62);
        assert!(band_number("BQA").is_err());
    }

    #[test]
    fn test_suffix_number_round_trip() {
        for sensor in ["MSS", "TM", "ETM", "OLI_TIRS"] {
            for (suffix, _) in band_table(sensor).unwrap() {
                if !is_band_suffix(suffix) {
                    continue;
                }
                let number = band_number(suffix).unwrap();
                assert_eq!(suffix_from_number(number), *suffix);
            }
        }
    }

    #[test]
    fn test_name_suffix_round_trip() {
        for sensor in ["MSS", "TM", "ETM", "OLI_TIRS"] {
            for (suffix, long) in band_table(sensor).unwrap() {
                assert_eq!(suffix_from_name(sensor, long).unwrap(), *suffix);
                assert_eq!(long_name(sensor, suffix).unwrap(), *long);
            }
        }
    }

    #[test]
    fn test_thermal_domains() {
        assert!(is_thermal("TM", 6));
        assert!(is_thermal("ETM", 61));
        assert!(is_thermal("OLI_TIRS", 11));
        assert!(!is_thermal("OLI_TIRS", 5));
        assert!(!is_thermal("MSS", 6));
        assert!(is_reflective("OLI_TIRS", 5));
        assert!(!is_reflective("TM", 6));
    }
}
