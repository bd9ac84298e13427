//! Scene and band access backed by a downloaded product directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ndarray::Array2;
use tracing::debug;

use landsat_common::{LandsatError, LandsatResult};

use crate::bands;
use crate::mtl::MtlDocument;
use crate::radiometry;

/// A Landsat Level-1 scene directory.
///
/// The MTL document is parsed once at construction and read-only
/// afterwards; bands are resolved on demand from the directory
/// listing and the sensor's reference table.
#[derive(Debug)]
pub struct Scene {
    dir: PathBuf,
    files: Vec<String>,
    mtl: MtlDocument,
}

impl Scene {
    /// Open a scene directory and parse its MTL metadata file.
    pub fn open(dir: impl AsRef<Path>) -> LandsatResult<Self> {
        let dir = dir.as_ref().to_path_buf();

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(".TIF") || name.ends_with(".tif") || name.ends_with(".txt") {
                files.push(name.to_string());
            }
        }
        files.sort();

        let mtl_name = files
            .iter()
            .find(|f| suffix_from_file_name(f) == "MTL")
            .ok_or_else(|| LandsatError::FileNotFound("MTL".to_string()))?;
        let text = fs::read_to_string(dir.join(mtl_name))?;
        let mtl = MtlDocument::parse(&text)?;

        debug!(dir = %dir.display(), files = files.len(), "Opened scene");
        Ok(Self { dir, files, mtl })
    }

    /// Parsed MTL metadata.
    pub fn mtl(&self) -> &MtlDocument {
        &self.mtl
    }

    /// Landsat scene identifier.
    pub fn scene_id(&self) -> LandsatResult<&str> {
        self.mtl.str_value("METADATA_FILE_INFO", "SCENE_ID")
    }

    /// Landsat product identifier.
    pub fn product_id(&self) -> LandsatResult<&str> {
        self.mtl.str_value("METADATA_FILE_INFO", "PRODUCT_ID")
    }

    /// Spacecraft identifier, e.g. `LANDSAT_5`.
    pub fn spacecraft(&self) -> LandsatResult<&str> {
        self.mtl.str_value("PRODUCT_METADATA", "SPACECRAFT_ID")
    }

    /// Sensor identifier, e.g. `TM`.
    pub fn sensor(&self) -> LandsatResult<&str> {
        self.mtl.str_value("PRODUCT_METADATA", "SENSOR_ID")
    }

    /// Acquisition date.
    pub fn acquisition_date(&self) -> LandsatResult<NaiveDate> {
        let raw = self.mtl.str_value("PRODUCT_METADATA", "DATE_ACQUIRED")?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| LandsatError::InvalidDate(raw.to_string()))
    }

    /// WRS-2 path.
    pub fn wrs_path(&self) -> LandsatResult<i64> {
        self.mtl.i64_value("PRODUCT_METADATA", "WRS_PATH")
    }

    /// WRS-2 row.
    pub fn wrs_row(&self) -> LandsatResult<i64> {
        self.mtl.i64_value("PRODUCT_METADATA", "WRS_ROW")
    }

    /// Sun elevation angle at acquisition, in degrees.
    pub fn sun_elevation(&self) -> LandsatResult<f64> {
        self.mtl.f64_value("IMAGE_ATTRIBUTES", "SUN_ELEVATION")
    }

    /// Raster and metadata files present in the scene directory.
    pub fn available_files(&self) -> &[String] {
        &self.files
    }

    /// Short names of the bands present in the scene directory.
    pub fn available_bands(&self) -> LandsatResult<Vec<String>> {
        let sensor = self.sensor()?;
        let mut names = Vec::new();
        for file in &self.files {
            let suffix = suffix_from_file_name(file);
            if bands::is_band_suffix(suffix) {
                names.push(bands::short_name(bands::long_name(sensor, suffix)?));
            }
        }
        Ok(names)
    }

    /// Path of the scene file with the given suffix.
    pub fn file_path(&self, suffix: &str) -> LandsatResult<PathBuf> {
        self.files
            .iter()
            .find(|f| suffix_from_file_name(f) == suffix)
            .map(|f| self.dir.join(f))
            .ok_or_else(|| LandsatError::FileNotFound(suffix.to_string()))
    }

    /// Look up a band by long or short name.
    pub fn band(&self, name: &str) -> LandsatResult<Band<'_>> {
        let suffix = bands::suffix_from_name(self.sensor()?, name)?;
        self.band_from_suffix(suffix)
    }

    /// The quality assessment band.
    pub fn quality(&self) -> LandsatResult<Band<'_>> {
        self.band_from_suffix("BQA")
    }

    fn band_from_suffix(&self, suffix: &str) -> LandsatResult<Band<'_>> {
        let long_name = bands::long_name(self.sensor()?, suffix)?;
        let number = if bands::is_band_suffix(suffix) {
            Some(bands::band_number(suffix)?)
        } else {
            None
        };
        Ok(Band {
            scene: self,
            path: self.file_path(suffix)?,
            name: bands::short_name(long_name),
            suffix: suffix.to_string(),
            long_name,
            number,
        })
    }
}

/// One spectral or quality channel of a scene.
#[derive(Debug)]
pub struct Band<'a> {
    scene: &'a Scene,
    pub suffix: String,
    pub long_name: &'static str,
    /// Short name, e.g. `nir`.
    pub name: String,
    /// Combined numeric identifier; `None` for the quality band.
    pub number: Option<u8>,
    /// Path of the band's raster file.
    pub path: PathBuf,
}

impl Band<'_> {
    /// MTL key fragment for this band, e.g. `4` or `6_VCID_1`.
    fn key_fragment(&self) -> &str {
        self.suffix.strip_prefix('B').unwrap_or(&self.suffix)
    }

    /// Band-specific radiometric rescaling factors (gain, bias).
    /// `unit` is `RADIANCE` or `REFLECTANCE`.
    fn rescaling(&self, unit: &str) -> LandsatResult<(f64, f64)> {
        let fragment = self.key_fragment();
        let gain = self.scene.mtl.f64_value(
            "RADIOMETRIC_RESCALING",
            &format!("{}_MULT_BAND_{}", unit, fragment),
        )?;
        let bias = self.scene.mtl.f64_value(
            "RADIOMETRIC_RESCALING",
            &format!("{}_ADD_BAND_{}", unit, fragment),
        )?;
        Ok((gain, bias))
    }

    /// Band-specific thermal constants (K1, K2).
    fn thermal_constants(&self) -> LandsatResult<(f64, f64)> {
        let fragment = self.key_fragment();
        let k1 = self.scene.mtl.f64_value(
            "THERMAL_CONSTANTS",
            &format!("K1_CONSTANT_BAND_{}", fragment),
        )?;
        let k2 = self.scene.mtl.f64_value(
            "THERMAL_CONSTANTS",
            &format!("K2_CONSTANT_BAND_{}", fragment),
        )?;
        Ok((k1, k2))
    }

    fn is_thermal(&self) -> LandsatResult<bool> {
        let sensor = self.scene.sensor()?;
        Ok(self
            .number
            .is_some_and(|n| bands::is_thermal(sensor, n)))
    }

    /// Convert DN values to TOA spectral radiance.
    pub fn to_radiance(&self, dn: &Array2<f64>) -> LandsatResult<Array2<f64>> {
        let (gain, bias) = self.rescaling("RADIANCE")?;
        Ok(radiometry::to_radiance(dn, gain, bias))
    }

    /// Convert DN values to TOA spectral reflectance.
    ///
    /// Fails for bands outside the reflective spectrum.
    pub fn to_reflectance(
        &self,
        dn: &Array2<f64>,
        sun_elevation: Option<f64>,
    ) -> LandsatResult<Array2<f64>> {
        if self.number.is_none() || self.is_thermal()? {
            return Err(LandsatError::NotReflective(self.name.clone()));
        }
        let (gain, bias) = self.rescaling("REFLECTANCE")?;
        Ok(radiometry::to_reflectance(dn, gain, bias, sun_elevation))
    }

    /// Convert DN values to TOA brightness temperature.
    ///
    /// Fails for non-thermal bands.
    pub fn to_brightness_temperature(&self, dn: &Array2<f64>) -> LandsatResult<Array2<f64>> {
        if !self.is_thermal()? {
            return Err(LandsatError::NotThermal(self.name.clone()));
        }
        let radiance = self.to_radiance(dn)?;
        let (k1, k2) = self.thermal_constants()?;
        Ok(radiometry::to_brightness_temperature(&radiance, k1, k2))
    }
}

/// File suffix from a scene file name.
///
/// Product identifiers are always 40 characters, so the suffix is
/// whatever sits between the 41st character of the stem and the
/// extension, e.g. `B6_VCID_1` in
/// `LE07_L1TP_195049_20000422_20170212_01_T1_B6_VCID_1.TIF`.
pub fn suffix_from_file_name(file_name: &str) -> &str {
    let base = file_name
        .rsplit(['/', std::path::MAIN_SEPARATOR])
        .next()
        .unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or(base);
    stem.get(41..).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_from_file_name() {
        assert_eq!(
            suffix_from_file_name("LC08_L1GT_044034_20130330_20170310_01_T2_B4.TIF"),
            "B4"
        );
        assert_eq!(
            suffix_from_file_name("LE07_L1TP_195049_20000422_20170212_01_T1_B6_VCID_1.TIF"),
            "B6_VCID_1"
        );
        assert_eq!(
            suffix_from_file_name("some/dir/LC08_L1GT_044034_20130330_20170310_01_T2_MTL.txt"),
            "MTL"
        );
        assert_eq!(suffix_from_file_name("short.txt"), "");
    }
}
