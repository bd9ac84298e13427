//! Scene directory tests over a synthetic TM product.

use std::fs;

use chrono::NaiveDate;
use ndarray::array;
use tempfile::TempDir;

use landsat_common::LandsatError;
use scene::Scene;

const PRODUCT_ID: &str = "LT05_L1GS_030025_19860927_20161003_01_T2";

const MTL: &str = r#"GROUP = L1_METADATA_FILE
  GROUP = METADATA_FILE_INFO
    SCENE_ID = "LT50300251986270XXX01"
    PRODUCT_ID = "LT05_L1GS_030025_19860927_20161003_01_T2"
  END_GROUP = METADATA_FILE_INFO
  GROUP = PRODUCT_METADATA
    SPACECRAFT_ID = "LANDSAT_5"
    SENSOR_ID = "TM"
    DATE_ACQUIRED = 1986-09-27
    WRS_PATH = 30
    WRS_ROW = 25
  END_GROUP = PRODUCT_METADATA
  GROUP = IMAGE_ATTRIBUTES
    SUN_ELEVATION = 30.0
    CLOUD_COVER = 20.00
  END_GROUP = IMAGE_ATTRIBUTES
  GROUP = RADIOMETRIC_RESCALING
    RADIANCE_MULT_BAND_3 = 1.0440
    RADIANCE_ADD_BAND_3 = -2.21398
    RADIANCE_MULT_BAND_4 = 0.87602
    RADIANCE_ADD_BAND_4 = -2.38602
    RADIANCE_MULT_BAND_6 = 0.055375
    RADIANCE_ADD_BAND_6 = 1.18243
    REFLECTANCE_MULT_BAND_3 = 1.0000E-03
    REFLECTANCE_ADD_BAND_3 = -0.10000
    REFLECTANCE_MULT_BAND_4 = 2.0000E-03
    REFLECTANCE_ADD_BAND_4 = -0.20000
  END_GROUP = RADIOMETRIC_RESCALING
  GROUP = THERMAL_CONSTANTS
    K1_CONSTANT_BAND_6 = 607.76
    K2_CONSTANT_BAND_6 = 1260.56
  END_GROUP = THERMAL_CONSTANTS
END_GROUP = L1_METADATA_FILE
END
"#;

fn sample_scene() -> (TempDir, Scene) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{}_MTL.txt", PRODUCT_ID)), MTL).unwrap();
    for suffix in ["B3", "B4", "B6", "BQA"] {
        fs::write(dir.path().join(format!("{}_{}.TIF", PRODUCT_ID, suffix)), b"").unwrap();
    }
    let scene = Scene::open(dir.path()).unwrap();
    (dir, scene)
}

#[test]
fn test_open_and_metadata() {
    let (_dir, scene) = sample_scene();
    assert_eq!(scene.scene_id().unwrap(), "LT50300251986270XXX01");
    assert_eq!(scene.product_id().unwrap(), PRODUCT_ID);
    assert_eq!(scene.spacecraft().unwrap(), "LANDSAT_5");
    assert_eq!(scene.sensor().unwrap(), "TM");
    assert_eq!(
        scene.acquisition_date().unwrap(),
        NaiveDate::from_ymd_opt(1986, 9, 27).unwrap()
    );
    assert_eq!(scene.wrs_path().unwrap(), 30);
    assert_eq!(scene.wrs_row().unwrap(), 25);
    assert_eq!(scene.sun_elevation().unwrap(), 30.0);
}

#[test]
fn test_open_without_mtl_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{}_B4.TIF", PRODUCT_ID)), b"").unwrap();
    let err = Scene::open(dir.path()).unwrap_err();
    assert!(matches!(err, LandsatError::FileNotFound(_)));
}

#[test]
fn test_available_bands() {
    let (_dir, scene) = sample_scene();
    let mut names = scene.available_bands().unwrap();
    names.sort();
    assert_eq!(names, vec!["nir", "red", "thermal_infrared"]);
}

#[test]
fn test_file_path_lookup() {
    let (_dir, scene) = sample_scene();
    let path = scene.file_path("MTL").unwrap();
    assert!(path.ends_with(format!("{}_MTL.txt", PRODUCT_ID)));
    assert!(matches!(
        scene.file_path("B9").unwrap_err(),
        LandsatError::FileNotFound(_)
    ));
}

#[test]
fn test_band_lookup() {
    let (_dir, scene) = sample_scene();

    let nir = scene.band("nir").unwrap();
    assert_eq!(nir.suffix, "B4");
    assert_eq!(nir.long_name, "Near Infrared (NIR)");
    assert_eq!(nir.name, "nir");
    assert_eq!(nir.number, Some(4));

    // Long names resolve too.
    let red = scene.band("Red").unwrap();
    assert_eq!(red.suffix, "B3");

    // Declared for the sensor but absent from the directory.
    assert!(matches!(
        scene.band("blue").unwrap_err(),
        LandsatError::FileNotFound(_)
    ));

    // Unknown for the sensor entirely.
    assert!(matches!(
        scene.band("cirrus").unwrap_err(),
        LandsatError::BandNotFound(_)
    ));
}

#[test]
fn test_quality_band() {
    let (_dir, scene) = sample_scene();
    let qa = scene.quality().unwrap();
    assert_eq!(qa.suffix, "BQA");
    assert_eq!(qa.number, None);
}

#[test]
fn test_to_radiance_uses_mtl_scalars() {
    let (_dir, scene) = sample_scene();
    let red = scene.band("red").unwrap();
    let dn = array![[0.0, 100.0]];
    let radiance = red.to_radiance(&dn).unwrap();
    assert!((radiance[[0, 0]] - (-2.21398)).abs() < 1e-9);
    assert!((radiance[[0, 1]] - (1.0440 * 100.0 - 2.21398)).abs() < 1e-9);
}

#[test]
fn test_to_reflectance_with_sun_elevation() {
    let (_dir, scene) = sample_scene();
    let nir = scene.band("nir").unwrap();
    let dn = array![[500.0]];

    let flat = nir.to_reflectance(&dn, None).unwrap();
    assert!((flat[[0, 0]] - 0.8).abs() < 1e-9);

    // sin(30°) = 0.5 doubles the value.
    let corrected = nir
        .to_reflectance(&dn, Some(scene.sun_elevation().unwrap()))
        .unwrap();
    assert!((corrected[[0, 0]] - 1.6).abs() < 1e-9);
}

#[test]
fn test_reflectance_rejected_for_thermal_band() {
    let (_dir, scene) = sample_scene();
    let thermal = scene.band("thermal_infrared").unwrap();
    let dn = array![[100.0]];
    assert!(matches!(
        thermal.to_reflectance(&dn, None).unwrap_err(),
        LandsatError::NotReflective(_)
    ));
}

#[test]
fn test_brightness_temperature_for_thermal_band() {
    let (_dir, scene) = sample_scene();
    let thermal = scene.band("thermal_infrared").unwrap();
    let dn = array![[120.0]];
    let bt = thermal.to_brightness_temperature(&dn).unwrap();
    // DN 120 is a plausible mid-range thermal reading.
    assert!(bt[[0, 0]] > 200.0 && bt[[0, 0]] < 350.0);
}

#[test]
fn test_brightness_temperature_rejected_for_reflective_band() {
    let (_dir, scene) = sample_scene();
    let nir = scene.band("nir").unwrap();
    let dn = array![[100.0]];
    assert!(matches!(
        nir.to_brightness_temperature(&dn).unwrap_err(),
        LandsatError::NotThermal(_)
    ));
}
