//! Landsat Level-1 scene access and preprocessing.
//!
//! Glossary for a band, by example:
//!
//! * file name: `LE07_L1TP_195049_20000422_20170212_01_T1_B4.TIF`
//! * file suffix: `B4`
//! * band number: `4`
//! * band long name: `Near Infrared (NIR)`
//! * band short name: `nir`

pub mod bands;
pub mod mtl;
pub mod radiometry;
pub mod scene;

pub use mtl::{MtlDocument, MtlValue};
pub use scene::{Band, Scene};
