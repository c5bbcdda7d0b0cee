//! Site layout: the EPICS/RHEL environment, the area table and path
//! classification against it.

pub mod area;
pub mod classify;
pub mod environment;
pub mod manifest;

pub use area::Area;
pub use classify::{AreaClassification, Domain, ModuleLocation, classify_area, classify_path};
pub use environment::Environment;
