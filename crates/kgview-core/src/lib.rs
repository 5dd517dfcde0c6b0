//! kgview core: error types and configuration for the drill-down graph view.

pub mod config;
pub mod error;

pub use config::{DataPaths, KgViewConfig, SizeRange, VizConfig};
pub use error::{Error, Result};
