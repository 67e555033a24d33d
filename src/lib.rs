pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, ConversionConfig};
pub use core::{etl::EtlEngine, pipeline::ConversionPipeline};
pub use domain::model::{ConversionReport, OutputRecord};
pub use utils::error::{ConvertError, Result};
