pub mod dialect;
pub mod encoding;
pub mod etl;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::{
    ConversionReport, LoadedTable, NormalizedBatch, OutputRecord, SourceRecord,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
