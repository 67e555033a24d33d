use crate::core::{loader, normalizer, writer};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ConversionReport, LoadedTable, NormalizedBatch};
use crate::utils::error::Result;

/// Synology C2 export in, Bitwarden import out.
pub struct ConversionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConversionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConversionPipeline<S, C> {
    async fn extract(&self) -> Result<LoadedTable> {
        let path = self.config.input_path();
        tracing::debug!("Reading {}", path.display());
        let bytes = self.storage.read_file(path).await?;

        loader::load_bytes(path, &bytes, self.config.encodings(), self.config.sample_size())
    }

    async fn transform(&self, table: LoadedTable) -> Result<NormalizedBatch> {
        normalizer::normalize_table(table)
    }

    async fn load(&self, batch: NormalizedBatch) -> Result<ConversionReport> {
        let path = self.config.output_path();
        let data = writer::to_csv_bytes(&batch.records)?;

        tracing::debug!("Writing {} bytes to {}", data.len(), path.display());
        self.storage.write_file(path, &data).await?;

        Ok(ConversionReport {
            output_path: path.to_path_buf(),
            written: batch.records.len(),
            skipped: batch.error_count,
            total_rows: batch.total_rows,
            encoding: batch.encoding,
            delimiter: batch.dialect.delimiter,
        })
    }
}
