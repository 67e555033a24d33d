use crate::core::Pipeline;
use crate::domain::model::ConversionReport;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs one full conversion. Nothing is written unless every earlier stage succeeded.
    pub async fn run(&self) -> Result<ConversionReport> {
        tracing::info!("Starting conversion");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} rows from the source file ({})",
            table.records.len(),
            table.encoding
        );

        // Transform
        let batch = self.pipeline.transform(table).await?;
        tracing::info!(
            "Converted {} entries, skipped {}",
            batch.records.len(),
            batch.error_count
        );

        // Load
        let report = self.pipeline.load(batch).await?;
        tracing::info!("Output saved to: {}", report.output_path.display());

        Ok(report)
    }
}
