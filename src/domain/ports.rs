use crate::core::encoding::EncodingCandidate;
use crate::domain::model::{ConversionReport, LoadedTable, NormalizedBatch};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &Path;
    fn output_path(&self) -> &Path;
    fn encodings(&self) -> &[EncodingCandidate];
    fn sample_size(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<LoadedTable>;
    async fn transform(&self, table: LoadedTable) -> Result<NormalizedBatch>;
    async fn load(&self, batch: NormalizedBatch) -> Result<ConversionReport>;
}
