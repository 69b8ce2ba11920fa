use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load once each. Fetch failures end the
    /// extract phase early but never skip the export.
    pub async fn run(&self) -> Result<RunSummary> {
        let harvest = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} records in {} requests ({})",
            harvest.records.len(),
            harvest.requests_made,
            harvest.stop_reason
        );

        let export = self.pipeline.transform(harvest).await?;
        tracing::debug!(
            "Transformed {} rows across {} columns",
            export.row_count,
            export.columns.len()
        );

        let row_count = export.row_count;
        let stop_reason = export.stop_reason.clone();
        let output_path = self.pipeline.load(export).await?;
        tracing::info!("✅ Saved {} rows to '{}'", row_count, output_path);

        Ok(RunSummary {
            output_path,
            row_count,
            stop_reason,
        })
    }
}
