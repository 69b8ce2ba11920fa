use crate::adapters::http::SearchClient;
use crate::core::export;
use crate::domain::model::{Harvest, StopReason, TabularExport};
use crate::domain::ports::{ConfigProvider, Pipeline, ProductSource, Storage};
use crate::utils::error::{EtlError, Result};

/// Pages through the product search until the target row count is reached,
/// a page comes back empty, or a request fails, then writes one CSV file.
pub struct HarvestPipeline<S: Storage, C: ConfigProvider, P: ProductSource = SearchClient> {
    storage: S,
    config: C,
    source: P,
}

impl<S: Storage, C: ConfigProvider> HarvestPipeline<S, C, SearchClient> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let source = SearchClient::new(&config)?;
        Ok(Self::with_source(storage, config, source))
    }
}

impl<S: Storage, C: ConfigProvider, P: ProductSource> HarvestPipeline<S, C, P> {
    pub fn with_source(storage: S, config: C, source: P) -> Self {
        Self {
            storage,
            config,
            source,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: ProductSource> Pipeline for HarvestPipeline<S, C, P> {
    async fn extract(&self) -> Result<Harvest> {
        let target = self.config.target_rows();
        let delay = self.config.request_delay();
        let mut records = Vec::new();
        let mut page: u32 = 1;
        let mut requests_made: u32 = 0;
        let mut stop_reason = StopReason::TargetReached;

        tracing::info!("🚀 Starting data mine for {} products...", target);

        while records.len() < target {
            requests_made += 1;
            let fetched = match self.source.fetch_page(page).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::error!("❌ {}", EtlError::fetch_failure(page, &e));
                    stop_reason = StopReason::FetchFailed {
                        page,
                        message: e.to_string(),
                    };
                    break;
                }
            };

            if fetched.is_empty() {
                tracing::info!("📭 Page {} returned no products, dataset exhausted", page);
                stop_reason = StopReason::Exhausted { page };
                break;
            }

            records.extend(fetched.records);
            tracing::info!(
                "   Collected {} / {} rows... (Page {})",
                records.len(),
                target,
                page
            );

            page += 1;
            // No pause once the target is met; no further request follows.
            if records.len() < target && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(Harvest {
            records,
            requests_made,
            stop_reason,
        })
    }

    async fn transform(&self, harvest: Harvest) -> Result<TabularExport> {
        let columns = export::column_order(&harvest.records, self.config.fields());
        tracing::debug!("Export columns: {:?}", columns);

        let csv_output = export::write_csv(&harvest.records, &columns)?;

        Ok(TabularExport {
            columns,
            row_count: harvest.records.len(),
            csv_output,
            stop_reason: harvest.stop_reason,
        })
    }

    async fn load(&self, export: TabularExport) -> Result<String> {
        let output_path = self.config.output_path();

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            export.row_count,
            export.csv_output.len(),
            output_path
        );
        self.storage
            .write_file(output_path, &export.csv_output)
            .await?;

        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarvestConfig;
    use crate::domain::model::{Page, Record};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Serves `sizes[n - 1]` records for page n, an empty page past the end,
    /// and an error for `fail_on`.
    struct ScriptedSource {
        sizes: Vec<usize>,
        fail_on: Option<u32>,
        calls: AtomicU32,
        fetched_at: std::sync::Mutex<Vec<tokio::time::Instant>>,
    }

    impl ScriptedSource {
        fn new(sizes: Vec<usize>) -> Self {
            Self {
                sizes,
                fail_on: None,
                calls: AtomicU32::new(0),
                fetched_at: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn failing_on(mut self, page: u32) -> Self {
            self.fail_on = Some(page);
            self
        }
    }

    #[async_trait]
    impl ProductSource for Arc<ScriptedSource> {
        async fn fetch_page(&self, page: u32) -> Result<Page> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fetched_at
                .lock()
                .unwrap()
                .push(tokio::time::Instant::now());
            if self.fail_on == Some(page) {
                return Err(EtlError::HttpStatusError {
                    status: 502,
                    url: format!("http://scripted/search?page={}", page),
                });
            }

            let size = self.sizes.get(page as usize - 1).copied().unwrap_or(0);
            let records = (0..size)
                .map(|i| {
                    let value = serde_json::json!({
                        "code": format!("{}-{}", page, i),
                        "product_name": format!("Product {}", i),
                    });
                    serde_json::from_value::<Record>(value).unwrap()
                })
                .collect();

            Ok(Page {
                number: page,
                records,
            })
        }
    }

    fn test_config(target_rows: usize, page_size: usize) -> HarvestConfig {
        let mut config = HarvestConfig::default();
        config.extract.target_rows = target_rows;
        config.extract.page_size = page_size;
        config.extract.request_delay_ms = 0;
        config.load.output_path = "plastic_data.csv".to_string();
        config
    }

    fn pipeline(
        config: HarvestConfig,
        source: &Arc<ScriptedSource>,
    ) -> (HarvestPipeline<MockStorage, HarvestConfig, Arc<ScriptedSource>>, MockStorage) {
        let storage = MockStorage::new();
        let pipeline = HarvestPipeline::with_source(storage.clone(), config, source.clone());
        (pipeline, storage)
    }

    #[tokio::test]
    async fn test_extract_stops_at_first_multiple_of_page_size_past_target() {
        let source = Arc::new(ScriptedSource::new(vec![1000; 10]));
        let (pipeline, _) = pipeline(test_config(2500, 1000), &source);

        let harvest = pipeline.extract().await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(harvest.requests_made, 3);
        assert_eq!(harvest.records.len(), 3000);
        assert_eq!(harvest.stop_reason, StopReason::TargetReached);
    }

    #[tokio::test]
    async fn test_extract_stops_on_empty_page() {
        let source = Arc::new(ScriptedSource::new(vec![7]));
        let (pipeline, _) = pipeline(test_config(2500, 1000), &source);

        let harvest = pipeline.extract().await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(harvest.records.len(), 7);
        assert_eq!(harvest.stop_reason, StopReason::Exhausted { page: 2 });
    }

    #[tokio::test]
    async fn test_extract_keeps_records_before_failure() {
        let source = Arc::new(ScriptedSource::new(vec![5, 5, 5, 5]).failing_on(3));
        let (pipeline, _) = pipeline(test_config(100, 5), &source);

        let harvest = pipeline.extract().await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(harvest.records.len(), 10);
        assert_eq!(harvest.records[0].get("code").unwrap(), "1-0");
        assert_eq!(harvest.records[9].get("code").unwrap(), "2-4");
        assert!(matches!(
            harvest.stop_reason,
            StopReason::FetchFailed { page: 3, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_pauses_between_pages_but_not_after_target() {
        let source = Arc::new(ScriptedSource::new(vec![2, 2, 2]));
        let mut config = test_config(4, 2);
        config.extract.request_delay_ms = 1_500;
        let (pipeline, _) = pipeline(config, &source);

        let started = tokio::time::Instant::now();
        let harvest = pipeline.extract().await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(harvest.records.len(), 4);
        let fetched_at = source.fetched_at.lock().unwrap().clone();
        assert_eq!(fetched_at.len(), 2);
        assert!(fetched_at[1] - fetched_at[0] >= Duration::from_millis(1_500));
        // The second page meets the target, so only one pause was taken.
        assert!(elapsed >= Duration::from_millis(1_500));
        assert!(elapsed < Duration::from_millis(3_000));
    }

    #[tokio::test]
    async fn test_extract_with_empty_first_page() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let (pipeline, _) = pipeline(test_config(10, 5), &source);

        let harvest = pipeline.extract().await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(harvest.records.is_empty());
        assert_eq!(harvest.stop_reason, StopReason::Exhausted { page: 1 });
    }

    #[tokio::test]
    async fn test_transform_builds_csv_in_fetch_order() {
        let source = Arc::new(ScriptedSource::new(vec![2, 1]));
        let (pipeline, _) = pipeline(test_config(3, 2), &source);

        let harvest = pipeline.extract().await.unwrap();
        let export = pipeline.transform(harvest).await.unwrap();

        assert_eq!(export.columns, vec!["code", "product_name"]);
        assert_eq!(export.row_count, 3);
        assert_eq!(
            String::from_utf8(export.csv_output).unwrap(),
            "code,product_name\n1-0,Product 0\n1-1,Product 1\n2-0,Product 0\n"
        );
    }

    #[tokio::test]
    async fn test_load_writes_to_configured_path() {
        let source = Arc::new(ScriptedSource::new(vec![1]));
        let (pipeline, storage) = pipeline(test_config(1, 1), &source);

        let export = TabularExport {
            columns: vec!["code".to_string()],
            row_count: 1,
            csv_output: b"code\n1-0\n".to_vec(),
            stop_reason: StopReason::TargetReached,
        };
        let output_path = pipeline.load(export).await.unwrap();

        assert_eq!(output_path, "plastic_data.csv");
        assert_eq!(
            storage.get_file("plastic_data.csv").await.unwrap(),
            b"code\n1-0\n"
        );
        assert!(storage.read_file("other.csv").await.is_err());
    }
}
