use crate::domain::model::{Harvest, Page, TabularExport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn fields(&self) -> &[String];
    fn country(&self) -> &str;
    fn packaging(&self) -> &str;
    fn target_rows(&self) -> usize;
    fn page_size(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn request_delay(&self) -> Duration;
    fn user_agent(&self) -> &str;
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Page>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Harvest>;
    async fn transform(&self, harvest: Harvest) -> Result<TabularExport>;
    async fn load(&self, export: TabularExport) -> Result<String>;
}
