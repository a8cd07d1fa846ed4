use crate::domain::model::{FeedData, InvalidFeaturePolicy, MapDocument, MapView, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_LEGEND_TITLE: &str = "Magnitude";

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn quake_endpoint(&self) -> &str;
    /// `Some` selects the tectonic plate variant of the map.
    fn plates_source(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    /// Archive name when compression is on.
    fn compression_filename(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
    fn invalid_feature_policy(&self) -> InvalidFeaturePolicy;

    fn request_headers(&self) -> Option<&HashMap<String, String>> {
        None
    }

    fn map_view(&self) -> MapView {
        MapView::default()
    }

    fn legend_title(&self) -> &str {
        DEFAULT_LEGEND_TITLE
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<FeedData>;
    async fn transform(&self, data: FeedData) -> Result<MapDocument>;
    async fn load(&self, document: MapDocument) -> Result<String>;
}
