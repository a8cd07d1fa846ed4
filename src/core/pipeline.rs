use crate::core::document::{build_document, DocumentOptions};
use crate::core::geojson::{decode_plates, decode_quakes};
use crate::core::source::{fetch, FeedSource, FetchOptions};
use crate::domain::model::{FeedData, MapDocument, OutputFormat, PlateFeature};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{MapError, Result};
use reqwest::Client;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

const CSV_HEADER: [&str; 9] = [
    "id",
    "place",
    "latitude",
    "longitude",
    "depth_km",
    "magnitude",
    "radius",
    "fill_color",
    "occurred_at",
];

/// Fetches the earthquake feed (and plates, when configured), builds the map
/// document and writes it through `Storage`.
pub struct MapPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: Client,
}

impl<S: Storage, C: ConfigProvider> MapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.config.request_timeout(),
            headers: self.config.request_headers().cloned().unwrap_or_default(),
        }
    }

    async fn fetch_plates(&self, options: &FetchOptions) -> Result<Option<Vec<PlateFeature>>> {
        let Some(source) = self.config.plates_source() else {
            return Ok(None);
        };
        let source = FeedSource::parse_field("plates_source", source)?;
        tracing::info!("🌍 Fetching tectonic plates from: {}", source);
        let bytes = fetch(&self.client, &source, options).await?;
        Ok(Some(decode_plates(&bytes)?))
    }
}

pub fn markers_csv(document: &MapDocument) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for marker in &document.overlays.earthquakes {
        writer.write_record([
            marker.id.clone().unwrap_or_default(),
            marker.popup.location.clone(),
            marker.position.latitude().to_string(),
            marker.position.longitude().to_string(),
            marker.popup.depth.to_string(),
            marker.popup.magnitude.to_string(),
            marker.style.radius.to_string(),
            marker.style.fill_color.to_string(),
            marker
                .occurred_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| MapError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MapPipeline<S, C> {
    async fn extract(&self) -> Result<FeedData> {
        let quake_source = FeedSource::parse_field("quake_endpoint", self.config.quake_endpoint())?;
        let options = self.fetch_options();
        tracing::info!("🚀 Fetching earthquakes from: {}", quake_source);

        let (quake_bytes, plates) = tokio::try_join!(
            fetch(&self.client, &quake_source, &options),
            self.fetch_plates(&options),
        )?;

        let earthquakes = decode_quakes(&quake_bytes, self.config.invalid_feature_policy())?;
        tracing::info!(
            "📊 Extracted {} earthquakes ({} skipped), {} plates",
            earthquakes.features.len(),
            earthquakes.skipped,
            plates.as_ref().map_or(0, Vec::len)
        );

        Ok(FeedData {
            earthquakes,
            plates,
        })
    }

    async fn transform(&self, data: FeedData) -> Result<MapDocument> {
        let options = DocumentOptions {
            view: self.config.map_view(),
            legend_title: self.config.legend_title().to_string(),
            policy: self.config.invalid_feature_policy(),
        };
        let document = build_document(data, &options)?;
        tracing::info!(
            "🔧 Built {:?} map: {} markers, {} plates",
            document.variant,
            document.stats.earthquakes,
            document.stats.plates
        );
        Ok(document)
    }

    async fn load(&self, document: MapDocument) -> Result<String> {
        let mut files: Vec<(&'static str, Vec<u8>)> = Vec::new();
        for format in self.config.output_formats() {
            if files.iter().any(|(name, _)| *name == format.file_name()) {
                tracing::warn!("Output format {:?} listed twice, writing it once", format);
                continue;
            }
            let data = match format {
                OutputFormat::Json => serde_json::to_vec_pretty(&document)?,
                OutputFormat::Csv => markers_csv(&document)?,
            };
            files.push((format.file_name(), data));
        }

        let primary = match self.config.compression_filename() {
            Some(archive_name) => {
                tracing::debug!("Creating ZIP file with {} files", files.len());
                let zip_data = {
                    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                    for (name, data) in &files {
                        zip.start_file(*name, SimpleFileOptions::default())?;
                        zip.write_all(data)?;
                    }
                    zip.finish()?.into_inner()
                };

                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.storage.write_file(archive_name, &zip_data).await?;
                archive_name.to_string()
            }
            None => {
                for (name, data) in &files {
                    self.storage.write_file(name, data).await?;
                }
                files
                    .first()
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default()
            }
        };

        let output_path = format!("{}/{}", self.config.output_path(), primary);
        tracing::info!("💾 Map output saved: {}", output_path);
        Ok(output_path)
    }
}
