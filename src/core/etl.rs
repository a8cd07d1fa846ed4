use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;

pub struct MapEngine<P: Pipeline> {
    pipeline: P,
    monitor: ProcessMonitor,
}

impl<P: Pipeline> MapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ProcessMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting map build...");
        self.monitor.log_stats("Start");

        let feeds = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} earthquakes",
            feeds.earthquakes.features.len()
        );
        self.monitor.log_stats("Extract");

        let document = self.pipeline.transform(feeds).await?;
        tracing::info!(
            "Transformed {} markers ({} skipped)",
            document.stats.earthquakes,
            document.stats.skipped
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(document).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
