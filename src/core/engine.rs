use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct CrawlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CrawlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let name = self.pipeline.name();
        let started = Instant::now();
        tracing::info!("🚀 Starting {} pipeline", name);
        self.monitor.log_stats("Start");

        let result = self.pipeline.run().await;
        self.monitor.log_final_stats();

        match &result {
            Ok(report) => match report.pages {
                Some(pages) => tracing::info!(
                    "✅ {} finished in {:?}: {} items from {} pages -> {}",
                    name,
                    started.elapsed(),
                    report.items,
                    pages,
                    report.output_path
                ),
                None => tracing::info!(
                    "✅ {} finished in {:?}: {} items -> {}",
                    name,
                    started.elapsed(),
                    report.items,
                    report.output_path
                ),
            },
            Err(e) => tracing::error!("❌ {} failed after {:?}: {}", name, started.elapsed(), e),
        }

        result
    }
}
