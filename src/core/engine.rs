use crate::core::acquire::ResponseAcquirer;
use crate::core::export::ReportExporter;
use crate::core::fence::strip_fences;
use crate::core::normalize::parse_and_normalize;
use crate::domain::model::{AnalysisReport, ExtractionRequest};
use crate::domain::ports::{GenerativeProvider, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::{AnalysisPhase, SystemMonitor};

pub struct AnalysisEngine<P: GenerativeProvider> {
    acquirer: ResponseAcquirer<P>,
    monitor: SystemMonitor,
}

impl<P: GenerativeProvider> AnalysisEngine<P> {
    pub fn new(acquirer: ResponseAcquirer<P>) -> Self {
        Self::new_with_monitoring(acquirer, false)
    }

    pub fn new_with_monitoring(acquirer: ResponseAcquirer<P>, monitor_enabled: bool) -> Self {
        Self {
            acquirer,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn model(&self) -> &str {
        self.acquirer.model()
    }

    /// Provider errors propagate as they are; only an unreadable payload is
    /// turned into the fallback analysis.
    pub async fn analyze(&self, request: &ExtractionRequest) -> Result<AnalysisReport> {
        tracing::info!("🥗 Starting personalized nutrition analysis...");

        let raw = self.acquirer.acquire(request).await?;
        self.monitor.log_phase(AnalysisPhase::Acquire);

        let payload = strip_fences(&raw.text);
        let outcome = parse_and_normalize(&payload);
        if let Some(err) = outcome.error() {
            tracing::warn!("⚠️ {} - returning fallback analysis", err);
            tracing::debug!("Unparsed payload ({} bytes): {:.200}", payload.len(), payload);
        }
        self.monitor.log_phase(AnalysisPhase::Normalize);

        tracing::info!("✅ Analysis complete");
        Ok(AnalysisReport {
            analysis: outcome.into_result(),
            model: raw.model,
        })
    }

    pub async fn analyze_and_export<S: Storage>(
        &self,
        request: &ExtractionRequest,
        exporter: &ReportExporter<S>,
    ) -> Result<(AnalysisReport, Vec<String>)> {
        let report = self.analyze(request).await?;

        let paths = exporter.export(&report).await?;
        self.monitor.log_phase(AnalysisPhase::Export);
        self.monitor.log_final_stats();

        Ok((report, paths))
    }
}
