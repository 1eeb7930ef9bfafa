use metrics_exporter_prometheus::PrometheusHandle;
use mission_secure::assessment::refinement::{GradeServiceClient, OpenAiRefiner, Refiner};
use mission_secure::assessment::scoring::{ScoringConfig, ScoringEngine};
use mission_secure::config::AppConfig;
use mission_secure::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Timeout for calls to another Mission Secure service.
pub(crate) const SERVICE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Scoring engine using the profile at `MS_SCORING_PROFILE`, or the built-in one.
pub(crate) fn scoring_engine(config: &AppConfig) -> Result<ScoringEngine, AppError> {
    let scoring = match &config.scoring_profile {
        Some(path) => {
            let profile = ScoringConfig::from_path(path)?;
            tracing::info!(path = %path.display(), "loaded scoring profile");
            profile
        }
        None => ScoringConfig::default(),
    };
    Ok(ScoringEngine::new(scoring))
}

/// Remote grader for this process.
///
/// A `service_url` routes grading through another Mission Secure service;
/// otherwise the model credentials from the environment are used directly.
/// `None` means local scoring only.
pub(crate) fn refiner(
    config: &AppConfig,
    service_url: Option<&str>,
) -> Result<Option<Arc<dyn Refiner>>, AppError> {
    if let Some(url) = service_url {
        let client = GradeServiceClient::new(url, SERVICE_TIMEOUT)?;
        return Ok(Some(Arc::new(client)));
    }

    match OpenAiRefiner::from_config(&config.refinement)? {
        Some(refiner) => {
            tracing::info!(model = %config.refinement.model, "remote refinement enabled");
            Ok(Some(Arc::new(refiner)))
        }
        None => {
            tracing::info!("no model credentials configured; using local scoring only");
            Ok(None)
        }
    }
}
