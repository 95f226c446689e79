//! Error types emitted by the Stopwise CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use stopwise_core::ServiceError;
use stopwise_data::tomtom::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the Stopwise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Opening the plan request file failed.
    #[error("failed to open plan request at {path:?}: {source}")]
    OpenPlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Plan request JSON could not be decoded.
    #[error("failed to parse plan request JSON at {path:?}: {source}")]
    ParsePlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Constructing the TomTom client failed.
    #[error("failed to build TomTom client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The final recompute failed, so the printed route is stale or absent.
    #[error("route could not be computed: {source}")]
    RouteFailed {
        #[source]
        source: ServiceError,
    },
    /// Serialising the plan report failed.
    #[error("failed to serialise plan report: {0}")]
    SerialisePlanReport(#[source] serde_json::Error),
    /// Writing the plan output failed.
    #[error("failed to write plan output: {0}")]
    WritePlanOutput(#[source] std::io::Error),
}
