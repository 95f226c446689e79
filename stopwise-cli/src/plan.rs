//! Plan command implementation for the Stopwise CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stopwise_core::map::{MapSurface, RecordingMap};
use stopwise_core::{
    ApplyPolicy, Coordinate, ErrorClass, PlannerConfig, RecomputeOutcome, RoutePlanner,
    RoutingService, TravelTimeProvider, UNREACHABLE,
};
use stopwise_data::tomtom::{API_KEY_ENV, DEFAULT_BASE_URL, TomTomClient, TomTomConfig};
use tokio::task::LocalSet;

use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_PLAN_REQUEST, ARG_TIMEOUT_SECS, CliError, ENV_PLAN_REQUEST,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Replay delivery stops through the route planner. Each stop \
                 in the request is added as a map click; after every click \
                 the stops are re-ranked by driving time from the origin and \
                 the route is recomputed. The final ordering and route \
                 geometry are printed as JSON.",
    about = "Order stops by driving time and print the route"
)]
#[ortho_config(prefix = "STOPWISE")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file with `origin`, `stops` and optional `policy`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// TomTom API key. Falls back to `STOPWISE_API_KEY`.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Service root (default "https://api.tomtom.com").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let mut merged = self.load_and_merge().map_err(CliError::Configuration)?;
        if merged.api_key.is_none() {
            merged.api_key = std::env::var(API_KEY_ENV).ok();
        }
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct PlanConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Client settings, credential included.
    pub(crate) tomtom: TomTomConfig,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;
        let api_key = args
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_API_KEY,
                env: API_KEY_ENV,
            })?;

        let mut tomtom = TomTomConfig::new(api_key)
            .with_base_url(args.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()));
        if let Some(secs) = args.timeout_secs {
            tomtom = tomtom.with_timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            request_path,
            tomtom,
        })
    }
}

/// Stops to replay, in click order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PlanRequest {
    pub(crate) origin: Coordinate,
    #[serde(default)]
    pub(crate) stops: Vec<Coordinate>,
    #[serde(default)]
    pub(crate) policy: ApplyPolicy,
}

/// One ranked stop in the printed report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportStop {
    /// Marker label: the 1-based click on which the stop was added.
    pub(crate) label: usize,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    /// `None` when the service found no route to the stop.
    pub(crate) travel_time_seconds: Option<u64>,
}

/// A recompute that did not reach the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReportFailure {
    pub(crate) sequence: u64,
    pub(crate) class: ErrorClass,
    pub(crate) message: String,
}

/// Final state of a replayed plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PlanReport {
    pub(crate) origin: Coordinate,
    pub(crate) stops: Vec<ReportStop>,
    /// GeoJSON `FeatureCollection`, or `null` if nothing was routed.
    pub(crate) route: Option<serde_json::Value>,
    pub(crate) failures: Vec<ReportFailure>,
}

/// Builds the distance and routing collaborators for one invocation.
pub(crate) trait PlanServices {
    type TravelTimes: TravelTimeProvider + 'static;
    type Routing: RoutingService + 'static;

    fn build(&self, config: &PlanConfig) -> Result<(Self::TravelTimes, Self::Routing), CliError>;
}

pub(crate) struct TomTomServices;

impl PlanServices for TomTomServices {
    type TravelTimes = TomTomClient;
    type Routing = TomTomClient;

    fn build(&self, config: &PlanConfig) -> Result<(TomTomClient, TomTomClient), CliError> {
        let client = TomTomClient::with_config(config.tomtom.clone()).map_err(|source| {
            CliError::BuildClient {
                base_url: config.tomtom.base_url.clone(),
                source,
            }
        })?;
        Ok((client.clone(), client))
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &TomTomServices, &mut stdout)
}

pub(crate) fn run_plan_with<S: PlanServices>(
    args: PlanArgs,
    services: &S,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_plan(&config, services, writer)
}

pub(crate) fn execute_plan<S: PlanServices>(
    config: &PlanConfig,
    services: &S,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let request = load_plan_request(&config.request_path)?;
    let (travel_times, routing) = services.build(config)?;
    let (report, last) = replay(request, travel_times, routing)?;
    write_plan_report(writer, &report)?;
    match last {
        Some(RecomputeOutcome::Failed { error, .. }) => Err(CliError::RouteFailed { source: error }),
        _ => Ok(()),
    }
}

/// Loads a JSON-encoded [`PlanRequest`] from disk.
pub(crate) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequest, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenPlanRequest {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Click every stop in order, settling after each, and report the result.
///
/// Returns the report and the outcome of the final recompute.
pub(crate) fn replay<D, R>(
    request: PlanRequest,
    travel_times: D,
    routing: R,
) -> Result<(PlanReport, Option<RecomputeOutcome>), CliError>
where
    D: TravelTimeProvider + 'static,
    R: RoutingService + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let local = LocalSet::new();
    let config = PlannerConfig::centered_on(request.origin).with_policy(request.policy);
    let planner = RoutePlanner::mount(config, travel_times, routing, RecordingMap::new());

    let outcomes = local.block_on(&runtime, async {
        let mut outcomes = Vec::new();
        for stop in request.stops {
            planner.map().events().emit_click(stop);
            outcomes.extend(planner.settle().await);
        }
        outcomes
    });
    log::info!("replayed {} recompute(s)", outcomes.len());

    let report = build_report(&planner, &outcomes);
    planner.unmount();
    Ok((report, outcomes.into_iter().last()))
}

fn build_report<D, R>(
    planner: &RoutePlanner<D, R, RecordingMap>,
    outcomes: &[RecomputeOutcome],
) -> PlanReport
where
    D: TravelTimeProvider + 'static,
    R: RoutingService + 'static,
{
    let failures = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            RecomputeOutcome::Failed { sequence, error } => Some(ReportFailure {
                sequence: *sequence,
                class: error.class(),
                message: error.to_string(),
            }),
            _ => None,
        })
        .collect();

    planner.with_session(|session| {
        // Duplicate clicks share a location; hand out their labels in order.
        let mut unlabelled: Vec<_> = session.destinations().to_vec();
        let (stops, route) = session.displayed().map_or_else(
            || (Vec::new(), None),
            |route| {
                let stops = route
                    .ranked
                    .iter()
                    .map(|entry| ReportStop {
                        label: unlabelled
                            .iter()
                            .position(|d| d.location == entry.location)
                            .map_or(0, |index| unlabelled.remove(index).label()),
                        latitude: entry.location.latitude(),
                        longitude: entry.location.longitude(),
                        travel_time_seconds: (entry.travel_time != UNREACHABLE)
                            .then(|| entry.travel_time.as_secs()),
                    })
                    .collect();
                (stops, Some(route.geometry.to_geojson()))
            },
        );
        PlanReport {
            origin: session.origin(),
            stops,
            route,
            failures,
        }
    })
}

fn write_plan_report(writer: &mut dyn Write, report: &PlanReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialisePlanReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WritePlanOutput)?;
    writer.write_all(b"\n").map_err(CliError::WritePlanOutput)?;
    Ok(())
}
