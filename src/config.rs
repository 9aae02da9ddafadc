use crate::domain::CycleRule;
use crate::errors::PipelineError;
use crate::fetcher::{DEFAULT_API_BASE, DEFAULT_USER_AGENT};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SERVER_IDS: [u32; 8] = [1173, 1167, 1081, 1042, 1044, 1060, 1174, 1175];

/// How normalized records become calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Regenerate per-size calendars from the current snapshot.
    Grouped,
    /// Keep one cumulative per-lot calendar and only extend deadlines.
    Merge,
}

impl FromStr for Strategy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(Strategy::Grouped),
            "merge" => Ok(Strategy::Merge),
            other => Err(PipelineError::Config(format!(
                "HOUSE_STRATEGY must be grouped or merge, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_base: String,
    pub user_agent: String,
    pub server_ids: Vec<u32>,
    pub output_dir: PathBuf,
    pub strategy: Strategy,
    pub cycle: CycleRule,
    pub request_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let strategy = match get("HOUSE_STRATEGY") {
            Some(v) => v.parse()?,
            None => Strategy::Grouped,
        };

        let cycle = match get("HOUSE_CYCLE").as_deref().map(str::trim) {
            Some("single") => CycleRule::single_phase_default(),
            Some("two-phase") => CycleRule::two_phase_default(),
            Some(other) => {
                return Err(PipelineError::Config(format!(
                    "HOUSE_CYCLE must be single or two-phase, got {other:?}"
                )))
            }
            None => match strategy {
                Strategy::Grouped => CycleRule::single_phase_default(),
                Strategy::Merge => CycleRule::two_phase_default(),
            },
        };

        let server_ids = match get("HOUSE_SERVER_IDS") {
            Some(v) => parse_server_ids(&v)?,
            None => DEFAULT_SERVER_IDS.to_vec(),
        };

        let timeout_secs: u64 = get("HOUSE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .trim()
            .parse()
            .map_err(|_| {
                PipelineError::Config("HOUSE_REQUEST_TIMEOUT_SECS must be a valid number".into())
            })?;

        Ok(Self {
            api_base: get("HOUSE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            user_agent: get("HOUSE_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            server_ids,
            output_dir: get("HOUSE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            strategy,
            cycle,
            request_timeout: Duration::from_secs(timeout_secs),
            log_file: get("HOUSE_LOG_FILE").map(PathBuf::from),
        })
    }
}

fn parse_server_ids(value: &str) -> Result<Vec<u32>, PipelineError> {
    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| PipelineError::Config(format!("invalid server id {s:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(PipelineError::Config("HOUSE_SERVER_IDS is empty".into()));
    }
    Ok(ids)
}
