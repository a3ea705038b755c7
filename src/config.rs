//! Node Configuration
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! `COURSE_SEARCH_*` environment variables, command-line flags.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::elastic::DEFAULT_INDEX;
use crate::search::handlers::{MAX_RESULT_WINDOW, RequestLimits};
use crate::search::types::DEFAULT_PAGE_SIZE;

pub const USAGE: &str = "Usage: course-search [--bind <addr:port>] [--data <path>] \
[--engine memory|elastic] [--elastic-url <url>] [--index <name>] \
[--timeout-ms <ms>] [--max-page-size <n>] [--max-result-window <n>]";

/// Environment variables are `COURSE_SEARCH_<FIELD>`, e.g. `COURSE_SEARCH_TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "COURSE_SEARCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Memory,
    Elastic,
}

impl std::str::FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(EngineKind::Memory),
            "elastic" | "elasticsearch" => Ok(EngineKind::Elastic),
            other => bail!("Unknown engine '{}', expected 'memory' or 'elastic'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// Course catalog loaded at startup. `None` starts with an empty index.
    pub data_path: Option<PathBuf>,
    pub engine: EngineKind,
    pub elastic_url: String,
    pub index_name: String,
    pub engine_timeout: Duration,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_result_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_path: Some(PathBuf::from("data/sample-courses.json")),
            engine: EngineKind::Memory,
            elastic_url: "http://localhost:9200".to_string(),
            index_name: DEFAULT_INDEX.to_string(),
            engine_timeout: Duration::from_secs(5),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 100,
            max_result_window: MAX_RESULT_WINDOW,
        }
    }
}

/// Overrides read from the environment. Absent variables leave the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvOverrides {
    bind: Option<SocketAddr>,
    /// Empty means "no catalog".
    data: Option<PathBuf>,
    engine: Option<String>,
    elastic_url: Option<String>,
    index: Option<String>,
    timeout_ms: Option<u64>,
    max_page_size: Option<usize>,
    max_result_window: Option<usize>,
}

impl Settings {
    /// Defaults, then the process environment, then `args` (without the program name).
    pub fn load(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut settings = Settings::default();
        settings.apply_env(config::Environment::with_prefix(ENV_PREFIX))?;
        settings.apply_args(args)?;
        Ok(settings)
    }

    pub fn request_limits(&self) -> RequestLimits {
        RequestLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            max_result_window: self.max_result_window,
            engine_timeout: self.engine_timeout,
        }
    }

    /// Applies the variables `env` yields on top of the current values.
    pub fn apply_env(&mut self, env: config::Environment) -> Result<()> {
        let overrides: EnvOverrides = config::Config::builder()
            .add_source(env)
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .with_context(|| format!("Invalid {}_* environment", ENV_PREFIX))?;
        tracing::debug!("Environment overrides: {:?}", overrides);

        if let Some(bind) = overrides.bind {
            self.bind_addr = bind;
        }
        if let Some(data) = overrides.data {
            self.data_path = (!data.as_os_str().is_empty()).then_some(data);
        }
        if let Some(engine) = overrides.engine {
            self.engine = engine
                .parse()
                .with_context(|| format!("Invalid {}_ENGINE", ENV_PREFIX))?;
        }
        if let Some(url) = overrides.elastic_url {
            self.elastic_url = url;
        }
        if let Some(index) = overrides.index {
            self.index_name = index;
        }
        if let Some(ms) = overrides.timeout_ms {
            self.engine_timeout = Duration::from_millis(ms);
        }
        if let Some(size) = overrides.max_page_size {
            self.max_page_size = size;
        }
        if let Some(window) = overrides.max_result_window {
            self.max_result_window = window;
        }
        Ok(())
    }

    pub fn apply_args(&mut self, args: impl IntoIterator<Item = String>) -> Result<()> {
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            if !FLAGS.contains(&flag.as_str()) {
                tracing::warn!("Ignoring unknown argument '{}'", flag);
                continue;
            }

            let Some(value) = args.next() else {
                bail!("{} requires a value\n{}", flag, USAGE);
            };
            self.set(&flag, &value)
                .with_context(|| format!("Invalid value for {}", flag))?;
        }

        if self.max_page_size == 0 || self.default_page_size > self.max_page_size {
            bail!("max page size must be at least {}", self.default_page_size);
        }
        if self.max_result_window < self.max_page_size {
            bail!("max result window must be at least the max page size ({})", self.max_page_size);
        }
        Ok(())
    }

    fn set(&mut self, flag: &str, value: &str) -> Result<()> {
        match flag {
            "--bind" => self.bind_addr = value.parse()?,
            "--data" => {
                self.data_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "--engine" => self.engine = value.parse()?,
            "--elastic-url" => self.elastic_url = value.to_string(),
            "--index" => self.index_name = value.to_string(),
            "--timeout-ms" => self.engine_timeout = Duration::from_millis(value.parse()?),
            "--max-page-size" => self.max_page_size = value.parse()?,
            "--max-result-window" => self.max_result_window = value.parse()?,
            _ => bail!("Unknown flag {}", flag),
        }
        Ok(())
    }
}

const FLAGS: [&str; 8] = [
    "--bind",
    "--data",
    "--engine",
    "--elastic-url",
    "--index",
    "--timeout-ms",
    "--max-page-size",
    "--max-result-window",
];
