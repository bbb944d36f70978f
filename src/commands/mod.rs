//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `runtime.rs`: list/map/view/random/add/locate/cache.
//! - `browse.rs`: the interactive session event loop.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod browse;
pub mod runtime;

use crate::catalog::HttpCatalog;
use crate::config::Config;
use crate::services::cache::{default_cache_dir, now_secs, QueryCache};
use crate::services::orchestrator::Orchestrator;
use tracing::{debug, warn};

pub use browse::run_browse;
pub use runtime::handle_runtime_commands;

pub struct Context {
    pub orchestrator: Orchestrator<HttpCatalog>,
    pub cache: Option<QueryCache>,
}

impl Context {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = HttpCatalog::new(&config.api_url, config.timeout_ms)?;
        debug!(api_url = %api.base_url(), "catalog client ready");
        let cache = match default_cache_dir() {
            Ok(dir) => {
                let cache =
                    QueryCache::new(dir, config.stale_after_secs, config.evict_after_secs);
                if let Err(e) = cache.prune(now_secs()) {
                    warn!(error = %e, "failed to prune query cache");
                }
                Some(cache)
            }
            Err(e) => {
                warn!(error = %e, "query cache disabled");
                None
            }
        };
        Ok(Self {
            orchestrator: Orchestrator::new(api, cache.clone()),
            cache,
        })
    }
}
