//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: this workspace at `info`, request
/// spans from `tower_http` at `debug`, everything else at `warn`.
pub const DEFAULT_FILTER: &str =
    "warn,househunter_api=info,househunter_infra=info,househunter_auth=info,tower_http=debug";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the JSON subscriber. Later calls are no-ops.
pub fn init() {
    // One JSON object per line, event fields at the top level.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses_and_names_workspace_crates() {
        let parsed = EnvFilter::try_new(DEFAULT_FILTER);
        assert!(parsed.is_ok());
        for krate in ["househunter_api", "househunter_infra", "househunter_auth"] {
            assert!(DEFAULT_FILTER.contains(krate), "{krate}");
        }
    }

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        ::tracing::info!("still alive after double init");
    }
}
