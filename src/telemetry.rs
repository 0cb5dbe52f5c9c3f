use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::settings::AppEnvironment;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter; production emits JSON lines.
pub fn init_tracing(env: &AppEnvironment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if *env == AppEnvironment::Production {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
