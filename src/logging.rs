// 📜 Logging setup
//
// Library code only emits `tracing` events; binaries call `init_logging`
// once at startup.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "FINANCE_EDU_LOG";

static INIT: Once = Once::new();

/// Install the fmt subscriber. Levels come from `FINANCE_EDU_LOG`
/// (e.g. `finance_edu=debug`), falling back to `finance_edu=info`.
/// Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(ENV_LOG)
            .unwrap_or_else(|_| EnvFilter::new("finance_edu=info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    });
}
