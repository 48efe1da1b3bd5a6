use std::env;

use tracing::Level;
pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "TUBE_RELAY_LOG_LEVEL";

pub const COMPONENT_LEVELS: &[(&str, Level)] = &[
    ("tube_relay", Level::INFO),
    ("request", Level::INFO),
    ("app_config", Level::INFO),
    ("app_helpers", Level::INFO),
    ("app_logger", Level::INFO),
    ("app_relay", Level::INFO),
    ("app_tasks", Level::INFO),
];

/// Initialize the logger
///
/// # Panics
/// Panics if a global subscriber was already installed
pub fn init() {
    init_with(COMPONENT_LEVELS.to_vec());
}

fn init_with<T>(levels: T)
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let mut filter = default_filter(levels);

    for d in env_directives(&env::var(LOG_LEVEL_ENV).unwrap_or_default()) {
        filter = filter.add_directive(d);
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .expect("setting default subscriber failed");
}

fn default_filter<T>(levels: T) -> EnvFilter
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let default_levels = levels
        .into_iter()
        .map(|(k, v)| {
            if k.is_empty() {
                v.to_string()
            } else {
                format!("{}={}", k, v)
            }
        })
        .fold(String::new(), |acc, a| format!("{},{}", acc, a));

    EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .parse_lossy(default_levels)
}

/// Parse a comma separated list of filter directives.
///
/// Invalid directives are reported on stderr and skipped,
/// since the subscriber isn't up yet when this runs.
fn env_directives(raw: &str) -> Vec<Directive> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Failed to parse log level directive {s:?}: {e:?}");
                None
            }
        })
        .collect()
}
