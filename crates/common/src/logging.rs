//! Tracing bootstrap for hosts of the normalization core.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log level or a full filter spec.
pub const LOG_ENV_VAR: &str = "MODELIR_LOG";

/// Crates whose events a plain level applies to.
const CRATE_TARGETS: [&str; 2] = ["modelir_common", "modelir_core"];

/// Install a stderr fmt subscriber filtered by `MODELIR_LOG`.
///
/// `MODELIR_LOG` is either a plain level ("trace", "debug", "info", "warn",
/// "error"), scoped to the modelir crates, or a full tracing filter spec like
/// "modelir_core=debug,warn".
pub fn init_tracing() {
    let filter = filter_spec(std::env::var(LOG_ENV_VAR).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// Build the filter directive for a `MODELIR_LOG` value.
pub fn filter_spec(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => scoped(&level.to_ascii_lowercase()),
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => scoped("info"),
    }
}

fn scoped(level: &str) -> String {
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_spec_default() {
        assert_eq!(filter_spec(None), "modelir_common=info,modelir_core=info");
        assert_eq!(filter_spec(Some("  ")), "modelir_common=info,modelir_core=info");
    }

    #[test]
    fn test_filter_spec_plain_level() {
        assert_eq!(
            filter_spec(Some("DEBUG")),
            "modelir_common=debug,modelir_core=debug"
        );
    }

    #[test]
    fn test_filter_spec_passthrough() {
        assert_eq!(filter_spec(Some("modelir_core=trace,warn")), "modelir_core=trace,warn");
    }

    #[test]
    fn test_init_twice_is_tolerated() {
        init_tracing();
        init_tracing();
    }
}
