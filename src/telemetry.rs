//! Opt-in tracing setup for binaries and hosts embedding `card-compare`.
//!
//! The library itself only emits `tracing` events. Installing a subscriber is
//! left to the host; the helpers here cover the common case.

/// Filter used when `RUST_LOG` is unset: crate events at `info`, everything
/// else at `warn`.
pub const DEFAULT_FILTER: &str = "card_compare=info,warn";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, falling back
/// to `default_filter`.
///
/// Returns `false` when the `telemetry` feature is off or a global subscriber
/// already exists.
#[must_use]
pub fn init_tracing(default_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = default_filter;
        false
    }
}

/// `init_tracing` with [`DEFAULT_FILTER`].
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}
