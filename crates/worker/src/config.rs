use redress_core::stale::DEFAULT_STALE_DAYS;

/// Worker configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Days of inactivity before a live complaint is auto-closed
    /// (default: `5`).
    pub stale_days: i64,
    /// Seconds between reaper sweeps (default: `21600`, six hours).
    pub check_interval_secs: u64,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default  |
    /// |------------------------|----------|
    /// | `STALE_DAYS`           | `5`      |
    /// | `REAPER_INTERVAL_SECS` | `21600`  |
    pub fn from_env() -> Self {
        let stale_days: i64 = std::env::var("STALE_DAYS")
            .unwrap_or_else(|_| DEFAULT_STALE_DAYS.to_string())
            .parse()
            .expect("STALE_DAYS must be a valid i64");

        let check_interval_secs: u64 = std::env::var("REAPER_INTERVAL_SECS")
            .unwrap_or_else(|_| "21600".into())
            .parse()
            .expect("REAPER_INTERVAL_SECS must be a valid u64");

        Self {
            stale_days,
            check_interval_secs,
        }
    }
}
