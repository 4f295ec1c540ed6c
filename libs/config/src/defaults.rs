//! Service configuration defaults
//!
//! Values used when neither the config file nor the environment sets them.

/// Path search defaults
pub mod search {
    /// Maximum number of hops in a returned path
    pub const MAX_PATH_LENGTH: usize = 4;

    /// Maximum number of assets entered after the source asset
    pub const MAX_ASSETS_PER_PATH: usize = 4;

    /// Hard upper bound accepted for either limit
    pub const LIMIT_CEILING: usize = 10;

    /// Whether liquidity pools are considered as hop venues
    pub const INCLUDE_POOLS: bool = true;

    /// Search deadline (milliseconds)
    pub const TIMEOUT_MS: u64 = 5_000;
}

/// Logging defaults
pub mod logging {
    pub const LOG_LEVEL: &str = "info";
}

/// Ingestion defaults
pub mod ingestion {
    /// Event log read when no path is given
    pub const EVENTS_PATH: &str = "./data/ledger_events.jsonl";
}
