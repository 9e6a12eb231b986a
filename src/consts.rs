pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard
    //! client, organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 50;

    /// Maximum buffer size for the worker event channel.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum buffer size for the refresh command queue.
    pub const COMMAND_QUEUE_SIZE: usize = 16;

    // =============================================================================
    // REFRESH CONFIGURATION
    // =============================================================================

    /// Periodic refresh configuration
    pub mod refresh {
        use std::time::Duration;

        /// Interval between periodic full refreshes (seconds).
        /// Ticks that fire while the terminal is backgrounded are dropped.
        pub const DEFAULT_INTERVAL_SECS: u64 = 30;

        /// Helper function to get the default refresh interval
        pub const fn default_interval() -> Duration {
            Duration::from_secs(DEFAULT_INTERVAL_SECS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// API request configuration
    pub mod api {
        use std::time::Duration;

        /// Connect timeout for API requests (seconds).
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Overall request timeout; an elapsed timeout surfaces as a
        /// network error on the owning section.
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        /// Number of records requested for the bookings and messages panels.
        pub const RECENT_LIMIT: u32 = 3;

        /// Helper function to get the connect timeout
        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        /// Helper function to get the request timeout
        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
