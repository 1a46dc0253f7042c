//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Conversation simulation constants
pub mod simulation {
    /// Fixed first line of every transcript
    pub const TRANSCRIPT_HEADER: &str = "Meeting Conversation Start:\n";

    /// Default number of dynamic question/answer rounds
    pub const DEFAULT_MAX_ROUNDS: usize = 4;

    /// Upper bound accepted by config validation
    pub const MAX_ROUNDS_CEILING: usize = 50;

    /// Offering pitched by the sales representative
    pub const DEFAULT_OFFERING: &str = "BeGig";

    /// Persona name used when none is supplied
    pub const DEFAULT_PERSONA_NAME: &str = "Unni Koroth";

    /// Appended to the offering to form the sales speaker label
    pub const SALES_SPEAKER_SUFFIX: &str = "Sales";
}

/// Dynamic question request bounds (asked of the model, never enforced)
pub mod questions {
    pub const MIN_REQUESTED: usize = 3;
    pub const MAX_REQUESTED: usize = 5;
}

/// Generation service constants
pub mod llm {
    /// Default provider name
    pub const DEFAULT_PROVIDER: &str = "gemini";

    /// Default model for the default provider
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Default output token cap
    pub const DEFAULT_MAX_TOKENS: usize = 2048;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds), applied by the HTTP client only
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
}
