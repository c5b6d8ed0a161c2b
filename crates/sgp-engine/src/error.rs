//! # Engine Error Types
//!
//! Errors returned by the engine facade and its configuration loader.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────┐                          │
//! │  │   Lifecycle     │  │   Configuration     │                          │
//! │  │                 │  │                     │                          │
//! │  │  NotInitialized │  │  InvalidConfig      │                          │
//! │  │                 │  │  ConfigLoadFailed   │                          │
//! │  │                 │  │  ConfigSaveFailed   │                          │
//! │  └─────────────────┘  └─────────────────────┘                          │
//! │                                                                         │
//! │  Input problems are NOT engine errors: they travel inside              │
//! │  ValidationResult / Parsed values.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// An operation was called before `init()` completed.
    #[error("Engine not initialized: call init() before {operation}")]
    NotInitialized { operation: &'static str },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

impl EngineError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_)
                | EngineError::ConfigLoadFailed(_)
                | EngineError::ConfigSaveFailed(_)
        )
    }
}
