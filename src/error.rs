use std::fmt;

/// Startup failures. Once an [`Engine`](crate::engine::Engine) is running,
/// ticks never fail.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The render surface could not be opened; the session refuses to start.
    SurfaceUnavailable(String),
    InvalidConfig(String),
    InvalidRoster(String),
    Schedule(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SurfaceUnavailable(e) => write!(f, "render surface unavailable: {}", e),
            EngineError::InvalidConfig(e) => write!(f, "invalid config: {}", e),
            EngineError::InvalidRoster(e) => write!(f, "invalid roster: {}", e),
            EngineError::Schedule(e) => write!(f, "failed to build schedule: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}
