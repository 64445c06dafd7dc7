use thiserror::Error;
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("face/pose detectors are not ready; load them before starting")]
    NotReady,
    #[error("monitoring session is already running")]
    AlreadyMonitoring,
    #[error("no face in frame")]
    NoFace,
    #[error("face region is degenerate after clamping ({width}x{height} px)")]
    DegenerateRegion { width: i64, height: i64 },
    #[error("sample timestamp went backwards: last {last_ms} ms, got {next_ms} ms")]
    NonMonotonicTimestamp { last_ms: f64, next_ms: f64 },
    #[error("frame capture failed: {0}")]
    Capture(String),
    #[error("detector model failed to load: {0}")]
    ModelLoad(String),
    #[error("sampler worker panicked")]
    WorkerPanicked,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
impl MonitorError {
    /// Degenerate-data conditions end a tick with zero estimates, not the session.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, MonitorError::NoFace | MonitorError::DegenerateRegion { .. })
    }
}
