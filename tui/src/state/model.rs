use std::time::{Duration, Instant};

/// High-level lifecycle states of the training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Training,
    Stopping,
    Finished,
    Error,
}

/// A single log entry shown in the event panel.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: &'static str,
    pub message: String,
}

/// Full snapshot rendered by the TUI.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub started_at: Instant,
    pub elapsed: Duration,
    pub epoch: usize,
    pub max_epochs: usize,
    pub samples: usize,
    /// The last epoch loss divided by the amount of samples.
    pub avg_loss: Option<f32>,
    pub learning_rate: f32,
    pub rollbacks: usize,
    pub decays: usize,
    pub logs: Vec<LogLine>,
}
