use std::fmt;

/// States of the ingestion state machine, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestPhase {
    Collecting,
    ConflictCheck,
    Archiving,
    Committing,
    Done,
}

impl fmt::Display for IngestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Collecting => "collecting",
            Self::ConflictCheck => "conflict check",
            Self::Archiving => "archiving",
            Self::Committing => "committing",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Events emitted by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Phase { phase: IngestPhase, message: String },
    Completed { name: String, id: i64 },
    Aborted { name: String },
    Failed { phase: IngestPhase, error: String },
}

pub trait ProgressReporter {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events to the tracing subscriber at debug level.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => {
                tracing::debug!(%phase, "{}", message);
            }
            ProgressEvent::Completed { name, id } => {
                tracing::debug!(id, "Ingested {}", name);
            }
            ProgressEvent::Aborted { name } => {
                tracing::debug!("Ingestion of {} declined", name);
            }
            ProgressEvent::Failed { phase, error } => {
                tracing::debug!(%phase, "Ingestion failed: {}", error);
            }
        }
    }
}
