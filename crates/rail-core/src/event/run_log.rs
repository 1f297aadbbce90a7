use chrono::Utc;
use uuid::Uuid;

use super::{RunEvent, RunEventKind};

/// Log append-only de una única ejecución.
///
/// Vive dentro de la invocación (igual que el `RunContext`), por lo que no
/// necesita sincronización. Con `enabled = false` los eventos se descartan.
#[derive(Debug)]
pub struct RunEventLog {
    run_id: Uuid,
    enabled: bool,
    events: Vec<RunEvent>,
}

impl RunEventLog {
    pub fn new(run_id: Uuid, enabled: bool) -> Self {
        Self { run_id,
               enabled,
               events: Vec::new() }
    }

    /// Agrega un evento a partir de su kind (asigna seq y ts).
    pub fn append_kind(&mut self, kind: RunEventKind) {
        if !self.enabled {
            return;
        }
        let seq = self.events.len() as u64;
        self.events.push(RunEvent { seq,
                                    run_id: self.run_id,
                                    kind,
                                    ts: Utc::now() });
    }

    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<RunEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Status;

    #[test]
    fn seq_is_monotonic_and_disabled_log_drops_events() {
        let id = Uuid::new_v4();
        let mut log = RunEventLog::new(id, true);
        log.append_kind(RunEventKind::StepSucceeded { step_index: 0, step: "a".into() });
        log.append_kind(RunEventKind::RunFinished { status: Status::Success });
        let seqs: Vec<u64> = log.events().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert!(log.events().iter().all(|e| e.run_id == id));

        let mut off = RunEventLog::new(id, false);
        off.append_kind(RunEventKind::RunFinished { status: Status::Failure });
        assert!(off.into_events().is_empty());
    }
}
