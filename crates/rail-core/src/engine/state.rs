use crate::step::Track;

/// Estado del executor durante una ejecución.
///
/// Las transiciones válidas son:
/// - `RunningSuccess` -> `RunningFailure`
/// - `RunningSuccess` -> `Terminated`
/// - `RunningFailure` -> `Terminated`
///
/// No existe `RunningFailure` -> `RunningSuccess`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    RunningSuccess,
    RunningFailure,
    Terminated,
}

impl TrackState {
    /// Indica si un step de la vía `track` corre en este estado.
    pub fn admits(self, track: Track) -> bool {
        match self {
            TrackState::RunningSuccess => track.runs_on_success(),
            TrackState::RunningFailure => track.runs_on_failure(),
            TrackState::Terminated => false,
        }
    }

    /// Cambio de vía tras un fallo. Idempotente en la vía de fallo.
    pub fn fail(self) -> Self {
        match self {
            TrackState::RunningSuccess | TrackState::RunningFailure => TrackState::RunningFailure,
            TrackState::Terminated => TrackState::Terminated,
        }
    }

    pub fn terminate(self) -> Self {
        TrackState::Terminated
    }

    pub fn is_failure(self) -> bool {
        self == TrackState::RunningFailure
    }
}
