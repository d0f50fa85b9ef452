use super::SystemStatusUpdate;
use crate::as_str::AsStr;
use crate::phase::FlightPhase;
use crate::telemetry::TelemetrySample;

/// Everything the store knows how to apply.
///
/// `Start`, `Stop`, `Reset` and `UpdateChecklist` come from the operator, the
/// rest are only ever issued by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// begin a fresh mission, even if one is already running
    Start,

    /// pause the mission, keeping everything collected so far
    Stop,

    /// back to the pad with nothing collected
    Reset,

    /// a new sample from the synthesizer
    UpdateTelemetry(TelemetrySample),

    /// the clock values the driver computed for this tick
    UpdateMissionTime {
        mission_time: u32,
        flight_phase: FlightPhase,
        packet_count: u32,
    },

    /// tick or untick a checklist item
    UpdateChecklist { index: usize, checked: bool },

    /// merge the present fields into the system status
    UpdateSystemStatus(SystemStatusUpdate),

    /// anything the store doesn't recognise, applied as a no-op
    Unknown(String),
}

impl AsStr for Action {
    #[rustfmt::skip]
    fn as_str(&self) -> &'static str {
        match self {
            Action::Start                 => "START",
            Action::Stop                  => "STOP",
            Action::Reset                 => "RESET",
            Action::UpdateTelemetry(_)    => "UPDATE_TELEMETRY",
            Action::UpdateMissionTime{..} => "UPDATE_MISSION_TIME",
            Action::UpdateChecklist{..}   => "UPDATE_CHECKLIST",
            Action::UpdateSystemStatus(_) => "UPDATE_SYSTEM_STATUS",
            Action::Unknown(_)            => "UNKNOWN",
        }
    }
}
