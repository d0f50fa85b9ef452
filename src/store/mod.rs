mod action;
mod checklist;
mod system_status;

pub use action::Action;
pub use checklist::{Checklist, CHECKLIST_ITEMS};
pub use system_status::{SystemStatus, SystemStatusUpdate};

use crate::as_str::AsStr;
use crate::phase::FlightPhase;
use crate::telemetry::{TelemetryHistory, TelemetrySample};

/// Where the mission is up to
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MissionState {
    /// is the driver ticking?
    pub is_active: bool,

    /// whole seconds since the mission started
    pub mission_time: u32,

    /// derived from the mission time, never set by the operator
    pub flight_phase: FlightPhase,

    /// one packet per tick
    pub packet_count: u32,
}

/// Everything the ground station displays, changed only through [`MissionStore::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct MissionStore {
    mission: MissionState,
    current: Option<TelemetrySample>,
    history: TelemetryHistory,
    system_status: SystemStatus,
    checklist: Checklist,
}

/// A read-only copy of the store, handed out to whoever is displaying it
pub type MissionSnapshot = MissionStore;

impl Default for MissionStore {
    fn default() -> Self {
        Self::new(TelemetryHistory::default())
    }
}

impl MissionStore {
    pub fn new(history: TelemetryHistory) -> Self {
        Self {
            mission: MissionState::default(),
            current: None,
            history,
            system_status: SystemStatus::default(),
            checklist: Checklist::default(),
        }
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self::new(TelemetryHistory::with_capacity(capacity))
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn is_active(&self) -> bool {
        self.mission.is_active
    }

    /// The latest sample, if any arrived since the last reset
    pub fn current(&self) -> Option<&TelemetrySample> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn system_status(&self) -> &SystemStatus {
        &self.system_status
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Consume the state and return it with `action` applied
    pub fn apply(mut self, action: Action) -> Self {
        self.dispatch(action);
        self
    }

    /// Apply `action` in place. Every action is total: nothing here can fail.
    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!("Applying {}", action.as_str());

        match action {
            Action::Start => {
                self.mission.is_active = true;
                self.mission.mission_time = 0;
                self.mission.packet_count = 0;
                self.history.clear();
            }
            Action::Stop => {
                self.mission.is_active = false;
            }
            Action::Reset => {
                self.mission = MissionState::default();
                self.current = None;
                self.history.clear();
            }
            Action::UpdateTelemetry(sample) => {
                self.history.push(sample.clone());
                self.current = Some(sample);
            }
            Action::UpdateMissionTime {
                mission_time,
                flight_phase,
                packet_count,
            } => {
                self.mission.mission_time = mission_time;
                self.mission.flight_phase = flight_phase;
                self.mission.packet_count = packet_count;
            }
            Action::UpdateChecklist { index, checked } => {
                if !self.checklist.set(index, checked) {
                    tracing::warn!(
                        "Ignoring update to checklist item {index}, there are only {} items.",
                        CHECKLIST_ITEMS.len()
                    );
                }
            }
            Action::UpdateSystemStatus(update) => {
                self.system_status.merge(&update);
            }
            Action::Unknown(name) => {
                tracing::debug!("Ignoring unknown action {name:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CHECKLIST_LEN;
    use crate::telemetry::tests::sample_at;

    /// a store part way through a flight with a few samples collected
    fn flying_store() -> MissionStore {
        let mut store = MissionStore::with_history_capacity(10).apply(Action::Start);
        for t in 1..=4 {
            store.dispatch(Action::UpdateMissionTime {
                mission_time: 40 + t,
                flight_phase: FlightPhase::Ascent,
                packet_count: t,
            });
            store.dispatch(Action::UpdateTelemetry(sample_at(40 + t)));
        }
        store.dispatch(Action::UpdateChecklist {
            index: 2,
            checked: true,
        });
        store
    }

    #[test]
    fn test_start_resets_counters_and_history() {
        let store = flying_store().apply(Action::Start);

        assert!(store.is_active());
        assert_eq!(store.mission().mission_time, 0);
        assert_eq!(store.mission().packet_count, 0);
        assert!(store.history().is_empty());
        // the checklist doesn't belong to the mission
        assert!(store.checklist().is_checked(2));
    }

    #[test]
    fn test_start_twice_is_the_same_as_once() {
        let once = MissionStore::default().apply(Action::Start);
        let twice = MissionStore::default()
            .apply(Action::Start)
            .apply(Action::Start);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_stop_keeps_everything_else() {
        let before = flying_store();
        let after = before.clone().apply(Action::Stop);

        assert!(!after.is_active());
        assert_eq!(after.mission().mission_time, before.mission().mission_time);
        assert_eq!(after.mission().flight_phase, FlightPhase::Ascent);
        assert_eq!(after.history(), before.history());
        assert_eq!(after.current(), before.current());
    }

    #[test]
    fn test_reset_while_active() {
        let store = flying_store();
        assert!(store.is_active());

        let store = store.apply(Action::Reset);
        assert!(!store.is_active());
        assert_eq!(store.mission(), &MissionState::default());
        assert_eq!(store.mission().flight_phase, FlightPhase::Prelaunch);
        assert_eq!(store.current(), None);
        assert!(store.history().is_empty());
        assert!(store.checklist().is_checked(2));
    }

    #[test]
    fn test_update_telemetry_sets_current_and_history() {
        let store = MissionStore::default().apply(Action::UpdateTelemetry(sample_at(7)));

        assert_eq!(store.current(), Some(&sample_at(7)));
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().latest(), Some(&sample_at(7)));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = MissionStore::with_history_capacity(10);
        for t in 1..=25 {
            store.dispatch(Action::UpdateTelemetry(sample_at(t)));
            assert!(store.history().len() <= 10);
        }

        let times: Vec<u32> = store.history().iter().map(|s| s.mission_time).collect();
        assert_eq!(times, (16..=25).collect::<Vec<_>>());
        assert_eq!(store.current().map(|s| s.mission_time), Some(25));
    }

    #[test]
    fn test_update_mission_time_is_verbatim() {
        let store = MissionStore::default().apply(Action::UpdateMissionTime {
            mission_time: 500,
            flight_phase: FlightPhase::Descent,
            packet_count: 3,
        });

        assert_eq!(
            store.mission(),
            &MissionState {
                is_active: false,
                mission_time: 500,
                flight_phase: FlightPhase::Descent,
                packet_count: 3,
            }
        );
    }

    #[test]
    fn test_checklist_toggle_round_trip() {
        let original = MissionStore::default();
        let store = original
            .clone()
            .apply(Action::UpdateChecklist {
                index: 3,
                checked: true,
            })
            .apply(Action::UpdateChecklist {
                index: 3,
                checked: false,
            });

        assert_eq!(store, original);
    }

    #[test]
    fn test_checklist_out_of_range_is_ignored() {
        let original = flying_store();
        let store = original.clone().apply(Action::UpdateChecklist {
            index: CHECKLIST_LEN,
            checked: true,
        });

        assert_eq!(store, original);
    }

    #[test]
    fn test_system_status_merge() {
        let store = MissionStore::default().apply(Action::UpdateSystemStatus(SystemStatusUpdate {
            signal_strength: Some(80.0),
            link_range: None,
        }));

        assert_eq!(store.system_status().signal_strength, 80.0);
        assert_eq!(store.system_status().link_range, 0.0);
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let original = flying_store();
        let store = original.clone().apply(Action::Unknown("LAUNCH_NOW".to_string()));

        assert_eq!(store, original);
    }
}
