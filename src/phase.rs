use crate::as_str::AsStr;
use anyhow::{ensure, Result};
use enum_iterator::Sequence;
use parse_display::{Display, FromStr};

/// The stages of the flight, in the order they happen
#[derive(Display, FromStr, Sequence, Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlightPhase {
    /// Sitting on the pad waiting for ignition
    #[default]
    #[display("PRELAUNCH")]
    Prelaunch,

    /// Motor burning, leaving the rail
    #[display("LAUNCH")]
    Launch,

    /// Climbing towards apogee
    #[display("ASCENT")]
    Ascent,

    #[display("APOGEE")]
    Apogee,

    /// Payload separating from the vehicle
    #[display("SEPARATION")]
    Separation,

    /// Under parachute
    #[display("DESCENT")]
    Descent,

    /// On the ground, stays here forever
    #[display("IMPACT")]
    Impact,
}

impl AsStr for FlightPhase {
    #[rustfmt::skip]
    fn as_str(&self) -> &'static str {
        match self {
            FlightPhase::Prelaunch  => "Pre-launch",
            FlightPhase::Launch     => "Launch",
            FlightPhase::Ascent     => "Ascent",
            FlightPhase::Apogee     => "Apogee",
            FlightPhase::Separation => "Separation",
            FlightPhase::Descent    => "Descent",
            FlightPhase::Impact     => "Impact",
        }
    }
}

impl FlightPhase {
    /// Phases where the vehicle is under thrust and sees high dynamic loads
    pub fn is_powered(&self) -> bool {
        matches!(self, FlightPhase::Launch | FlightPhase::Ascent)
    }
}

/// One row of the phase table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PhaseEntry {
    pub phase: FlightPhase,

    /// how long the phase lasts, in seconds
    pub duration: u32,
}

impl PhaseEntry {
    pub const fn new(phase: FlightPhase, duration: u32) -> Self {
        Self { phase, duration }
    }
}

/// Nominal phase durations in seconds. The last entry is the terminal phase
/// so its duration is never used for the lookup.
#[rustfmt::skip]
pub const DEFAULT_PHASES: [PhaseEntry; 7] = [
    PhaseEntry::new(FlightPhase::Prelaunch,  30),
    PhaseEntry::new(FlightPhase::Launch,     10),
    PhaseEntry::new(FlightPhase::Ascent,     45),
    PhaseEntry::new(FlightPhase::Apogee,      5),
    PhaseEntry::new(FlightPhase::Separation,  2),
    PhaseEntry::new(FlightPhase::Descent,   120),
    PhaseEntry::new(FlightPhase::Impact,      5),
];

/// Ordered table of phases, looked up by mission time.
///
/// The lookup holds no state: the phase is recomputed from the mission time
/// every time, so resetting or jumping the clock always gives the right phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTable {
    entries: Vec<PhaseEntry>,
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PHASES.to_vec(),
        }
    }
}

impl PhaseTable {
    pub fn new(entries: Vec<PhaseEntry>) -> Result<Self> {
        ensure!(!entries.is_empty(), "The phase table needs at least one phase.");
        ensure!(
            entries.windows(2).all(|w| w[0].phase < w[1].phase),
            "Phases must appear once each, in flight order."
        );

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PhaseEntry] {
        &self.entries
    }

    /// The phase the mission sits in once the table runs out
    pub fn terminal(&self) -> FlightPhase {
        self.entries
            .last()
            .map_or(FlightPhase::Impact, |entry| entry.phase)
    }

    /// The first phase whose cumulative upper bound exceeds `mission_time`,
    /// or the terminal phase past the end of the table.
    pub fn phase_at(&self, mission_time: u32) -> FlightPhase {
        let mut upper = 0u32;
        for entry in &self.entries {
            upper = upper.saturating_add(entry.duration);
            if mission_time < upper {
                return entry.phase;
            }
        }

        self.terminal()
    }

    /// Mission time at which `phase` begins
    pub fn phase_start(&self, phase: FlightPhase) -> Option<u32> {
        let mut start = 0u32;
        for entry in &self.entries {
            if entry.phase == phase {
                return Some(start);
            }
            start = start.saturating_add(entry.duration);
        }

        None
    }

    pub fn duration(&self, phase: FlightPhase) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.phase == phase)
            .map(|entry| entry.duration)
    }

    /// Sum of every duration in the table
    pub fn total_duration(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, entry| acc.saturating_add(entry.duration))
    }

    /// Mission time from which only the terminal phase is reported
    pub fn terminal_threshold(&self) -> u32 {
        self.phase_start(self.terminal()).unwrap_or_default()
    }
}
