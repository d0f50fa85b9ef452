use crate::constants::PAD_ELEVATION;
use crate::geodesic::WorldPosition;
use crate::telemetry::TelemetrySample;

/// How far the signal strength drops per metre of range
const SIGNAL_LOSS_PER_M: f64 = 0.02;

/// Display-only link health, recomputed from every sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemStatus {
    /// received signal strength, percent
    pub signal_strength: f64,

    /// slant range from the ground station to the vehicle, metres
    pub link_range: f64,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            signal_strength: 100.0,
            link_range: 0.0,
        }
    }
}

impl SystemStatus {
    /// last write wins for every field that is present
    pub fn merge(&mut self, update: &SystemStatusUpdate) {
        if let Some(signal_strength) = update.signal_strength {
            self.signal_strength = signal_strength;
        }
        if let Some(link_range) = update.link_range {
            self.link_range = link_range;
        }
    }
}

/// A partial [`SystemStatus`], only the `Some` fields get written
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SystemStatusUpdate {
    pub signal_strength: Option<f64>,
    pub link_range: Option<f64>,
}

impl SystemStatusUpdate {
    /// Link health for a sample taken at `mission_time`
    pub fn from_sample(mission_time: u32, sample: &TelemetrySample) -> Self {
        let vehicle = WorldPosition::new(
            sample.gnss.latitude,
            sample.gnss.longitude,
            PAD_ELEVATION + sample.altitude,
        );
        let link_range = WorldPosition::ground_station().approx_linear_distance(&vehicle);

        // a little fading that repeats every few seconds
        let fade = (mission_time % 5) as f64 * 0.5;
        let signal_strength = (100.0 - link_range * SIGNAL_LOSS_PER_M - fade).clamp(0.0, 100.0);

        Self {
            signal_strength: Some(signal_strength),
            link_range: Some(link_range),
        }
    }
}
