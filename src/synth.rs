use crate::constants::*;
use crate::phase::{FlightPhase, PhaseTable};
use crate::telemetry::{Axes, Gnss, GpsTime, TelemetrySample};
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Height of the flight profile at apogee, metres above the pad
const APOGEE_ALTITUDE: f64 = 1000.0;

/// Height the vehicle reaches by the end of the launch phase
const BURNOUT_ALTITUDE: f64 = 200.0;

/// Pressure lapse near the ground, pascals per metre
const PRESSURE_LAPSE: f64 = 12.0;

/// Temperature lapse of the standard atmosphere, celsius per metre
const TEMPERATURE_LAPSE: f64 = 0.0065;

/// Battery drain, volts per second of mission time
const VOLTAGE_DRAIN: f64 = 0.005;

/// Sink rate under the main parachute, m/s
const PARACHUTE_SINK_RATE: f64 = 5.0;

const GRAVITY: f64 = 9.81;

/// Turns a mission time and flight phase into a plausible set of sensor readings.
///
/// Every call is evaluated from scratch: the only thing carried between calls
/// is the random source, so a seeded synthesizer always produces the same
/// samples for the same inputs.
pub struct Synthesizer<R = StdRng> {
    rng: R,
    phases: PhaseTable,
    /// wall clock time of mission time zero
    epoch: DateTime<Utc>,
}

impl Synthesizer<StdRng> {
    /// Reproducible noise, for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Synthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            phases: PhaseTable::default(),
            epoch: Utc::now(),
        }
    }

    pub fn with_phases(mut self, phases: PhaseTable) -> Self {
        self.phases = phases;
        self
    }

    pub fn with_epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = epoch;
        self
    }

    /// Set the wall clock time that mission time zero corresponds to
    pub fn set_epoch(&mut self, epoch: DateTime<Utc>) {
        self.epoch = epoch;
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// uniform noise in `[-half_width, half_width]`
    fn noise(&mut self, half_width: f64) -> f64 {
        let half_width = half_width.abs();
        self.rng.sample(Uniform::new_inclusive(-half_width, half_width))
    }

    /// how far through `phase` we are (0 to 1), and the phase duration
    fn progress(&self, mission_time: u32, phase: FlightPhase) -> (f64, f64) {
        let start = self.phases.phase_start(phase).unwrap_or(mission_time);
        let duration = self.phases.duration(phase).unwrap_or(1).max(1) as f64;
        let since_start = mission_time.saturating_sub(start) as f64;

        ((since_start / duration).clamp(0.0, 1.0), duration)
    }

    /// The altitude curve and vertical velocity for the phase, before noise
    fn profile(&self, mission_time: u32, phase: FlightPhase) -> (f64, f64) {
        let (p, duration) = self.progress(mission_time, phase);

        match phase {
            FlightPhase::Launch => (
                BURNOUT_ALTITUDE * p.powf(2.2),
                BURNOUT_ALTITUDE * 2.2 / duration * p.powf(1.2),
            ),
            FlightPhase::Ascent => {
                let climb = APOGEE_ALTITUDE - BURNOUT_ALTITUDE;
                (
                    BURNOUT_ALTITUDE + climb * (1.6 * p - 0.6 * p.powf(2.5)),
                    climb * (1.6 - 1.5 * p.powf(1.5)) / duration,
                )
            }
            FlightPhase::Apogee | FlightPhase::Separation => (APOGEE_ALTITUDE, 0.0),
            FlightPhase::Descent => (
                APOGEE_ALTITUDE * (1.0 - p).powi(2),
                -(2.0 * APOGEE_ALTITUDE * (1.0 - p) / duration + PARACHUTE_SINK_RATE),
            ),
            FlightPhase::Prelaunch | FlightPhase::Impact => (0.0, 0.0),
        }
    }

    pub fn synthesize(
        &mut self,
        mission_time: u32,
        phase: FlightPhase,
        packet_count: u32,
    ) -> TelemetrySample {
        let (curve_altitude, curve_velocity) = self.profile(mission_time, phase);

        let altitude_noise = match phase {
            FlightPhase::Prelaunch | FlightPhase::Impact => 0.5,
            FlightPhase::Apogee | FlightPhase::Separation => 5.0,
            _ => 2.0,
        };
        let altitude = (curve_altitude + self.noise(altitude_noise)).max(0.0);

        let velocity = match phase {
            FlightPhase::Launch | FlightPhase::Ascent | FlightPhase::Descent => {
                curve_velocity + self.noise(1.0)
            }
            _ => self.noise(0.2),
        };

        let pressure = SEALEVEL_PA - PRESSURE_LAPSE * altitude + self.noise(50.0);
        let temperature = SEALEVEL_C - TEMPERATURE_LAPSE * altitude + self.noise(0.5);
        let voltage = (BATTERY_FULL_V - VOLTAGE_DRAIN * mission_time as f64 + self.noise(0.05))
            .max(VOLTAGE_FLOOR);

        // higher loads while the motor is burning
        let (accel_noise, gyro_noise) = if phase.is_powered() {
            (5.0, 15.0)
        } else {
            (0.5, 1.0)
        };
        let thrust = match phase {
            FlightPhase::Launch => 40.0,
            FlightPhase::Ascent => 10.0,
            _ => 0.0,
        };
        let acceleration = Axes::new(
            self.noise(accel_noise),
            self.noise(accel_noise),
            GRAVITY + thrust + self.noise(accel_noise),
        );
        let gyroscope = Axes::new(
            self.noise(gyro_noise),
            self.noise(gyro_noise),
            self.noise(gyro_noise),
        );

        let timestamp = self.epoch + Duration::seconds(mission_time as i64);
        let satellites = (8.0 + self.noise(3.0)).round().max(MIN_SATELLITES as f64) as u8;
        let gnss = Gnss {
            latitude: PAD_LATITUDE + self.noise(0.0001),
            longitude: PAD_LONGITUDE + self.noise(0.0001),
            altitude: PAD_ELEVATION + altitude + self.noise(2.0),
            satellites,
            time: GpsTime::from(&timestamp),
        };

        let sample = TelemetrySample {
            team_id: TEAM_ID,
            timestamp,
            mission_time,
            packet_count,
            flight_phase: phase,
            altitude,
            pressure,
            temperature,
            voltage,
            velocity,
            acceleration,
            gyroscope,
            gnss,
        };
        tracing::trace!("Generated sample = {sample}");

        sample
    }
}
