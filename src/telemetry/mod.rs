mod axes;
mod gnss;
mod gps_time;
mod history;
mod mission_time;

pub use axes::Axes;
pub use gnss::Gnss;
pub use gps_time::GpsTime;
pub use history::TelemetryHistory;
pub use mission_time::MissionClock;

use crate::as_str::AsStr;
use crate::phase::FlightPhase;
use chrono::{DateTime, SecondsFormat, Utc};
use enum_iterator::{all, Sequence};
use std::fmt;
use std::io::{self, Write};

/// One synthesized snapshot of every sensor on the vehicle
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetrySample {
    /// TEAM_ID: four digit team identification number
    pub team_id: u16,

    /// TIMESTAMP: UTC time the sample was taken
    pub timestamp: DateTime<Utc>,

    /// MISSION_TIME: whole seconds since the mission started
    pub mission_time: u32,

    /// PACKET_COUNT: count of packets sent since the mission started
    pub packet_count: u32,

    /// FLIGHT_PHASE: the phase the vehicle was in when sampled
    pub flight_phase: FlightPhase,

    /// ALTITUDE: height in metres above the launch site, never negative
    pub altitude: f64,

    /// PRESSURE: barometric pressure in pascals
    pub pressure: f64,

    /// TEMPERATURE: air temperature in celsius
    pub temperature: f64,

    /// VOLTAGE: battery bus voltage, never below the battery floor
    pub voltage: f64,

    /// VELOCITY: vertical velocity in m/s, positive is up
    pub velocity: f64,

    /// ACCELERATION: body acceleration in m/s^2
    pub acceleration: Axes,

    /// GYROSCOPE: body rates in deg/s
    pub gyroscope: Axes,

    /// GNSS: the receiver's latest fix
    pub gnss: Gnss,
}

impl TelemetrySample {
    /// true when no channel is NaN or infinite
    pub fn is_finite(&self) -> bool {
        [
            self.altitude,
            self.pressure,
            self.temperature,
            self.voltage,
            self.velocity,
            self.gnss.latitude,
            self.gnss.longitude,
            self.gnss.altitude,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.acceleration.is_finite()
            && self.gyroscope.is_finite()
    }

    #[rustfmt::skip]
    pub fn get_field(&self, field: TelemetryField) -> String {
        match field {
            TelemetryField::TeamId        => format!("{}", self.team_id),
            TelemetryField::Timestamp     => self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            TelemetryField::MissionTime   => format!("{}", self.mission_time),
            TelemetryField::PacketCount   => format!("{}", self.packet_count),
            TelemetryField::FlightPhase   => format!("{}", self.flight_phase),
            TelemetryField::Altitude      => format!("{:.1}", self.altitude),
            TelemetryField::Pressure      => format!("{:.1}", self.pressure),
            TelemetryField::Temperature   => format!("{:.1}", self.temperature),
            TelemetryField::Voltage       => format!("{:.2}", self.voltage),
            TelemetryField::Velocity      => format!("{:.1}", self.velocity),
            TelemetryField::AccelX        => format!("{:.2}", self.acceleration.x),
            TelemetryField::AccelY        => format!("{:.2}", self.acceleration.y),
            TelemetryField::AccelZ        => format!("{:.2}", self.acceleration.z),
            TelemetryField::GyroX         => format!("{:.2}", self.gyroscope.x),
            TelemetryField::GyroY         => format!("{:.2}", self.gyroscope.y),
            TelemetryField::GyroZ         => format!("{:.2}", self.gyroscope.z),
            TelemetryField::GnssLatitude  => format!("{:.4}", self.gnss.latitude),
            TelemetryField::GnssLongitude => format!("{:.4}", self.gnss.longitude),
            TelemetryField::GnssAltitude  => format!("{:.1}", self.gnss.altitude),
            TelemetryField::GnssSats      => format!("{}", self.gnss.satellites),
            TelemetryField::GnssTime      => format!("{}", self.gnss.time),
        }
    }
}

/// The sample as one CSV record, fields in [`TelemetryField`] order
impl fmt::Display for TelemetrySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in all::<TelemetryField>().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&self.get_field(field))?;
        }
        Ok(())
    }
}

/// Every exported column, in export order
#[derive(Sequence, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TelemetryField {
    TeamId,
    Timestamp,
    MissionTime,
    PacketCount,
    FlightPhase,
    Altitude,
    Pressure,
    Temperature,
    Voltage,
    Velocity,
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
    GnssLatitude,
    GnssLongitude,
    GnssAltitude,
    GnssSats,
    GnssTime,
}

impl AsStr for TelemetryField {
    #[rustfmt::skip]
    fn as_str(&self) -> &'static str {
        match self {
            TelemetryField::TeamId        => "TEAM_ID",
            TelemetryField::Timestamp     => "TIMESTAMP",
            TelemetryField::MissionTime   => "MISSION_TIME",
            TelemetryField::PacketCount   => "PACKET_COUNT",
            TelemetryField::FlightPhase   => "FLIGHT_PHASE",
            TelemetryField::Altitude      => "ALTITUDE",
            TelemetryField::Pressure      => "PRESSURE",
            TelemetryField::Temperature   => "TEMPERATURE",
            TelemetryField::Voltage       => "VOLTAGE",
            TelemetryField::Velocity      => "VELOCITY",
            TelemetryField::AccelX        => "ACCEL_X",
            TelemetryField::AccelY        => "ACCEL_Y",
            TelemetryField::AccelZ        => "ACCEL_Z",
            TelemetryField::GyroX         => "GYRO_X",
            TelemetryField::GyroY         => "GYRO_Y",
            TelemetryField::GyroZ         => "GYRO_Z",
            TelemetryField::GnssLatitude  => "GNSS_LATITUDE",
            TelemetryField::GnssLongitude => "GNSS_LONGITUDE",
            TelemetryField::GnssAltitude  => "GNSS_ALTITUDE",
            TelemetryField::GnssSats      => "GNSS_SATS",
            TelemetryField::GnssTime      => "GNSS_TIME",
        }
    }
}

impl fmt::Display for TelemetryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The header row of the export
pub fn csv_header() -> String {
    all::<TelemetryField>()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Write the header followed by one row per sample, returns the number of rows written
pub fn export_csv<'a, W, I>(mut writer: W, samples: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a TelemetrySample>,
{
    writeln!(writer, "{}", csv_header())?;

    let mut rows = 0;
    for sample in samples {
        writeln!(writer, "{sample}")?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// A fixed, easy to read sample taken `t` seconds into the mission
    pub(crate) fn sample_at(t: u32) -> TelemetrySample {
        let timestamp =
            Utc.with_ymd_and_hms(2022, 6, 11, 15, 12, 0).unwrap() + Duration::seconds(t as i64);

        TelemetrySample {
            team_id: 1047,
            timestamp,
            mission_time: t,
            packet_count: t,
            flight_phase: FlightPhase::Ascent,
            altitude: 356.2,
            pressure: 97049.0,
            temperature: 12.7,
            voltage: 12.4,
            velocity: 21.3,
            acceleration: Axes::new(0.5, -0.25, 38.1),
            gyroscope: Axes::new(1.0, 2.0, -3.0),
            gnss: Gnss {
                latitude: 37.2249,
                longitude: -80.4249,
                altitude: 1956.3,
                satellites: 9,
                time: GpsTime::from(&timestamp),
            },
        }
    }

    #[test]
    fn test_csv_header_order() {
        assert_eq!(
            csv_header(),
            "TEAM_ID,TIMESTAMP,MISSION_TIME,PACKET_COUNT,FLIGHT_PHASE,ALTITUDE,PRESSURE,\
            TEMPERATURE,VOLTAGE,VELOCITY,ACCEL_X,ACCEL_Y,ACCEL_Z,GYRO_X,GYRO_Y,GYRO_Z,\
            GNSS_LATITUDE,GNSS_LONGITUDE,GNSS_ALTITUDE,GNSS_SATS,GNSS_TIME"
        );
    }

    #[test]
    fn test_sample_csv_record() {
        let sample = sample_at(45);

        assert_eq!(
            format!("{sample}"),
            "1047,2022-06-11T15:12:45.000Z,45,45,ASCENT,356.2,97049.0,12.7,12.40,21.3,\
            0.50,-0.25,38.10,1.00,2.00,-3.00,37.2249,-80.4249,1956.3,9,15:12:45"
        );
    }

    #[test]
    fn test_record_matches_header_width() {
        let header_cols = csv_header().split(',').count();
        let record_cols = format!("{}", sample_at(1)).split(',').count();

        assert_eq!(header_cols, record_cols);
    }

    #[test]
    fn test_export_csv_writes_every_row() {
        let samples = [sample_at(1), sample_at(2), sample_at(3)];
        let mut out = vec![];

        let rows = export_csv(&mut out, &samples).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(rows, 3);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], csv_header());
        assert!(lines[3].starts_with("1047,2022-06-11T15:12:03.000Z,3,3,"));
    }

    #[test]
    fn test_is_finite() {
        let mut sample = sample_at(1);
        assert!(sample.is_finite());

        sample.gyroscope.y = f64::NAN;
        assert!(!sample.is_finite());
    }
}
