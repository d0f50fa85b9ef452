use std::time::Duration;

/// our TEAM ID
pub const TEAM_ID: u16 = 1047;

/// Sea level pressure in pascals
pub const SEALEVEL_PA: f64 = 101_325.0;

/// Sea level temperature in celsius
pub const SEALEVEL_C: f64 = 15.0;

/// Launch pad latitude in decimal degrees North
pub const PAD_LATITUDE: f64 = 37.2249;

/// Launch pad longitude in decimal degrees
pub const PAD_LONGITUDE: f64 = -80.4249;

/// made up height of the launch pad above mean sea level, in metres
pub const PAD_ELEVATION: f64 = 1600.0;

/// Fully charged battery voltage
pub const BATTERY_FULL_V: f64 = 12.6;

/// The battery voltage never reads below this
pub const VOLTAGE_FLOOR: f64 = 10.5;

/// The fewest GNSS satellites a sample will report
pub const MIN_SATELLITES: u8 = 4;

/// Number of items on the pre-flight checklist
pub const CHECKLIST_LEN: usize = 11;

/// Default number of samples kept in the telemetry history
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Default time between driver ticks
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// The file to export the telemetry to
pub const TELEMETRY_FILE: &str = "Flight_1047.csv";
