use super::GpsTime;

/// A fix from the GNSS receiver
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gnss {
    /// decimal degrees North
    pub latitude: f64,

    /// decimal degrees, negative is West
    pub longitude: f64,

    /// metres above mean sea level
    pub altitude: f64,

    /// number of satellites being tracked
    pub satellites: u8,

    /// UTC time of the fix
    pub time: GpsTime,
}
