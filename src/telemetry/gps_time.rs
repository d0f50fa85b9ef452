use anyhow::{ensure, Result};
use chrono::{DateTime, Timelike, Utc};
use parse_display::{Display, FromStr};

/// time from the GPS receiver
/// reported in UTC with a resolution of a second
#[derive(Display, FromStr, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[display("{h:02}:{m:02}:{s:02}")]
#[from_str(new = Self::new(h, m, s))]
pub struct GpsTime {
    /// Hours
    pub h: u8,

    /// Minutes
    pub m: u8,

    /// Seconds
    pub s: u8,
}

impl GpsTime {
    fn new(h: u8, m: u8, s: u8) -> Result<Self> {
        ensure!(h < 24 && m < 60 && s < 60, "Invalid values for gps_time.");

        Ok(Self { h, m, s })
    }
}

impl From<&DateTime<Utc>> for GpsTime {
    fn from(time: &DateTime<Utc>) -> Self {
        Self {
            h: time.hour() as u8,
            m: time.minute() as u8,
            s: time.second() as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_gps_time_fromstr_invalid() {
        let s = "24:34:56";
        let ts = s.parse::<GpsTime>();
        ts.unwrap_err();

        let s = "12:60:56";
        let ts = s.parse::<GpsTime>();
        ts.unwrap_err();

        let s = "12:34:60";
        let ts = s.parse::<GpsTime>();
        ts.unwrap_err();
    }

    #[test]
    fn test_gps_time_display_low_numbers() {
        let gt = GpsTime { h: 1, m: 2, s: 3 };

        assert_eq!(format!("{}", gt), "01:02:03".to_string())
    }

    #[test]
    fn test_gps_time_from_utc() {
        let utc = Utc.with_ymd_and_hms(2022, 6, 11, 15, 12, 3).unwrap();

        assert_eq!(GpsTime::from(&utc), GpsTime { h: 15, m: 12, s: 3 });
    }
}
