use anyhow::{anyhow, ensure};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Mission elapsed time, shown to the operator as `T+hh:mm:ss`
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MissionClock(pub u32);

impl MissionClock {
    pub fn as_seconds(&self) -> u32 {
        self.0
    }

    #[rustfmt::skip]
    pub fn from_hms(h: u32, m: u32, s: u32) -> anyhow::Result<Self> {
        ensure!(m < 60 && s < 60, "Invalid values for mission clock.");

        let seconds = h
            .checked_mul(3600)
            .and_then(|hs| hs.checked_add(m * 60 + s))
            .ok_or_else(|| anyhow!("Mission clock out of range."))?;
        Ok(Self(seconds))
    }
}

impl From<u32> for MissionClock {
    fn from(seconds: u32) -> Self {
        Self(seconds)
    }
}

impl FromStr for MissionClock {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s
            .strip_prefix("T+")
            .ok_or_else(|| anyhow!("Mission clock must start with T+."))?;
        let (h, s) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid mission clock."))?;
        let (m, s) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid mission clock."))?;

        Self::from_hms(h.parse()?, m.parse()?, s.parse()?)
    }
}

impl Display for MissionClock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let h = self.0 / 3600;
        let m = (self.0 / 60) % 60;
        let s = self.0 % 60;

        write!(f, "T+{h:02}:{m:02}:{s:02}")
    }
}
