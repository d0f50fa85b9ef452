use crate::constants::CHECKLIST_LEN;

/// The pre-flight checklist, in the order the operator works through it
pub const CHECKLIST_ITEMS: [&str; CHECKLIST_LEN] = [
    "Ground station powered and logging",
    "Telemetry link established",
    "Battery voltage nominal",
    "GNSS lock acquired",
    "IMU calibrated",
    "Barometer zeroed at pad",
    "Recovery system armed",
    "Payload secured",
    "Range clear",
    "Weather within limits",
    "Launch authority go",
];

/// Completion flags for [`CHECKLIST_ITEMS`].
///
/// Lives independently of the mission: nothing but an explicit update ever
/// changes an item.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Checklist {
    items: [bool; CHECKLIST_LEN],
}

impl Checklist {
    /// Set an item, returns false (and changes nothing) for an index off the end
    pub fn set(&mut self, index: usize, checked: bool) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                *item = checked;
                true
            }
            None => false,
        }
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.items.get(index).copied().unwrap_or(false)
    }

    pub fn completed(&self) -> usize {
        self.items.iter().filter(|&&checked| checked).count()
    }

    pub fn is_complete(&self) -> bool {
        self.completed() == CHECKLIST_LEN
    }

    /// (label, checked) for every item
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        CHECKLIST_ITEMS.iter().copied().zip(self.items.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_set_and_clear() {
        let mut checklist = Checklist::default();

        assert!(checklist.set(3, true));
        assert!(checklist.is_checked(3));
        assert_eq!(checklist.completed(), 1);

        assert!(checklist.set(3, false));
        assert_eq!(checklist, Checklist::default());
    }

    #[test]
    fn test_checklist_ignores_out_of_range() {
        let mut checklist = Checklist::default();

        assert!(!checklist.set(CHECKLIST_LEN, true));
        assert!(!checklist.set(usize::MAX, true));
        assert!(!checklist.is_checked(CHECKLIST_LEN));
        assert_eq!(checklist, Checklist::default());
    }

    #[test]
    fn test_checklist_complete() {
        let mut checklist = Checklist::default();
        for i in 0..CHECKLIST_LEN {
            assert!(!checklist.is_complete());
            checklist.set(i, true);
        }

        assert!(checklist.is_complete());
        assert!(checklist.iter().all(|(_, checked)| checked));
    }
}
