use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// First bookable minute of the clinic day (09:00).
pub const DAY_START_MINUTES: u32 = 9 * 60;
/// End of the clinic day (17:00), exclusive.
pub const DAY_END_MINUTES: u32 = 17 * 60;
pub const SLOT_MINUTES: u32 = 15;

const DISPLAY_FORMAT: &str = "%I:%M %p";

/// A 15-minute appointment slot on the clinic's daily grid.
///
/// Rendered and parsed in 12-hour form with zero-padded hours, e.g.
/// `09:00 AM`, `12:00 PM`, `04:45 PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Builds the slot starting `minutes` after midnight, if it lies on the grid.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < DAY_START_MINUTES
            || minutes >= DAY_END_MINUTES
            || (minutes - DAY_START_MINUTES) % SLOT_MINUTES != 0
        {
            return None;
        }
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).map(Self)
    }

    pub fn minutes(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a bookable time slot")]
pub struct InvalidTimeSlot(pub String);

impl FromStr for TimeSlot {
    type Err = InvalidTimeSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), DISPLAY_FORMAT)
            .map_err(|_| InvalidTimeSlot(s.to_string()))?;
        if time.second() != 0 {
            return Err(InvalidTimeSlot(s.to_string()));
        }
        Self::from_minutes(time.hour() * 60 + time.minute())
            .ok_or_else(|| InvalidTimeSlot(s.to_string()))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padded_twelve_hour_clock() {
        assert_eq!(TimeSlot::from_minutes(9 * 60).unwrap().to_string(), "09:00 AM");
        assert_eq!(TimeSlot::from_minutes(12 * 60).unwrap().to_string(), "12:00 PM");
        assert_eq!(TimeSlot::from_minutes(16 * 60 + 45).unwrap().to_string(), "04:45 PM");
    }

    #[test]
    fn rejects_minutes_off_the_grid() {
        assert!(TimeSlot::from_minutes(8 * 60 + 45).is_none());
        assert!(TimeSlot::from_minutes(17 * 60).is_none());
        assert!(TimeSlot::from_minutes(10 * 60 + 5).is_none());
    }

    #[test]
    fn parses_display_form() {
        let slot: TimeSlot = "01:30 PM".parse().unwrap();
        assert_eq!(slot.minutes(), 13 * 60 + 30);
        assert!("05:00 PM".parse::<TimeSlot>().is_err());
        assert!("10:07 AM".parse::<TimeSlot>().is_err());
        assert!("noon".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn serializes_as_display_string() {
        let slot = TimeSlot::from_minutes(10 * 60).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"10:00 AM\"");
        let back: TimeSlot = serde_json::from_str("\"10:00 AM\"").unwrap();
        assert_eq!(back, slot);
    }
}
