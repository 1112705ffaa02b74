use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    /// Share of the energy charge kept by the platform
    pub platform_fee_rate: f64,
    /// Goods and services tax applied to the energy charge
    pub gst_rate: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            platform_fee_rate: 0.05,
            gst_rate: 0.18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationPolicy {
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub step_minutes: u32,
    pub default_minutes: u32,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        DurationPolicy {
            min_minutes: 30,
            max_minutes: 240,
            step_minutes: 15,
            default_minutes: 60,
        }
    }
}

impl DurationPolicy {
    pub fn validate(&self, minutes: u32) -> Result<(), BookingError> {
        if minutes < self.min_minutes || minutes > self.max_minutes {
            return Err(BookingError::invalid_input(format!(
                "duration must be between {} and {} minutes, got {}",
                self.min_minutes, self.max_minutes, minutes
            )));
        }
        if self.step_minutes > 0 && (minutes - self.min_minutes) % self.step_minutes != 0 {
            return Err(BookingError::invalid_input(format!(
                "duration must move in steps of {} minutes, got {}",
                self.step_minutes, minutes
            )));
        }
        Ok(())
    }
}

/// Bookable start times of a day, from `first_slot` to `last_slot` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSchedule {
    pub first_slot: NaiveTime,
    pub last_slot: NaiveTime,
    pub interval_minutes: u32,
}

impl Default for SlotSchedule {
    fn default() -> Self {
        SlotSchedule {
            first_slot: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time"),
            last_slot: NaiveTime::from_hms_opt(20, 30, 0).expect("20:30 is a valid time"),
            interval_minutes: 30,
        }
    }
}

impl SlotSchedule {
    pub fn slots(&self) -> Vec<NaiveTime> {
        if self.interval_minutes == 0 {
            return vec![self.first_slot];
        }
        let step = chrono::Duration::minutes(i64::from(self.interval_minutes));
        let mut slots = Vec::new();
        let mut slot = self.first_slot;
        while slot <= self.last_slot {
            slots.push(slot);
            let (next, wrapped) = slot.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            slot = next;
        }
        slots
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.slots().contains(&time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPolicy {
    pub fees: FeeSchedule,
    pub duration: DurationPolicy,
    pub slots: SlotSchedule,
}

impl BookingPolicy {
    /// Bookings open the day after `today`.
    pub fn earliest_date(&self, today: NaiveDate) -> NaiveDate {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}
