use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use shared_models::slot::{DAY_END_MINUTES, DAY_START_MINUTES, SLOT_MINUTES};
use shared_models::{AppointmentDetails, TimeSlot};

use crate::models::AppointmentError;

pub struct SlotAllocator;

impl SlotAllocator {
    /// The full clinic day: 09:00 AM through 04:45 PM, every 15 minutes.
    pub fn daily_grid() -> Vec<TimeSlot> {
        (DAY_START_MINUTES..DAY_END_MINUTES)
            .step_by(SLOT_MINUTES as usize)
            .filter_map(TimeSlot::from_minutes)
            .collect()
    }

    /// Slots still free for `doctor` on `date`, in grid order.
    ///
    /// Until both a doctor and a date are chosen the whole grid is offered.
    pub fn available_slots<'a, I>(
        booked: I,
        doctor: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Vec<TimeSlot>
    where
        I: IntoIterator<Item = &'a AppointmentDetails>,
    {
        let grid = Self::daily_grid();

        let (doctor, date) = match (doctor, date) {
            (Some(doctor), Some(date)) if !doctor.is_empty() => (doctor, date),
            _ => return grid,
        };

        let taken: HashSet<TimeSlot> = booked
            .into_iter()
            .filter(|a| a.doctor == doctor && a.date == date)
            .map(|a| a.time)
            .collect();

        debug!("{} of {} slots taken for {} on {}", taken.len(), grid.len(), doctor, date);

        grid.into_iter().filter(|slot| !taken.contains(slot)).collect()
    }

    /// Appointments can be made for `today` or any later date.
    pub fn check_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, AppointmentError> {
        if date < today {
            return Err(AppointmentError::PastDate(date));
        }
        Ok(date)
    }

    /// Keeps a previous selection only while it is still offered.
    pub fn retain_selection(selected: Option<TimeSlot>, available: &[TimeSlot]) -> Option<TimeSlot> {
        selected.filter(|slot| available.contains(slot))
    }
}
