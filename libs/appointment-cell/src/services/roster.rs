use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::{AppointmentDetails, BookingRecord, TimeSlot};

use crate::models::{AppointmentError, DashboardEntry, SessionKey};
use crate::services::slots::SlotAllocator;

pub type SharedRoster = Arc<RwLock<BookingRoster>>;

pub const DEFAULT_HOLD_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
struct SlotHold {
    appointment: AppointmentDetails,
    placed_at: Instant,
}

/// Process-wide booking list.
///
/// Records are append-only and never modified. Follow-up questions live in a
/// separate map keyed by booking id. A session holds its chosen slot between
/// the booking step and finalisation so that no two sessions can end up on the
/// same (doctor, date, slot) triple. A hold lapses after `hold_ttl`; lapsed
/// holds no longer block anyone.
#[derive(Debug)]
pub struct BookingRoster {
    records: Vec<BookingRecord>,
    follow_ups: HashMap<Uuid, String>,
    holds: HashMap<SessionKey, SlotHold>,
    hold_ttl: Duration,
}

impl Default for BookingRoster {
    fn default() -> Self {
        Self::with_hold_ttl(DEFAULT_HOLD_TTL)
    }
}

impl BookingRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hold_ttl(hold_ttl: Duration) -> Self {
        Self {
            records: Vec::new(),
            follow_ups: HashMap::new(),
            holds: HashMap::new(),
            hold_ttl,
        }
    }

    pub fn shared() -> SharedRoster {
        Self::new().into_shared()
    }

    pub fn into_shared(self) -> SharedRoster {
        Arc::new(RwLock::new(self))
    }

    pub fn hold_ttl(&self) -> Duration {
        self.hold_ttl
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, booking_id: Uuid) -> Option<&BookingRecord> {
        self.records.iter().find(|r| r.id == booking_id)
    }

    /// The slot `holder` currently has reserved, unless the hold has lapsed.
    pub fn hold_for(&self, holder: SessionKey) -> Option<&AppointmentDetails> {
        self.holds
            .get(&holder)
            .filter(|hold| self.is_live(hold))
            .map(|hold| &hold.appointment)
    }

    fn is_live(&self, hold: &SlotHold) -> bool {
        hold.placed_at.elapsed() < self.hold_ttl
    }

    /// Every occupied appointment: finalised records followed by live holds.
    pub fn booked_appointments(&self) -> impl Iterator<Item = &AppointmentDetails> {
        self.records.iter().map(|r| &r.appointment).chain(
            self.holds
                .values()
                .filter(move |hold| self.is_live(hold))
                .map(|hold| &hold.appointment),
        )
    }

    pub fn available_slots(&self, doctor: Option<&str>, date: Option<NaiveDate>) -> Vec<TimeSlot> {
        SlotAllocator::available_slots(self.booked_appointments(), doctor, date)
    }

    /// True when nothing but `holder`'s own hold occupies the appointment's slot.
    pub fn is_available(&self, appointment: &AppointmentDetails, holder: SessionKey) -> bool {
        let taken_by_record = self.records.iter().any(|r| r.appointment.same_slot(appointment));
        let taken_by_hold = self
            .holds
            .iter()
            .any(|(key, held)| {
                *key != holder && self.is_live(held) && held.appointment.same_slot(appointment)
            });
        !(taken_by_record || taken_by_hold)
    }

    /// Reserves the slot for `holder`, replacing any earlier hold it had.
    /// The hold lasts `hold_ttl` from now.
    pub fn hold(
        &mut self,
        holder: SessionKey,
        appointment: AppointmentDetails,
    ) -> Result<(), AppointmentError> {
        self.prune_expired_holds();

        if !self.is_available(&appointment, holder) {
            warn!(
                "Hold refused for session {}: {} {} {} is taken",
                holder, appointment.doctor, appointment.date, appointment.time
            );
            return Err(slot_taken(&appointment));
        }

        debug!(
            "Session {} holds {} on {} at {}",
            holder, appointment.doctor, appointment.date, appointment.time
        );
        self.holds.insert(
            holder,
            SlotHold {
                appointment,
                placed_at: Instant::now(),
            },
        );
        Ok(())
    }

    pub fn release(&mut self, holder: SessionKey) -> Option<AppointmentDetails> {
        let released = self.holds.remove(&holder).map(|hold| hold.appointment);
        if released.is_some() {
            debug!("Released slot hold for session {}", holder);
        }
        released
    }

    /// Drops every lapsed hold and returns how many went.
    pub fn prune_expired_holds(&mut self) -> usize {
        let ttl = self.hold_ttl;
        let before = self.holds.len();
        self.holds.retain(|_, hold| hold.placed_at.elapsed() < ttl);

        let pruned = before - self.holds.len();
        if pruned > 0 {
            info!("Pruned {} lapsed slot holds", pruned);
        }
        pruned
    }

    /// Appends a finalised record and converts `holder`'s hold into it.
    ///
    /// A lapsed hold is not required: the record goes in as long as nobody
    /// else has booked or is holding the slot in the meantime.
    pub fn append(
        &mut self,
        holder: SessionKey,
        record: BookingRecord,
    ) -> Result<&BookingRecord, AppointmentError> {
        if self.get(record.id).is_some() {
            return Err(AppointmentError::DuplicateBooking(record.id));
        }
        if !self.is_available(&record.appointment, holder) {
            return Err(slot_taken(&record.appointment));
        }

        info!(
            "Booking {} created for patient {} with {} on {} at {}",
            record.id,
            record.patient_id,
            record.appointment.doctor,
            record.appointment.date,
            record.appointment.time
        );

        self.holds.remove(&holder);
        self.records.push(record);
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Attaches the patient's follow-up question. Each booking takes at most one.
    pub fn record_follow_up(&mut self, booking_id: Uuid, question: String) -> Result<(), AppointmentError> {
        if self.get(booking_id).is_none() {
            return Err(AppointmentError::BookingNotFound(booking_id));
        }
        if self.follow_ups.contains_key(&booking_id) {
            return Err(AppointmentError::FollowUpAlreadyRecorded(booking_id));
        }

        debug!("Follow-up question recorded for booking {}", booking_id);
        self.follow_ups.insert(booking_id, question);
        Ok(())
    }

    pub fn follow_up(&self, booking_id: Uuid) -> Option<&str> {
        self.follow_ups.get(&booking_id).map(String::as_str)
    }

    /// Dashboard view for one doctor, in booking order.
    pub fn for_doctor(&self, doctor: &str) -> Vec<DashboardEntry> {
        self.records
            .iter()
            .filter(|r| r.appointment.doctor == doctor)
            .map(|r| self.entry(r))
            .collect()
    }

    pub fn entry_for_doctor(&self, doctor: &str, booking_id: Uuid) -> Option<DashboardEntry> {
        self.get(booking_id)
            .filter(|r| r.appointment.doctor == doctor)
            .map(|r| self.entry(r))
    }

    fn entry(&self, record: &BookingRecord) -> DashboardEntry {
        DashboardEntry {
            record: record.clone(),
            follow_up_question: self.follow_up(record.id).map(str::to_string),
        }
    }
}

fn slot_taken(appointment: &AppointmentDetails) -> AppointmentError {
    AppointmentError::SlotNotAvailable {
        doctor: appointment.doctor.clone(),
        date: appointment.date,
        time: appointment.time,
    }
}
