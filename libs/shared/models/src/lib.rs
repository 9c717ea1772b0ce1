pub mod error;
pub mod intake;
pub mod slot;

pub use error::{AppError, FieldError};
pub use intake::{
    AppointmentDetails, BookingRecord, ConsultType, DoctorSummary, PatientInfo, QaPair,
};
pub use slot::TimeSlot;
