// Appointment cell: the daily slot grid, the slot allocator and the shared
// booking roster.
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AppointmentError, AppointmentState, DashboardEntry, SessionKey};
pub use router::appointment_routes;
pub use services::roster::{BookingRoster, SharedRoster};
pub use services::slots::SlotAllocator;
