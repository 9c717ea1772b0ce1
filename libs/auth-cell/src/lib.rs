// Doctor credential lookup for the intake demo. A static table, not a
// security boundary: passwords are compared in plain text.
pub mod models;
pub mod services;

pub use models::DoctorAccount;
pub use services::directory::DoctorDirectory;
