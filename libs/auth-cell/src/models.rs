use serde::{Deserialize, Serialize};

/// A doctor who can sign in to the dashboard and be booked by patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorAccount {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl DoctorAccount {
    pub fn new(email: &str, password: &str, name: &str) -> Self {
        Self {
            email: email.to_lowercase(),
            name: name.to_string(),
            password: password.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorListing {
    pub name: String,
}
