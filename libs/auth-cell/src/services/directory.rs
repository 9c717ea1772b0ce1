use tracing::{debug, info, warn};

use crate::models::{DoctorAccount, DoctorListing};

pub struct DoctorDirectory {
    accounts: Vec<DoctorAccount>,
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

impl DoctorDirectory {
    pub fn new(accounts: Vec<DoctorAccount>) -> Self {
        Self { accounts }
    }

    /// The clinic's three demo doctors.
    pub fn seeded() -> Self {
        Self::new(vec![
            DoctorAccount::new("drcarter@clinic.com", "password123", "Dr. Emily Carter"),
            DoctorAccount::new("dradams@clinic.com", "password123", "Dr. Ben Adams"),
            DoctorAccount::new("drdavis@clinic.com", "password123", "Dr. Chloe Davis"),
        ])
    }

    /// Looks up `email` case-insensitively and checks the password exactly.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&DoctorAccount> {
        let email = email.trim().to_lowercase();
        debug!("Authenticating doctor: {}", email);

        match self.accounts.iter().find(|a| a.email == email) {
            Some(account) if account.password == password => {
                info!("Doctor signed in: {}", account.name);
                Some(account)
            }
            Some(_) => {
                warn!("Wrong password for doctor account {}", email);
                None
            }
            None => {
                warn!("Unknown doctor account {}", email);
                None
            }
        }
    }

    pub fn doctor_names(&self) -> Vec<&str> {
        self.accounts.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn listings(&self) -> Vec<DoctorListing> {
        self.accounts
            .iter()
            .map(|a| DoctorListing { name: a.name.clone() })
            .collect()
    }

    pub fn is_bookable(&self, name: &str) -> bool {
        self.accounts.iter().any(|a| a.name == name)
    }
}
