// Contact Domain Model (technicians and admins)

use serde::{Deserialize, Serialize};

/// Person reachable through the external chat notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub chat_id: Option<String>,
    pub chat_verified: bool,
}

pub type TechnicianContact = Contact;
pub type AdminContact = Contact;

impl Contact {
    /// Chat identifier if this contact may be notified
    ///
    /// Requires a non-blank identifier AND the verified flag.
    pub fn notification_target(&self) -> Option<&str> {
        notification_target(self.chat_id.as_deref(), self.chat_verified)
    }
}

pub(crate) fn notification_target(chat_id: Option<&str>, verified: bool) -> Option<&str> {
    if !verified {
        return None;
    }
    chat_id.map(str::trim).filter(|id| !id.is_empty())
}
