pub mod agents;
pub mod chat;
pub mod companies;
pub mod reports;
pub mod workbenches;

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by role updates and member removals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
