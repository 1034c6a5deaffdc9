use serde::{Deserialize, Serialize};

/// Caller role resolved by the external identity service and carried in
/// token claims. Consumed as a tag, never re-verified here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
}
