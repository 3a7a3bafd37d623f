use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A classification owned by the backend; the form only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}
