//! Knowledge catalog entity

/// A knowledge tag (e.g. "Rust", "PostgreSQL") that can be attached to users.
///
/// Ordered by id first so a user's set iterates in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Knowledge {
    pub id: i32,
    pub label: String,
}

impl Knowledge {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}
