//! Skill catalog entity

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Skill {
    pub id: i32,
    pub label: String,
}

impl Skill {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}
