/// The caller resolved from a bearer credential (spec §4.11).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, roles: Vec<String>) -> Self {
        Principal { id: id.into(), name: name.into(), roles }
    }
}
