use serde::{Deserialize, Serialize};

/// A named grouping that tasks belong to. Read-only from the client's
/// perspective: projects are listed, never created or edited here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}
