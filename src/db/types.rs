use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Free-text genre tags, stored as a JSON array in a single column.
///
/// No vocabulary is enforced; order is preserved as submitted.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
#[serde(transparent)]
pub struct Genres(pub Vec<String>);

impl Genres {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Genres {
    fn from(genres: Vec<String>) -> Self {
        Self(genres)
    }
}

impl<const N: usize> From<[&str; N]> for Genres {
    fn from(genres: [&str; N]) -> Self {
        Self(genres.iter().map(|g| g.to_string()).collect())
    }
}
