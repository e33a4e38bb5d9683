use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::FilmId;

/// Personal list a film can be placed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    /// Films the user plans to watch
    WantToWatch,
    /// Films the user has already seen
    Watched,
}

impl ListKind {
    /// Storage key name; `tracked` is kept for data written by older clients
    pub fn storage_name(&self) -> &'static str {
        match self {
            ListKind::WantToWatch => "tracked",
            ListKind::Watched => "watched",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ListKind::WantToWatch => "want-to-watch",
            ListKind::Watched => "watched",
        }
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want-to-watch" => Ok(ListKind::WantToWatch),
            "watched" => Ok(ListKind::Watched),
            other => Err(format!("Unknown list '{}'", other)),
        }
    }
}

/// Which lists a single film belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ListMembership {
    pub want_to_watch: bool,
    pub watched: bool,
}

/// Persisted state of the most recent keyword search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastSearch {
    pub query: String,
    pub film_ids: Vec<FilmId>,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Locally stored user profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserProfile {
    pub fn is_blank(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty() && self.email.is_empty()
    }
}
