use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource identifier as the catalog server hands it out.
///
/// Some servers number records, others use strings; the client keeps whatever
/// shape it received so ids round-trip unchanged into paths and request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub ResourceId);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(ResourceId::Number(value))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(ResourceId::Text(value.to_string()))
            }
        }
    };
}

id_newtype!(FilmId);
id_newtype!(TicketId);

impl FilmId {
    /// Parses an id typed by a user: digits become a numeric id, anything else
    /// stays textual.
    pub fn parse_input(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<i64>() {
            Ok(value) => Self::from(value),
            Err(_) => Self::from(raw),
        })
    }
}

/// Seats left for a screening, floored at zero.
pub fn available_tickets(capacity: u32, tickets_sold: u32) -> u32 {
    capacity.saturating_sub(tickets_sold)
}
