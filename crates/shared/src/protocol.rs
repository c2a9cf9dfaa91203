use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{available_tickets, FilmId, TicketId},
    error::FieldError,
};

/// One screening in the catalog. Every field is required on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub poster: String,
    pub runtime: u32,
    pub showtime: String,
    pub capacity: u32,
    pub tickets_sold: u32,
    pub description: String,
}

impl Film {
    pub fn available(&self) -> u32 {
        available_tickets(self.capacity, self.tickets_sold)
    }

    pub fn is_sold_out(&self) -> bool {
        self.available() == 0
    }

    /// Copy of this record with a different sold counter.
    pub fn with_tickets_sold(&self, tickets_sold: u32) -> Self {
        Self {
            tickets_sold,
            ..self.clone()
        }
    }
}

/// Partial film update. Absent fields keep their server-side values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets_sold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FilmPatch {
    pub fn tickets_sold(tickets_sold: u32) -> Self {
        Self {
            tickets_sold: Some(tickets_sold),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body of `POST /tickets/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub film_id: FilmId,
    pub number_of_tickets: NonZeroU32,
}

impl NewTicket {
    pub fn new(film_id: FilmId, number_of_tickets: u32) -> Result<Self, FieldError> {
        let number_of_tickets = NonZeroU32::new(number_of_tickets)
            .ok_or_else(|| FieldError::new("number_of_tickets", "must be greater than zero"))?;
        Ok(Self {
            film_id,
            number_of_tickets,
        })
    }
}

/// Ticket as echoed back by the server after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TicketId>,
    pub film_id: FilmId,
    pub number_of_tickets: NonZeroU32,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
