//! Ticket purchase: re-fetch, bump the sold counter, record the ticket.
//!
//! The counter update and the ticket creation are two independent requests
//! with no rollback. If the ticket request fails after the counter was
//! persisted, the server keeps the incremented `tickets_sold` without a
//! matching ticket record and the display has already advanced.

use shared::{
    domain::FilmId,
    protocol::{FilmPatch, Ticket},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    api::CatalogApi,
    error::ClientError,
    view::{render_ticket_availability, PresentationSurface},
};

/// Tickets recorded per purchase action.
pub const TICKETS_PER_PURCHASE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub film_id: FilmId,
    pub tickets_sold: u32,
    pub available: u32,
    pub ticket: Ticket,
}

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("failed to fetch film {film_id} before purchase: {source}")]
    Fetch {
        film_id: FilmId,
        #[source]
        source: ClientError,
    },
    #[error("sold counter for film {film_id} cannot grow past {tickets_sold}")]
    CounterOverflow { film_id: FilmId, tickets_sold: u32 },
    #[error("failed to persist tickets_sold={tickets_sold} for film {film_id}: {source}")]
    UpdateSold {
        film_id: FilmId,
        tickets_sold: u32,
        #[source]
        source: ClientError,
    },
    #[error(
        "film {film_id} advanced to tickets_sold={tickets_sold} but no ticket was recorded: {source}"
    )]
    TicketNotRecorded {
        film_id: FilmId,
        tickets_sold: u32,
        #[source]
        source: ClientError,
    },
}

impl PurchaseError {
    /// Whether the server-side counter was already incremented when the
    /// sequence stopped.
    pub fn counter_committed(&self) -> bool {
        matches!(self, Self::TicketNotRecorded { .. })
    }
}

pub async fn purchase_ticket<A, S>(
    api: &A,
    surface: &Mutex<S>,
    film_id: &FilmId,
) -> Result<PurchaseReceipt, PurchaseError>
where
    A: CatalogApi + ?Sized,
    S: PresentationSurface,
{
    let film = api
        .get_film(film_id)
        .await
        .map_err(|source| PurchaseError::Fetch {
            film_id: film_id.clone(),
            source,
        })?;

    let tickets_sold = film
        .tickets_sold
        .checked_add(TICKETS_PER_PURCHASE)
        .ok_or_else(|| PurchaseError::CounterOverflow {
            film_id: film_id.clone(),
            tickets_sold: film.tickets_sold,
        })?;

    api.update_film_fields(film_id, &FilmPatch::tickets_sold(tickets_sold))
        .await
        .map_err(|source| PurchaseError::UpdateSold {
            film_id: film_id.clone(),
            tickets_sold,
            source,
        })?;

    // Rendered from the fetched record plus the new counter, not from the
    // PATCH response body.
    let updated = film.with_tickets_sold(tickets_sold);
    render_ticket_availability(&mut *surface.lock().await, &updated);

    let ticket = api
        .create_ticket(film_id, TICKETS_PER_PURCHASE)
        .await
        .map_err(|source| PurchaseError::TicketNotRecorded {
            film_id: film_id.clone(),
            tickets_sold,
            source,
        })?;

    info!(
        film_id = %film_id,
        tickets_sold,
        ticket_id = ?ticket.id,
        "ticket successfully created"
    );

    Ok(PurchaseReceipt {
        film_id: film_id.clone(),
        tickets_sold,
        available: updated.available(),
        ticket,
    })
}

#[cfg(test)]
#[path = "tests/purchase_tests.rs"]
mod tests;
