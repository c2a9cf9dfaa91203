//! Routes user actions to the orchestrators and catches their failures.
//!
//! Every action runs to completion or failure; nothing is cancelled and no
//! lock is held across a request, so concurrent actions may interleave and
//! render in any order.

use std::sync::Arc;

use shared::domain::FilmId;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::{
    api::CatalogApi,
    bootstrap::{bootstrap, BootstrapSummary},
    deletion::{delete_film_and_reload, DeletionError, DeletionOutcome},
    error::ClientError,
    purchase::{purchase_ticket, PurchaseError, PurchaseReceipt},
    view::{render_film_detail, PresentationSurface, DELETED_NOTICE},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Page load, or an explicit reload.
    Reload,
    /// A title in the menu was chosen.
    SelectFilm(FilmId),
    /// The purchase control was activated for the displayed film.
    BuyTicket,
    /// A menu entry's delete affordance was activated.
    DeleteFilm(FilmId),
}

impl UiAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::SelectFilm(_) => "select_film",
            Self::BuyTicket => "buy_ticket",
            Self::DeleteFilm(_) => "delete_film",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Deletion(#[from] DeletionError),
}

#[derive(Debug)]
pub enum ActionOutcome {
    Loaded(BootstrapSummary),
    Selected(FilmId),
    Purchased(PurchaseReceipt),
    Deleted(DeletionOutcome),
    Ignored(&'static str),
    Failed(ActionError),
}

impl ActionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub struct CatalogController<A: ?Sized, S> {
    api: Arc<A>,
    surface: Arc<Mutex<S>>,
}

impl<A: ?Sized, S> Clone for CatalogController<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            surface: Arc::clone(&self.surface),
        }
    }
}

impl<A, S> CatalogController<A, S>
where
    A: CatalogApi + ?Sized,
    S: PresentationSurface,
{
    pub fn new(api: Arc<A>, surface: S) -> Self {
        Self {
            api,
            surface: Arc::new(Mutex::new(surface)),
        }
    }

    pub fn surface(&self) -> &Arc<Mutex<S>> {
        &self.surface
    }

    pub async fn bootstrap(&self) -> ActionOutcome {
        self.handle(UiAction::Reload).await
    }

    /// Runs one user action. Failures are logged here and returned as
    /// [`ActionOutcome::Failed`]; they never mutate the surface beyond what the
    /// orchestrator had already committed.
    pub async fn handle(&self, action: UiAction) -> ActionOutcome {
        let name = action.name();
        debug!(action = name, "dispatching ui action");

        let result = match action {
            UiAction::Reload => self.reload().await,
            UiAction::SelectFilm(film_id) => {
                let film_id = self.resolve_film_id(film_id).await;
                self.select_film(film_id).await
            }
            UiAction::BuyTicket => self.buy_ticket().await,
            UiAction::DeleteFilm(film_id) => {
                let film_id = self.resolve_film_id(film_id).await;
                self.delete_film(film_id).await
            }
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(action = name, "ui action failed: {err}");
                ActionOutcome::Failed(err)
            }
        }
    }

    // Prefer the id exactly as the server sent it when the menu lists it.
    async fn resolve_film_id(&self, film_id: FilmId) -> FilmId {
        let known = self.surface.lock().await.menu_film_id(&film_id);
        known.unwrap_or(film_id)
    }

    async fn reload(&self) -> Result<ActionOutcome, ActionError> {
        let summary = bootstrap(&*self.api, &self.surface).await?;
        Ok(ActionOutcome::Loaded(summary))
    }

    // Always re-fetched by id so the panel reflects the server, not the menu.
    async fn select_film(&self, film_id: FilmId) -> Result<ActionOutcome, ActionError> {
        let film = self.api.get_film(&film_id).await?;
        render_film_detail(&mut *self.surface.lock().await, &film);
        Ok(ActionOutcome::Selected(film_id))
    }

    async fn buy_ticket(&self) -> Result<ActionOutcome, ActionError> {
        let (film_id, enabled) = {
            let surface = self.surface.lock().await;
            (surface.displayed_film_id(), surface.purchase_enabled())
        };
        let Some(film_id) = film_id else {
            warn!("purchase requested with no film displayed");
            return Ok(ActionOutcome::Ignored("no film displayed"));
        };
        if !enabled {
            warn!(film_id = %film_id, "purchase requested while control is disabled");
            return Ok(ActionOutcome::Ignored("purchase control disabled"));
        }

        let receipt = purchase_ticket(&*self.api, &self.surface, &film_id).await?;
        Ok(ActionOutcome::Purchased(receipt))
    }

    async fn delete_film(&self, film_id: FilmId) -> Result<ActionOutcome, ActionError> {
        let outcome = delete_film_and_reload(&*self.api, &self.surface, &film_id).await?;

        let mut surface = self.surface.lock().await;
        surface.remove_menu_entry(&film_id);
        surface.notify(DELETED_NOTICE);
        Ok(ActionOutcome::Deleted(outcome))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
