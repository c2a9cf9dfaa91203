//! Film deletion followed by a full catalog reload.

use shared::domain::FilmId;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
    api::CatalogApi,
    bootstrap::{bootstrap, BootstrapSummary},
    error::ClientError,
    view::PresentationSurface,
};

#[derive(Debug, Error)]
#[error("failed to delete film {film_id}: {source}")]
pub struct DeletionError {
    pub film_id: FilmId,
    #[source]
    pub source: ClientError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub film_id: FilmId,
    /// `None` when the follow-up reload failed; the deletion itself stands.
    pub reloaded: Option<BootstrapSummary>,
}

/// Deletes `film_id` and, once the server confirms, re-runs the bootstrap
/// sequence. A failed delete leaves the surface untouched.
pub async fn delete_film_and_reload<A, S>(
    api: &A,
    surface: &Mutex<S>,
    film_id: &FilmId,
) -> Result<DeletionOutcome, DeletionError>
where
    A: CatalogApi + ?Sized,
    S: PresentationSurface,
{
    api.delete_film(film_id)
        .await
        .map_err(|source| DeletionError {
            film_id: film_id.clone(),
            source,
        })?;
    info!(film_id = %film_id, "film deleted, reloading catalog");

    let reloaded = match bootstrap(api, surface).await {
        Ok(summary) => Some(summary),
        Err(err) => {
            error!(film_id = %film_id, "failed to reload catalog after deletion: {err}");
            None
        }
    };

    Ok(DeletionOutcome {
        film_id: film_id.clone(),
        reloaded,
    })
}
