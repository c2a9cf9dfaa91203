//! Initial catalog load: fetch every film, show the first, build the menu.

use shared::domain::FilmId;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    api::CatalogApi,
    error::ClientError,
    view::{render_empty_detail, render_film_detail, render_film_menu, PresentationSurface},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSummary {
    pub film_count: usize,
    pub displayed: Option<FilmId>,
}

/// Runs the load sequence from scratch. Also re-invoked after a deletion.
///
/// An empty catalog renders the empty detail state and an empty menu.
pub async fn bootstrap<A, S>(api: &A, surface: &Mutex<S>) -> Result<BootstrapSummary, ClientError>
where
    A: CatalogApi + ?Sized,
    S: PresentationSurface,
{
    let films = api.list_films().await?;

    let mut surface = surface.lock().await;
    match films.first() {
        Some(first) => render_film_detail(&mut *surface, first),
        None => render_empty_detail(&mut *surface),
    }
    render_film_menu(&mut *surface, &films);

    let summary = BootstrapSummary {
        film_count: films.len(),
        displayed: films.first().map(|film| film.id.clone()),
    };
    info!(
        film_count = summary.film_count,
        displayed = ?summary.displayed,
        "catalog loaded"
    );
    Ok(summary)
}
