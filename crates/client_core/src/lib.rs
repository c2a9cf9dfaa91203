//! Client for the film catalog: HTTP API access, view rendering, and the
//! purchase / deletion / bootstrap sequences that tie them together.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod deletion;
pub mod error;
pub mod purchase;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{CatalogApi, CatalogClient};
pub use bootstrap::{bootstrap, BootstrapSummary};
pub use config::{load_settings, Settings};
pub use controller::{ActionError, ActionOutcome, CatalogController, UiAction};
pub use deletion::{delete_film_and_reload, DeletionError, DeletionOutcome};
pub use error::{ClientError, Operation, RequestError};
pub use purchase::{purchase_ticket, PurchaseError, PurchaseReceipt};
pub use view::{MemorySurface, PresentationSurface};
