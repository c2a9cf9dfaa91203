use std::fmt;

use shared::error::FieldError;
use thiserror::Error;

/// Catalog endpoint a request was addressed to, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListFilms,
    GetFilm,
    UpdateFilm,
    DeleteFilm,
    CreateTicket,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListFilms => "list films",
            Self::GetFilm => "get film",
            Self::UpdateFilm => "update film",
            Self::DeleteFilm => "delete film",
            Self::CreateTicket => "create ticket",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The server answered outside the 2xx range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {status} {status_text}")]
pub struct RequestError {
    pub operation: Operation,
    pub status: u16,
    pub status_text: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("{operation} failed: transport error: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} failed: malformed response: {reason}")]
    MalformedResponse {
        operation: Operation,
        reason: String,
    },
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error(transparent)]
    InvalidQuantity(#[from] FieldError),
}

impl ClientError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => Some(err.status),
            _ => None,
        }
    }

    pub(crate) fn malformed(operation: Operation, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            reason: reason.into(),
        }
    }
}
