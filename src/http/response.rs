//! Redirect response construction.
//!
//! # Responsibilities
//! - Map the temporary flag to a status code and reason phrase
//! - Carry the final `Location` value
//! - Render as an HTTP response for the server front end
//!
//! # Design Decisions
//! - Permanent (301) unless the rule says temporary (302)
//! - Redirect responses have an empty body

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Redirect status pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStatus {
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Found
    Found,
}

impl RedirectStatus {
    pub fn from_temporary(is_temporary: bool) -> Self {
        if is_temporary {
            RedirectStatus::Found
        } else {
            RedirectStatus::MovedPermanently
        }
    }

    pub fn code(self) -> u16 {
        match self {
            RedirectStatus::MovedPermanently => 301,
            RedirectStatus::Found => 302,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            RedirectStatus::MovedPermanently => "Moved Permanently",
            RedirectStatus::Found => "Found",
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectStatus::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
            RedirectStatus::Found => StatusCode::FOUND,
        }
    }
}

/// A redirect to send back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub status: RedirectStatus,
    pub location: String,
}

impl Redirect {
    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn status_text(&self) -> &'static str {
        self.status.text()
    }
}

/// Build a redirect to `location`.
pub fn build(location: impl Into<String>, is_temporary: bool) -> Redirect {
    Redirect {
        status: RedirectStatus::from_temporary(is_temporary),
        location: location.into(),
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        match Response::builder()
            .status(self.status.status_code())
            .header(header::LOCATION, &self.location)
            .body(Body::empty())
        {
            Ok(response) => response,
            Err(e) => {
                // Location values come from the route table; a value that is
                // not a valid header is an authoring defect.
                tracing::error!(location = %self.location, error = %e, "Invalid redirect location");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
