use serde::Serialize;

use crate::errors::BackendError;

const INTERNAL_ERROR: &str = "Internal server error";

/// An error together with the operation that produced it.
#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    /// Converts the rejection into a response body. Internal failures
    /// carry their detail only when `expose_details` is set.
    pub fn flatten(&self, expose_details: bool) -> FlattenedRejection {
        let error = match &self.error {
            BackendError::Internal { detail } if expose_details => Some(detail.clone()),
            BackendError::Internal { .. } => Some(INTERNAL_ERROR.to_owned()),
            _ => None,
        };

        FlattenedRejection {
            success: false,
            context: self.context.clone(),
            message: format!("{}", self.error),
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    pub(crate) success: bool,
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Categories {},
    Category { category: String },
    Listings {},
    Location { location: String },
    Retrieve { id: String },
    Route {},
    Search { query: Option<String> },
}

impl Context {
    pub fn categories() -> Context {
        Context::Categories {}
    }

    pub fn category(category: String) -> Context {
        Context::Category { category }
    }

    pub fn listings() -> Context {
        Context::Listings {}
    }

    pub fn location(location: String) -> Context {
        Context::Location { location }
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn route() -> Context {
        Context::Route {}
    }

    pub fn search(query: Option<String>) -> Context {
        Context::Search { query }
    }
}
