use serde::Serialize;

use crate::listing::Listing;
use crate::pagination::Pagination;
use crate::query::FilterEcho;

/// The envelope every successful API response is wrapped in.
#[derive(Debug, Serialize)]
pub struct Success<'a> {
    success: bool,
    #[serde(flatten)]
    response: SuccessResponse<'a>,
}

impl<'a> From<SuccessResponse<'a>> for Success<'a> {
    fn from(response: SuccessResponse<'a>) -> Self {
        Success {
            success: true,
            response,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Listings {
        data: Vec<&'a Listing>,
        pagination: Pagination,
        filters: FilterEcho,
    },
    Search {
        data: Vec<&'a Listing>,
        query: String,
        count: usize,
    },
    Category {
        data: Vec<&'a Listing>,
        category: String,
        count: usize,
    },
    Location {
        data: Vec<&'a Listing>,
        location: String,
        count: usize,
    },
    Listing {
        data: &'a Listing,
    },
    Categories {
        data: Vec<&'a str>,
    },
}

/// Responses describing the service itself rather than its data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse<'a> {
    Health {
        status: &'a str,
        timestamp: String,
        uptime: f64,
        version: &'a str,
        revision: Option<&'a str>,
    },
    Index {
        message: &'a str,
        version: &'a str,
        endpoints: Endpoints<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints<'a> {
    pub properties: &'a str,
    pub property_by_id: &'a str,
    pub search: &'a str,
    pub categories: &'a str,
    pub health: &'a str,
}
