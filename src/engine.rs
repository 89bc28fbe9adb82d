//! The query engine: filtering, keyword search and lookups over a
//! loaded collection.
//!
//! Nothing here touches the transport or the store. Every operation is
//! a pure function of the collection and the parameters, so two calls
//! with the same inputs always agree.

use std::collections::HashSet;

use crate::errors::BackendError;
use crate::listing::Listing;
use crate::pagination::{paginate, PageRequest, Pagination};
use crate::query::{number, present, FilterEcho, ListingQuery};

/// A single predicate in the filter chain.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Lowercased term contained in the title, location, description or
    /// category.
    Search(String),
    /// Exact, case-sensitive category.
    Category(String),
    /// Lowercased term contained in the location.
    Location(String),
    MinPrice(f64),
    MaxPrice(f64),
    MinRating(f64),
}

impl Filter {
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Filter::Search(term) => matches_search(listing, term),
            Filter::Category(category) => listing.category() == category,
            Filter::Location(term) => listing.location().to_lowercase().contains(term.as_str()),
            Filter::MinPrice(bound) => listing.price() >= *bound,
            Filter::MaxPrice(bound) => listing.price() <= *bound,
            Filter::MinRating(bound) => listing.rating() >= *bound,
        }
    }
}

/// The result of a listing query: one page of matches plus the
/// metadata describing it.
#[derive(Debug)]
pub struct QueryResult<'a> {
    pub page: Vec<&'a Listing>,
    pub pagination: Pagination,
    pub filters: FilterEcho,
}

/// Builds the filter chain for `query`, in application order, together
/// with the echo of the values that made it into the chain.
pub fn filter_chain(query: &ListingQuery) -> (Vec<Filter>, FilterEcho) {
    let mut filters = vec![];
    let mut echo = FilterEcho::default();

    if let Some(search) = present(&query.search) {
        filters.push(Filter::Search(search.to_lowercase()));
        echo.search = Some(search.to_owned());
    }

    if let Some(category) = present(&query.category) {
        filters.push(Filter::Category(category.to_owned()));
        echo.category = Some(category.to_owned());
    }

    if let Some(location) = present(&query.location) {
        filters.push(Filter::Location(location.to_lowercase()));
        echo.location = Some(location.to_owned());
    }

    if let Some(bound) = number(&query.min_price) {
        filters.push(Filter::MinPrice(bound));
        echo.min_price = query.min_price.clone();
    }

    if let Some(bound) = number(&query.max_price) {
        filters.push(Filter::MaxPrice(bound));
        echo.max_price = query.max_price.clone();
    }

    if let Some(bound) = number(&query.min_rating) {
        filters.push(Filter::MinRating(bound));
        echo.min_rating = query.min_rating.clone();
    }

    (filters, echo)
}

/// Applies every filter in `query` and returns the requested page.
/// Pagination is computed over the filtered set.
pub fn query<'a>(listings: &'a [Listing], query: &ListingQuery) -> QueryResult<'a> {
    let (filters, echo) = filter_chain(query);

    let mut matching: Vec<&Listing> = listings.iter().collect();

    for filter in &filters {
        matching.retain(|listing| filter.matches(listing));
    }

    let request = PageRequest::from_raw(&query.page, &query.limit);
    let (page, pagination) = paginate(&matching, request);

    QueryResult {
        page: page.to_vec(),
        pagination,
        filters: echo,
    }
}

/// Returns every listing matching `term`, without pagination. A missing
/// or empty term is an error rather than a match-everything.
pub fn search_only<'a>(
    listings: &'a [Listing],
    term: Option<&str>,
) -> Result<Vec<&'a Listing>, BackendError> {
    let term = term
        .filter(|t| !t.is_empty())
        .ok_or(BackendError::MissingQuery)?
        .to_lowercase();

    Ok(listings
        .iter()
        .filter(|listing| matches_search(listing, &term))
        .collect())
}

/// Returns every listing in exactly this category.
pub fn by_category<'a>(listings: &'a [Listing], category: &str) -> Vec<&'a Listing> {
    let filter = Filter::Category(category.to_owned());
    listings.iter().filter(|l| filter.matches(l)).collect()
}

/// Returns every listing whose location contains `location`, ignoring
/// case.
pub fn by_location<'a>(listings: &'a [Listing], location: &str) -> Vec<&'a Listing> {
    let filter = Filter::Location(location.to_lowercase());
    listings.iter().filter(|l| filter.matches(l)).collect()
}

pub fn by_id<'a>(listings: &'a [Listing], id: &str) -> Result<&'a Listing, BackendError> {
    listings
        .iter()
        .find(|listing| listing.id() == id)
        .ok_or_else(|| BackendError::NotFound { id: id.to_owned() })
}

/// Returns the categories present in the collection, each once, in the
/// order they first appear.
pub fn distinct_categories(listings: &[Listing]) -> Vec<&str> {
    let mut seen = HashSet::new();

    listings
        .iter()
        .map(Listing::category)
        .filter(|category| seen.insert(*category))
        .collect()
}

/// `term` must already be lowercase.
fn matches_search(listing: &Listing, term: &str) -> bool {
    [
        listing.title(),
        listing.location(),
        listing.description(),
        listing.category(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}
