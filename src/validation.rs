use std::collections::HashSet;
use std::fmt;

use crate::listing::{Listing, KNOWN_CATEGORIES};

/// Exclusive upper bound for a plausible nightly price.
const MAX_PRICE: f64 = 50_000.0;

/// Latitude bounds of the area listings are expected to fall in.
const LATITUDE: (f64, f64) = (6.0, 37.0);

/// Longitude bounds of the area listings are expected to fall in.
const LONGITUDE: (f64, f64) = (68.0, 97.0);

/// A listing that breaks one of the collection invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub id: String,
    pub problem: Problem,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Problem {
    DuplicateId,
    UnknownCategory(String),
    PriceOutOfRange(f64),
    RatingOutOfRange(f64),
    HostRatingOutOfRange(f64),
    NoImages,
    InsecureImage(String),
    NoAmenities,
    CoordinatesOutOfRange { lat: f64, lng: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Problem::*;

        write!(f, "listing {:?}: ", self.id)?;

        match &self.problem {
            DuplicateId => write!(f, "ID is not unique"),
            UnknownCategory(category) => write!(f, "unknown category {:?}", category),
            PriceOutOfRange(price) => write!(f, "price {} is not in (0, {})", price, MAX_PRICE),
            RatingOutOfRange(rating) => write!(f, "rating {} is not in [0, 5]", rating),
            HostRatingOutOfRange(rating) => write!(f, "host rating {} is not in [0, 5]", rating),
            NoImages => write!(f, "has no images"),
            InsecureImage(url) => write!(f, "image {} is not an http(s) URL", url),
            NoAmenities => write!(f, "has no amenities"),
            CoordinatesOutOfRange { lat, lng } => {
                write!(f, "coordinates ({}, {}) are outside the service area", lat, lng)
            }
        }
    }
}

/// Checks every listing against the collection invariants and returns
/// all the violations found, in collection order.
pub fn validate(listings: &[Listing]) -> Vec<Violation> {
    let mut seen = HashSet::new();
    let mut violations = vec![];

    for listing in listings {
        let mut report = |problem| {
            violations.push(Violation {
                id: listing.id().to_owned(),
                problem,
            })
        };

        if !seen.insert(listing.id()) {
            report(Problem::DuplicateId);
        }

        if !KNOWN_CATEGORIES.contains(&listing.category()) {
            report(Problem::UnknownCategory(listing.category().to_owned()));
        }

        if !(listing.price() > 0.0 && listing.price() < MAX_PRICE) {
            report(Problem::PriceOutOfRange(listing.price()));
        }

        if !is_rating(listing.rating()) {
            report(Problem::RatingOutOfRange(listing.rating()));
        }

        if !is_rating(listing.host().rating) {
            report(Problem::HostRatingOutOfRange(listing.host().rating));
        }

        if listing.images().is_empty() {
            report(Problem::NoImages);
        }

        for image in listing.images() {
            if !matches!(image.scheme(), "http" | "https") {
                report(Problem::InsecureImage(image.to_string()));
            }
        }

        if listing.amenities().is_empty() {
            report(Problem::NoAmenities);
        }

        let coordinates = listing.coordinates();
        if !(within(coordinates.lat, LATITUDE) && within(coordinates.lng, LONGITUDE)) {
            report(Problem::CoordinatesOutOfRange {
                lat: coordinates.lat,
                lng: coordinates.lng,
            });
        }
    }

    violations
}

fn is_rating(value: f64) -> bool {
    (0.0..=5.0).contains(&value)
}

fn within(value: f64, (low, high): (f64, f64)) -> bool {
    value > low && value < high
}
