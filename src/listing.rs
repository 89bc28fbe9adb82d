use serde::{Deserialize, Serialize, Serializer};
use url::Url;

/// The categories a listing may be filed under.
pub const KNOWN_CATEGORIES: [&str; 8] = [
    "amazing_views",
    "chefs_kitchens",
    "beachfront",
    "mansions",
    "tiny_homes",
    "treehouses",
    "countryside",
    "trending",
];

/// A single property available for booking.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// The opaque identifier of the listing. Unique within a collection.
    id: String,

    /// The headline shown for the listing.
    title: String,

    /// A human-readable place name, usually “Area, City”.
    location: String,

    /// The nightly price.
    #[serde(serialize_with = "whole")]
    price: f64,

    /// The average guest rating, between 0 and 5.
    #[serde(serialize_with = "whole")]
    rating: f64,

    /// Where the property is.
    coordinates: Coordinates,

    /// Photos of the property, in display order.
    images: Vec<Url>,

    /// One of the known categories, although nothing enforces that at
    /// load time.
    category: String,

    description: String,

    amenities: Vec<String>,

    host: Host,

    /// The distance from the searcher, as presented to them.
    #[serde(serialize_with = "whole")]
    distance: f64,

    /// The dates the property is free, in whatever form the source
    /// provides.
    available_dates: String,
}

impl Listing {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        title: String,
        location: String,
        price: f64,
        rating: f64,
        coordinates: Coordinates,
        images: Vec<Url>,
        category: String,
        description: String,
        amenities: Vec<String>,
        host: Host,
        distance: f64,
        available_dates: String,
    ) -> Self {
        Listing {
            id,
            title,
            location,
            price,
            rating,
            coordinates,
            images,
            category,
            description,
            amenities,
            host,
            distance,
            available_dates,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn images(&self) -> &[Url] {
        &self.images
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amenities(&self) -> &[String] {
        &self.amenities
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn available_dates(&self) -> &str {
        &self.available_dates
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coordinates {
    #[serde(serialize_with = "whole")]
    pub lat: f64,
    #[serde(serialize_with = "whole")]
    pub lng: f64,
}

/// The person renting out a listing.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Host {
    pub name: String,
    pub avatar: Url,
    #[serde(serialize_with = "whole")]
    pub rating: f64,
}

/// Writes whole numbers as JSON integers, the way source files spell
/// them, and everything else as floats.
fn whole<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // beyond 2^53 not every integer is representable
    const EXACT: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() < EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// The on-disk shape of a listings source.
#[derive(Debug, Deserialize)]
pub(crate) struct Source {
    pub(crate) properties: Vec<Listing>,
}
