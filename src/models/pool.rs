use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{first_failure, ValidationError};

/// A listing as submitted by a host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct NewPool {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub host_name: String,
    pub location: String,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_per_hour: f64,
    #[validate(range(min = 1))]
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_photo_urls"))]
    pub photos: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pool {
    pub id: String,
    #[serde(flatten)]
    pub listing: NewPool,
    pub created_at: NaiveDateTime,
}

const CHECKED_FIELDS: [&str; 6] = [
    "price_per_hour",
    "capacity",
    "latitude",
    "longitude",
    "rating",
    "photos",
];

impl NewPool {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("host_name", &self.host_name),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Blank(field));
            }
        }
        if !self.price_per_hour.is_finite() {
            return Err(ValidationError::NotFinite("price_per_hour"));
        }

        let report = match Validate::validate(self) {
            Ok(()) => return Ok(()),
            Err(report) => report,
        };
        Err(match first_failure(&report, &CHECKED_FIELDS) {
            Some(("price_per_hour", _)) => ValidationError::Negative("price_per_hour"),
            Some(("capacity", _)) => ValidationError::OutOfRange {
                field: "capacity",
                min: 1.0,
                max: f64::from(u32::MAX),
            },
            Some(("latitude", _)) => ValidationError::OutOfRange {
                field: "latitude",
                min: -90.0,
                max: 90.0,
            },
            Some(("longitude", _)) => ValidationError::OutOfRange {
                field: "longitude",
                min: -180.0,
                max: 180.0,
            },
            Some(("rating", _)) => ValidationError::OutOfRange {
                field: "rating",
                min: 0.0,
                max: 5.0,
            },
            Some(("photos", url)) => ValidationError::InvalidPhotoUrl(url.unwrap_or_default()),
            _ => ValidationError::Invalid(report.to_string()),
        })
    }
}

/// Photos must be absolute http(s) URLs with a host. The failing URL is
/// carried as the error message.
fn validate_photo_urls(photos: &[String]) -> Result<(), validator::ValidationError> {
    for photo in photos {
        let ok = url::Url::parse(photo)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !ok {
            let mut err = validator::ValidationError::new("photo_url");
            err.message = Some(photo.clone().into());
            return Err(err);
        }
    }
    Ok(())
}

/// Listing search parameters. Every bound is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolFilter {
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl PoolFilter {
    pub fn matches(&self, pool: &NewPool) -> bool {
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let hit = pool.title.to_lowercase().contains(&needle)
                || pool.location.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if pool.price_per_hour < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if pool.price_per_hour > max {
                return false;
            }
        }
        true
    }
}
