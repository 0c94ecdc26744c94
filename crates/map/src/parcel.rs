//! New-parcel form record.
//!
//! Collects what the parcel page asks for, plus the outline reported by
//! the polygon capture, and turns it into a record ready for storage.
//! Storage itself is up to the host.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Utc};
use geojson::Feature;
use serde::{Deserialize, Serialize};

use crate::coord::GeoCoordinate;
use crate::draw::AreaCallback;
use crate::error::{MapError, Result};

/// Earliest accepted planting year.
pub const MIN_PLANTING_YEAR: i32 = 1900;

/// `"{:.2} ha"`
pub fn format_hectares(hectares: f64) -> String {
    format!("{:.2} ha", hectares)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelForm {
    pub name: String,
    pub culture_type: String,
    pub planting_year: Option<i32>,
    /// Plants per hectare.
    pub planting_density: Option<f64>,
    pub location: Option<GeoCoordinate>,
    pub forbidden_zone: bool,
    polygon: Option<Feature>,
    area_ha: Option<f64>,
}

/// A validated parcel, as handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelRecord {
    pub name: String,
    pub culture_type: String,
    pub planting_year: i32,
    pub planting_density: f64,
    pub location: Option<GeoCoordinate>,
    pub forbidden_zone: bool,
    pub polygon: Feature,
    pub area_ha: f64,
    pub created_at: DateTime<Utc>,
}

impl ParcelForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Store the latest outline from the polygon capture.
    pub fn set_polygon(&mut self, feature: &Feature, hectares: f64) {
        self.polygon = Some(feature.clone());
        self.area_ha = Some(hectares);
    }

    pub fn polygon(&self) -> Option<&Feature> {
        self.polygon.as_ref()
    }

    pub fn area_ha(&self) -> Option<f64> {
        self.area_ha
    }

    /// Detected surface caption, once a polygon has been drawn.
    pub fn surface_label(&self) -> Option<String> {
        self.polygon
            .as_ref()
            .map(|_| format_hectares(self.area_ha.unwrap_or(0.0)))
    }

    /// Check the form against the current year.
    pub fn validate(&self, current_year: i32) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MapError::InvalidParcel("name is required".into()));
        }
        match self.planting_year {
            Some(y) if (MIN_PLANTING_YEAR..=current_year).contains(&y) => {}
            Some(y) => {
                return Err(MapError::InvalidParcel(format!(
                    "planting year {} outside {}..={}",
                    y, MIN_PLANTING_YEAR, current_year
                )))
            }
            None => return Err(MapError::InvalidParcel("planting year is required".into())),
        }
        match self.planting_density {
            Some(d) if d.is_finite() && d > 0.0 => {}
            _ => {
                return Err(MapError::InvalidParcel(
                    "planting density must be positive".into(),
                ))
            }
        }
        if self.polygon.is_none() {
            return Err(MapError::InvalidParcel("draw the parcel outline first".into()));
        }
        Ok(())
    }

    /// Validate and build the record, stamped with `now`.
    pub fn to_record(&self, now: DateTime<Utc>) -> Result<ParcelRecord> {
        self.validate(now.year())?;
        let (Some(planting_year), Some(planting_density), Some(polygon)) =
            (self.planting_year, self.planting_density, self.polygon.clone())
        else {
            return Err(MapError::InvalidParcel("incomplete form".into()));
        };
        Ok(ParcelRecord {
            name: self.name.trim().to_string(),
            culture_type: self.culture_type.clone(),
            planting_year,
            planting_density,
            location: self.location,
            forbidden_zone: self.forbidden_zone,
            polygon,
            area_ha: self.area_ha.unwrap_or(0.0),
            created_at: now,
        })
    }
}

/// Area callback that writes each captured outline into a shared form.
pub fn form_sink(form: Arc<Mutex<ParcelForm>>) -> AreaCallback {
    Box::new(move |feature: &Feature, hectares: f64| match form.lock() {
        Ok(mut f) => f.set_polygon(feature, hectares),
        Err(_) => tracing::error!("parcel form lock poisoned, outline dropped"),
    })
}
