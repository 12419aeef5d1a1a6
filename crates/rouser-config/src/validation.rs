//! Configuration validation

use crate::schema::{RawConfig, RawItem};
use rouser_util::TimeOfDay;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Item '{item_id}': {message}")]
    ItemError { item_id: String, message: String },

    #[error("Duplicate item ID: {0}")]
    DuplicateItemId(String),

    #[error("Invalid time format '{value}' for {field}")]
    InvalidTimeFormat { field: String, value: String },

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Check for duplicate item IDs
    let mut seen_ids = HashSet::new();
    for item in &config.items {
        if !seen_ids.insert(&item.id) {
            errors.push(ValidationError::DuplicateItemId(item.id.clone()));
        }
    }

    // Validate each item
    for item in &config.items {
        errors.extend(validate_item(item));
    }

    // Validate preference time bounds
    if let Some(prefs) = &config.preferences {
        for (field, value) in [
            ("preferences.sleep_start", &prefs.sleep_start),
            ("preferences.sleep_end", &prefs.sleep_end),
        ] {
            if let Some(value) = value {
                if TimeOfDay::parse(value).is_none() {
                    errors.push(ValidationError::InvalidTimeFormat {
                        field: field.into(),
                        value: value.clone(),
                    });
                }
            }
        }

        for (field, value) in [
            (
                "preferences.sleep_correction_advance_hours",
                prefs.sleep_correction_advance_hours,
            ),
            (
                "preferences.cycle_deadline_advance_hours",
                prefs.cycle_deadline_advance_hours,
            ),
            (
                "preferences.daily_reset_reminder_advance_hours",
                prefs.daily_reset_reminder_advance_hours,
            ),
        ] {
            if let Some(hours) = value {
                if !hours.is_finite() || hours < 0.0 {
                    errors.push(ValidationError::GlobalError(format!(
                        "{} must be a non-negative number, got {}",
                        field, hours
                    )));
                }
            }
        }
    }

    errors
}

fn validate_item(item: &RawItem) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if item.id.is_empty() {
        errors.push(ValidationError::GlobalError("item id cannot be empty".into()));
    }
    if item.name.is_empty() {
        errors.push(ValidationError::ItemError {
            item_id: item.id.clone(),
            message: "name cannot be empty".into(),
        });
    }

    if let Some(reset) = &item.server_reset_time {
        if TimeOfDay::parse(reset).is_none() {
            errors.push(ValidationError::InvalidTimeFormat {
                field: format!("items.{}.server_reset_time", item.id),
                value: reset.clone(),
            });
        }
    }

    for time in &item.mandatory_times {
        if TimeOfDay::parse(time).is_none() {
            errors.push(ValidationError::InvalidTimeFormat {
                field: format!("items.{}.mandatory_times", item.id),
                value: time.clone(),
            });
        }
    }

    if item.cycle_hours == Some(0) {
        errors.push(ValidationError::ItemError {
            item_id: item.id.clone(),
            message: "cycle_hours must be positive".into(),
        });
    }

    if let Some(launch) = &item.launch {
        if launch.is_empty() {
            errors.push(ValidationError::ItemError {
                item_id: item.id.clone(),
                message: "launch argv cannot be empty".into(),
            });
        }
    }

    errors
}
