// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use terrachat_model::LocationData;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    #[error("location is not supported on this device")]
    Unsupported,

    #[error("location access denied: {0}")]
    Denied(String),

    #[error("coordinates out of range: {latitude}, {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// One-shot location acquisition.  No continuous tracking.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn acquire(&self) -> Result<LocationData, LocationError>;
}

/// Location supplied up front (CLI flags or `[chat.location]` in config).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(LocationData);

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(LocationError::OutOfRange { latitude, longitude });
        }
        Ok(Self(LocationData::new(latitude, longitude)))
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn acquire(&self) -> Result<LocationData, LocationError> {
        Ok(self.0)
    }
}

/// Source for hosts without any location facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableLocation;

#[async_trait]
impl LocationSource for UnavailableLocation {
    async fn acquire(&self) -> Result<LocationData, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Acquisition state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationStatus {
    #[default]
    Idle,
    Requesting,
    Active(LocationData),
    Denied,
}

impl LocationStatus {
    /// Coordinates to bias requests with; `None` unless acquisition succeeded.
    pub fn coordinates(&self) -> Option<LocationData> {
        match self {
            LocationStatus::Active(loc) => Some(*loc),
            LocationStatus::Idle | LocationStatus::Requesting | LocationStatus::Denied => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationStatus::Active(_) => "GPS Active",
            LocationStatus::Requesting => "Locating...",
            LocationStatus::Idle | LocationStatus::Denied => "GPS Inactive",
        }
    }
}
