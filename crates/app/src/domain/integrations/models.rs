//! Integration Models

use std::{collections::BTreeMap, fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::ids::IntegrationId;

/// What kind of provider an integration talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationCategory {
    Delivery,
    Email,
    Messaging,
    Payment,
}

impl IntegrationCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Email => "email",
            Self::Messaging => "messaging",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for IntegrationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integration category: {0}")]
pub struct ParseIntegrationCategoryError(pub String);

impl FromStr for IntegrationCategory {
    type Err = ParseIntegrationCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "email" => Ok(Self::Email),
            "messaging" => Ok(Self::Messaging),
            "payment" => Ok(Self::Payment),
            other => Err(ParseIntegrationCategoryError(other.to_string())),
        }
    }
}

/// Connection health of an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationStatus {
    Active,
    Inactive,
    Error,
    Testing,
}

impl IntegrationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integration status: {0}")]
pub struct ParseIntegrationStatusError(pub String);

impl FromStr for IntegrationStatus {
    type Err = ParseIntegrationStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "error" => Ok(Self::Error),
            "testing" => Ok(Self::Testing),
            other => Err(ParseIntegrationStatusError(other.to_string())),
        }
    }
}

/// A credential value. Zeroed on drop and redacted from debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

pub type Credentials = BTreeMap<String, Secret>;

/// Integration Record
#[derive(Debug, Clone)]
pub struct IntegrationRecord {
    pub uuid: IntegrationId,
    pub name: String,
    pub slug: String,
    pub category: IntegrationCategory,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub status: IntegrationStatus,
    pub credentials: Credentials,
    pub settings: serde_json::Value,
    pub last_error: Option<String>,
    pub last_tested_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Integration Model
#[derive(Debug, Clone)]
pub struct NewIntegration {
    pub uuid: IntegrationId,
    pub name: String,
    pub slug: String,
    pub category: IntegrationCategory,
    pub description: Option<String>,
    pub settings: serde_json::Value,
}

/// Integration listing filters; `None` fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationFilters {
    pub category: Option<IntegrationCategory>,
    pub is_enabled: Option<bool>,
}

/// Outcome of probing an integration's connection.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub status: IntegrationStatus,
    pub error: Option<String>,
}
