//! Domain DTOs for the AppTweak search API.
//!
//! # Design
//! `Options` is the caller-side value object; the response types mirror the
//! JSON envelope the API returns. Unknown fields are ignored and most app
//! attributes are optional, because the server adds fields over time and
//! omits some for unreleased or delisted apps.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Device an App Store search is run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Iphone,
    Ipad,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Iphone => "iphone",
            Device::Ipad => "ipad",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search parameters for a keyword search.
///
/// Only `term` is always sent. Unset fields are left out of the query string
/// so the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

impl Options {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Query parameters in wire order, skipping unset fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("term", self.term.clone())];
        if let Some(num) = self.num {
            pairs.push(("num", num.to_string()));
        }
        if let Some(country) = &self.country {
            pairs.push(("country", country.clone()));
        }
        if let Some(language) = &self.language {
            pairs.push(("language", language.clone()));
        }
        if let Some(device) = self.device {
            pairs.push(("device", device.as_str().to_string()));
        }
        pairs
    }
}

/// Top-level envelope returned by `/ios/searches.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSearchResponse {
    /// Search results in ranking order.
    #[serde(rename = "content", default, deserialize_with = "null_as_default")]
    pub apps: Vec<App>,
    pub metadata: Metadata,
}

/// A single App Store search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub request: RequestMetadata,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

/// Echo of the request as the server interpreted it, plus its credit cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: RequestParams,
    #[serde(default)]
    pub cost: Option<u64>,
    #[serde(default)]
    pub max_credit_cost: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub num: Option<u32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub device: Option<Device>,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
