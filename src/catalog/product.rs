//! Typed product record. Keys the passes do not own are carried in `extra` untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Product id as found in the file: either a string or a number. Compared as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Text(String),
    Number(Number),
}

impl ProductId {
    pub fn matches(&self, raw: &str) -> bool {
        self.to_string() == raw
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Outer `None`: key absent. `Some(None)`: key present with `null`, written back as `null`.
pub type Nullable<T> = Option<Option<T>>;

/// Shown for records whose `name` is absent or `null`.
pub const UNNAMED: &str = "Sin nombre";

fn nullable<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Nullable<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub image: Nullable<String>,
    #[serde(
        rename = "imageGallery",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_gallery: Nullable<Vec<String>>,
    #[serde(
        rename = "detailsUrl",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub details_url: Nullable<String>,
    /// Everything else (price, shipping fields, ...), in file order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn name(&self) -> &str {
        self.name.as_ref().and_then(Option::as_deref).unwrap_or(UNNAMED)
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_ref().and_then(Option::as_deref)
    }

    pub fn details_url(&self) -> Option<&str> {
        self.details_url.as_ref().and_then(Option::as_deref)
    }

    /// Gallery entries; absent and `null` both read as no gallery.
    pub fn gallery(&self) -> Option<&[String]> {
        self.image_gallery.as_ref().and_then(Option::as_deref)
    }

    /// Whether the record carries an `imageGallery` key at all (even `null`).
    pub fn has_gallery_key(&self) -> bool {
        self.image_gallery.is_some()
    }

    pub fn set_gallery(&mut self, gallery: Vec<String>) {
        self.image_gallery = Some(Some(gallery));
    }

    /// Gallery to build on: `imageGallery` when non-empty, else the single `image`, else empty.
    pub fn working_gallery(&self) -> Vec<String> {
        match self.gallery() {
            Some(gallery) if !gallery.is_empty() => gallery.to_vec(),
            _ => self
                .image()
                .filter(|image| !image.is_empty())
                .map(str::to_string)
                .into_iter()
                .collect(),
        }
    }

    /// A field counts as present only when the key exists and is not `null`.
    pub fn has_field(&self, key: &str) -> bool {
        self.extra.get(key).is_some_and(|value| !value.is_null())
    }

    /// Name cut to `max` characters with `...` appended when longer.
    pub fn display_name(&self, max: usize) -> String {
        truncate_name(self.name(), max)
    }
}

pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let head: String = name.chars().take(max).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Append `url` unless it is empty or already present. Returns whether it was appended.
pub fn push_unique(gallery: &mut Vec<String>, url: &str) -> bool {
    if url.is_empty() || gallery.iter().any(|existing| existing == url) {
        return false;
    }
    gallery.push(url.to_string());
    true
}
