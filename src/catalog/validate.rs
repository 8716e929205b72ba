use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use url::Url;

use crate::catalog::error::{CatalogError, Result};
use crate::fields::RequiredField;
use crate::gallery::candidates::{cdn_folder, extract_sku};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.count(ValidationSeverity::Error) > 0
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Read the catalog as raw JSON (so malformed records are reported, not rejected) and check it.
pub fn validate_catalog_file(path: &Path) -> Result<ValidationReport> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let payload: Value = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validate_catalog(&payload))
}

pub fn validate_catalog(payload: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(entries) = payload.as_array() else {
        report.push(
            ValidationSeverity::Error,
            "catalog",
            "expected top-level JSON array of products",
        );
        return report;
    };

    let mut seen_ids = HashSet::new();
    let mut seen_skus = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let base_context = format!("entry[{index}]");
        let Some(object) = entry.as_object() else {
            report.push(
                ValidationSeverity::Error,
                base_context,
                "entry is not an object",
            );
            continue;
        };

        let id = key_text(object.get("id"));
        let context = match &id {
            Some(id) => {
                if !seen_ids.insert(id.clone()) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{base_context}.id"),
                        format!("duplicate id '{id}'"),
                    );
                }
                format!("{base_context} id='{id}'")
            }
            None => {
                report.push(
                    ValidationSeverity::Error,
                    format!("{base_context}.id"),
                    "missing non-empty 'id' (string or number)",
                );
                base_context
            }
        };

        let sku = key_text(object.get("sku"));
        if key_text(object.get("name")).is_none() && sku.is_none() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name' or 'sku'",
            );
        }
        if let Some(sku) = sku {
            if !seen_skus.insert(sku.clone()) {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.sku"),
                    format!("duplicate sku '{sku}'"),
                );
            }
        }
        if key_text(object.get("category")).is_none() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.category"),
                "missing non-empty 'category'",
            );
        }

        validate_price(&mut report, object, &context);
        validate_image(&mut report, object, &context);
        validate_gallery(&mut report, object, &context);
        validate_details_url(&mut report, object, &context);

        for field in RequiredField::ALL {
            if object.get(field.key()).map_or(true, Value::is_null) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.{}", field.key()),
                    "missing required shipping field",
                );
            }
        }
    }

    report
}

/// Non-blank string, or a number rendered as text.
fn key_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers and numeric strings are accepted; the value must be finite and above zero.
fn validate_price(report: &mut ValidationReport, object: &Map<String, Value>, context: &str) {
    let price = match object.get("price") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match price {
        Some(price) if price.is_finite() && price > 0.0 => {}
        Some(price) => report.push(
            ValidationSeverity::Error,
            format!("{context}.price"),
            format!("price must be greater than zero, got {price}"),
        ),
        None => report.push(
            ValidationSeverity::Error,
            format!("{context}.price"),
            "missing numeric 'price'",
        ),
    }
}

fn validate_image(report: &mut ValidationReport, object: &Map<String, Value>, context: &str) {
    let image_context = format!("{context}.image");
    match object.get("image") {
        None | Some(Value::Null) => {}
        Some(Value::String(image)) if image.is_empty() => {}
        Some(Value::String(image)) => {
            if let Err(err) = Url::parse(image) {
                report.push(
                    ValidationSeverity::Error,
                    image_context,
                    format!("invalid image URL '{image}': {err}"),
                );
            }
        }
        Some(_) => report.push(ValidationSeverity::Error, image_context, "expected string URL"),
    }
}

fn validate_gallery(report: &mut ValidationReport, object: &Map<String, Value>, context: &str) {
    let gallery_context = format!("{context}.imageGallery");
    let Some(gallery) = object.get("imageGallery") else {
        return;
    };
    if gallery.is_null() {
        return;
    }
    let Some(gallery) = gallery.as_array() else {
        report.push(ValidationSeverity::Error, gallery_context, "expected array");
        return;
    };

    let mut seen = HashSet::new();
    for (index, url) in gallery.iter().enumerate() {
        let Some(url) = url.as_str() else {
            report.push(
                ValidationSeverity::Error,
                format!("{gallery_context}[{index}]"),
                "expected string URL",
            );
            continue;
        };
        if !seen.insert(url) {
            report.push(
                ValidationSeverity::Warning,
                format!("{gallery_context}[{index}]"),
                format!("duplicate gallery URL '{url}'"),
            );
        }
    }

    if let Some(first) = gallery.first().and_then(Value::as_str) {
        if cdn_folder(first).is_none() {
            report.push(
                ValidationSeverity::Info,
                format!("{gallery_context}[0]"),
                "no CDN folder in first image; gallery candidates cannot be generated",
            );
        }
    }
}

fn validate_details_url(report: &mut ValidationReport, object: &Map<String, Value>, context: &str) {
    let Some(url) = object.get("detailsUrl").and_then(Value::as_str) else {
        return;
    };
    if !url.is_empty() && extract_sku(url).is_none() {
        report.push(
            ValidationSeverity::Info,
            format!("{context}.detailsUrl"),
            format!("no 'details/<SKU>' segment in '{url}'"),
        );
    }
}
