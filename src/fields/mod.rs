//! Required shipping/warranty fields: detection and randomized fill of the missing ones.
//! A present, non-null value is never overwritten, so the fill pass is idempotent.

pub mod rng;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::product::Product;
pub use rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    FreeShipping,
    OfficialStore,
    WarrantyMonths,
    ShippingTimeDays,
    ShippingNotes,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        Self::FreeShipping,
        Self::OfficialStore,
        Self::WarrantyMonths,
        Self::ShippingTimeDays,
        Self::ShippingNotes,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::FreeShipping => "freeShipping",
            Self::OfficialStore => "officialStore",
            Self::WarrantyMonths => "warrantyMonths",
            Self::ShippingTimeDays => "shippingTimeDays",
            Self::ShippingNotes => "shippingNotes",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub fn missing_fields(product: &Product) -> Vec<RequiredField> {
    RequiredField::ALL
        .into_iter()
        .filter(|field| !product.has_field(field.key()))
        .collect()
}

/// Value pools the fill pass draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub free_shipping_chance: f64,
    pub official_store: bool,
    pub warranty_months: Vec<u32>,
    pub shipping_days: Vec<u32>,
    pub shipping_notes: Vec<String>,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            free_shipping_chance: 0.7,
            official_store: true,
            warranty_months: vec![12, 18, 24, 36],
            shipping_days: vec![1, 2, 3, 4, 5],
            shipping_notes: [
                "Envío express disponible; zonas rurales 4-6 días.",
                "Producto de alta demanda; envío prioritario incluido.",
                "Herramienta profesional; envío prioritario incluido.",
                "Accesorio esencial; envío express disponible.",
                "Producto voluminoso; tiempo de envío extendido para carga especial.",
                "Equipo especializado; envío cuidadoso incluido.",
                "Kit completo incluido; envío protegido para componentes delicados.",
                "Herramienta de construcción profesional; incluye accesorios básicos.",
                "Equipo industrial premium; manejo especializado y envío asegurado.",
                "Disponible para entrega inmediata; zonas remotas 5-7 días.",
                "Envío gratuito en compras superiores a $200.000.",
                "Producto en stock; entrega garantizada en 1-3 días hábiles.",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl FieldDefaults {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.free_shipping_chance) {
            return Err(format!(
                "fields.free_shipping_chance must be within [0, 1], got {}",
                self.free_shipping_chance
            ));
        }
        for (label, empty) in [
            ("warranty_months", self.warranty_months.is_empty()),
            ("shipping_days", self.shipping_days.is_empty()),
            ("shipping_notes", self.shipping_notes.is_empty()),
        ] {
            if empty {
                return Err(format!("fields.{label} must not be empty"));
            }
        }
        Ok(())
    }

    fn pick(&self, field: RequiredField, rng: &mut Rng) -> Value {
        match field {
            RequiredField::FreeShipping => Value::Bool(rng.chance(self.free_shipping_chance)),
            RequiredField::OfficialStore => Value::Bool(self.official_store),
            RequiredField::WarrantyMonths => pick_or_null(rng.choose(&self.warranty_months)),
            RequiredField::ShippingTimeDays => pick_or_null(rng.choose(&self.shipping_days)),
            RequiredField::ShippingNotes => pick_or_null(rng.choose(&self.shipping_notes)),
        }
    }
}

fn pick_or_null<T: Clone + Into<Value>>(pick: Option<&T>) -> Value {
    pick.cloned().map(Into::into).unwrap_or(Value::Null)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedProduct {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub filled: Vec<RequiredField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    pub total_products: usize,
    pub completed: Vec<CompletedProduct>,
}

/// Fill the missing required fields of one product. Returns the fields that were written.
pub fn complete_product(
    product: &mut Product,
    defaults: &FieldDefaults,
    rng: &mut Rng,
) -> Vec<RequiredField> {
    let missing = missing_fields(product);
    for field in &missing {
        product
            .extra
            .insert(field.key().to_string(), defaults.pick(*field, rng));
    }
    missing
}

pub fn complete_catalog(
    products: &mut [Product],
    defaults: &FieldDefaults,
    rng: &mut Rng,
) -> CompletionSummary {
    let mut summary = CompletionSummary {
        total_products: products.len(),
        ..CompletionSummary::default()
    };
    for (index, product) in products.iter_mut().enumerate() {
        let filled = complete_product(product, defaults, rng);
        if filled.is_empty() {
            continue;
        }
        let name = product.display_name(40);
        tracing::info!(
            "ID {}: {name} (filled {})",
            product.id,
            join_fields(&filled)
        );
        summary.completed.push(CompletedProduct {
            index,
            id: product.id.to_string(),
            name,
            filled,
        });
    }
    summary
}

pub fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::key)
        .collect::<Vec<_>>()
        .join(", ")
}
