//! Gallery passes: append guessed CDN candidates across the catalog, or operator-supplied URLs
//! to a single product. Both only ever append; existing entries keep their order.

pub mod candidates;

use serde::Serialize;

use crate::catalog::error::{CatalogError, Result};
use crate::catalog::product::{push_unique, Product};
pub use candidates::{generate_candidates, CandidateConfig, MAX_CANDIDATES_PER_PRODUCT};

/// Per-record outcome of the enhance pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryChange {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub before: usize,
    pub after: usize,
}

impl GalleryChange {
    pub fn added(&self) -> usize {
        self.after - self.before
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnhanceSummary {
    pub total_products: usize,
    pub enhanced_products: usize,
    pub new_images: usize,
    pub changes: Vec<GalleryChange>,
}

impl EnhanceSummary {
    pub fn average_new_images(&self) -> f64 {
        if self.total_products == 0 {
            0.0
        } else {
            self.new_images as f64 / self.total_products as f64
        }
    }

    /// True when the pass changed anything that needs writing back.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Append candidate URLs to every product that yields any. Products without an
/// `imageGallery` key get one (seeded from `image` when present) even if nothing was added;
/// a `null` gallery stays `null` unless candidates are appended.
pub fn enhance_galleries(products: &mut [Product], config: &CandidateConfig) -> EnhanceSummary {
    let mut summary = EnhanceSummary {
        total_products: products.len(),
        ..EnhanceSummary::default()
    };

    for (index, product) in products.iter_mut().enumerate() {
        let mut gallery = product.working_gallery();
        let before = gallery.len();

        let additions = generate_candidates(config, product.details_url(), &gallery);
        let added = additions
            .iter()
            .filter(|url| push_unique(&mut gallery, url))
            .count();

        let name = product.display_name(50);
        if added > 0 {
            summary.enhanced_products += 1;
            summary.new_images += added;
            summary.changes.push(GalleryChange {
                index,
                id: product.id.to_string(),
                name: name.clone(),
                before,
                after: gallery.len(),
            });
            tracing::info!(
                "[{}/{}] {name}: gallery {before} -> {} (+{added} candidates)",
                index + 1,
                summary.total_products,
                gallery.len()
            );
            product.set_gallery(gallery);
        } else {
            tracing::info!(
                "[{}/{}] {name}: no candidate images",
                index + 1,
                summary.total_products
            );
            if !product.has_gallery_key() {
                product.set_gallery(gallery);
                summary.changes.push(GalleryChange {
                    index,
                    id: product.id.to_string(),
                    name,
                    before,
                    after: before,
                });
            }
        }
    }

    summary
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualAddReport {
    pub id: String,
    pub name: String,
    pub before: usize,
    pub after: usize,
    pub added: usize,
}

/// Append `urls` (skipping empty and already-present ones) to the product whose id matches `raw_id`.
pub fn add_images(products: &mut [Product], raw_id: &str, urls: &[String]) -> Result<ManualAddReport> {
    let product = products
        .iter_mut()
        .find(|p| p.id.matches(raw_id))
        .ok_or_else(|| CatalogError::ProductNotFound(raw_id.to_string()))?;

    let mut gallery = product.working_gallery();
    let before = gallery.len();
    let added = urls.iter().filter(|url| push_unique(&mut gallery, url)).count();
    let after = gallery.len();
    product.set_gallery(gallery);

    Ok(ManualAddReport {
        id: product.id.to_string(),
        name: product.display_name(50),
        before,
        after,
        added,
    })
}

/// Products whose gallery holds at most one image, with that count.
pub fn thin_galleries(products: &[Product]) -> Vec<(&Product, usize)> {
    products
        .iter()
        .map(|p| (p, p.gallery().map_or(0, <[String]>::len)))
        .filter(|(_, count)| *count <= 1)
        .collect()
}
