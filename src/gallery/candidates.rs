//! Guess sibling CDN image URLs for a product from its SKU and the folder of a known gallery image.
//!
//! Output is speculative: nothing here checks that a URL resolves. The guesses are bounded
//! (at most [`MAX_CANDIDATES_PER_PRODUCT`]) and ordered by how likely the asset is to exist.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Hard ceiling on guesses per product; configuration may lower it, never raise it.
pub const MAX_CANDIDATES_PER_PRODUCT: usize = 3;

pub const DEFAULT_CDN_BASE: &str = "https://cdn.makitatools.com/apps/cms/img/";
pub const DEFAULT_RESOLUTION_SUFFIX: &str = "_1500px.png";

static SKU_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)details/([A-Z0-9]+)").expect("valid sku regex"));
static CDN_FOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/img/([a-z]+)/").expect("valid folder regex"));

/// One entry of the suffix vocabulary: `<sku>_<token><resolution>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixToken {
    pub token: String,
    /// Use the SKU with the trailing variant marker stripped.
    #[serde(default)]
    pub base_sku: bool,
}

impl SuffixToken {
    fn new(token: &str, base_sku: bool) -> Self {
        Self {
            token: token.to_string(),
            base_sku,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Host and path prefix up to (and including) the slash before the folder.
    pub cdn_base: String,
    pub resolution_suffix: String,
    pub max_candidates: usize,
    /// Variant marker the vendor appends to some SKUs but drops from shared asset names.
    pub strip_trailing: Option<char>,
    /// Priority order: earlier entries are kept first when truncating.
    pub suffixes: Vec<SuffixToken>,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            resolution_suffix: DEFAULT_RESOLUTION_SUFFIX.to_string(),
            max_candidates: MAX_CANDIDATES_PER_PRODUCT,
            strip_trailing: Some('z'),
            suffixes: vec![
                SuffixToken::new("p", false),
                SuffixToken::new("fc", false),
                SuffixToken::new("fc", true),
                SuffixToken::new("kit", false),
                SuffixToken::new("angle", false),
                SuffixToken::new("side", false),
                SuffixToken::new("top", false),
            ],
        }
    }
}

impl CandidateConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_candidates > MAX_CANDIDATES_PER_PRODUCT {
            return Err(format!(
                "gallery.max_candidates {} exceeds the limit of {MAX_CANDIDATES_PER_PRODUCT}",
                self.max_candidates
            ));
        }
        if self.cdn_base.trim().is_empty() {
            return Err("gallery.cdn_base must not be empty".to_string());
        }
        if let Some(bad) = self.suffixes.iter().find(|s| s.token.trim().is_empty()) {
            return Err(format!("gallery.suffixes contains an empty token: {bad:?}"));
        }
        Ok(())
    }
}

/// SKU from a details URL like `https://www.makitatools.com/products/details/GDT02Z`.
pub fn extract_sku(details_url: &str) -> Option<&str> {
    SKU_SEGMENT
        .captures(details_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// CDN folder (`gdt` in `.../img/gdt/...`) of a gallery URL.
pub fn cdn_folder(image_url: &str) -> Option<&str> {
    CDN_FOLDER
        .captures(image_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Up to `max_candidates` new gallery URLs, in suffix priority order, none already in
/// `existing_gallery`. Missing SKU or missing folder yields an empty list.
pub fn generate_candidates(
    config: &CandidateConfig,
    details_url: Option<&str>,
    existing_gallery: &[String],
) -> Vec<String> {
    let Some(sku) = details_url.filter(|url| !url.is_empty()).and_then(extract_sku) else {
        return Vec::new();
    };
    // Only the first gallery entry anchors the folder; a guessed folder is a dead link.
    let Some(folder) = existing_gallery.first().and_then(|url| cdn_folder(url)) else {
        return Vec::new();
    };

    let sku_lower = sku.to_lowercase();
    let sku_base = match config.strip_trailing {
        Some(marker) => sku_lower.strip_suffix(marker).unwrap_or(sku_lower.as_str()),
        None => sku_lower.as_str(),
    };

    let limit = config.max_candidates.min(MAX_CANDIDATES_PER_PRODUCT);
    let mut out: Vec<String> = Vec::with_capacity(limit);
    for suffix in &config.suffixes {
        if out.len() >= limit {
            break;
        }
        let stem = if suffix.base_sku { sku_base } else { sku_lower.as_str() };
        // A SKU that is only the marker has no base form.
        if stem.is_empty() {
            continue;
        }
        let url = format!(
            "{}{folder}/{stem}_{}{}",
            config.cdn_base, suffix.token, config.resolution_suffix
        );
        if existing_gallery.contains(&url) || out.contains(&url) {
            continue;
        }
        out.push(url);
    }
    out
}
