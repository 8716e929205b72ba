//! Load and save the catalog file (a JSON array of products).
//! Saves go through a sibling temp file and a rename, so a failed run never leaves a partial file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::error::{CatalogError, Result};
use crate::catalog::product::Product;

pub const DEFAULT_CATALOG_PATH: &str = "src/services/products.json";

pub fn load_catalog(path: &Path) -> Result<Vec<Product>> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write products as 2-space-indented JSON. Non-ASCII text is written literally.
pub fn save_catalog(path: &Path, products: &[Product]) -> Result<()> {
    let payload = serde_json::to_string_pretty(products).map_err(CatalogError::Serialize)?;

    let tmp = temp_sibling(path);
    let write_err = |source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Err(err) = fs::write(&tmp, payload) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(err));
    }
    fs::rename(&tmp, path).map_err(|err| {
        let _ = fs::remove_file(&tmp);
        write_err(err)
    })?;

    tracing::debug!(path = %path.display(), records = products.len(), "catalog saved");
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_keeps_records_and_accents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[{"id":"1","name":"Esmeril Angular","shippingNotes":"Envío gratuito en compras superiores a $200.000."}]"#,
        )
        .unwrap();

        let products = load_catalog(&path).unwrap();
        save_catalog(&path, &products).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Envío gratuito"));
        assert!(written.contains("\n  {\n    \"id\": \"1\""));
        assert_eq!(load_catalog(&path).unwrap(), products);
        assert!(!dir.path().join("products.json.tmp").exists());
    }

    #[test]
    fn null_typed_keys_survive_complete_and_save() {
        use crate::fields::{complete_catalog, FieldDefaults, Rng};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[{"id":"1","name":"x","image":null,"detailsUrl":null,"imageGallery":null}]"#,
        )
        .unwrap();

        let mut products = load_catalog(&path).unwrap();
        complete_catalog(&mut products, &FieldDefaults::default(), &mut Rng::new(3));
        save_catalog(&path, &products).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let record = written[0].as_object().unwrap();
        for key in ["image", "detailsUrl", "imageGallery"] {
            assert!(record.get(key).is_some_and(|v| v.is_null()), "{key} should stay null");
        }
        assert_eq!(record["officialStore"], true);
    }

    #[test]
    fn records_without_a_name_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, r#"[{"id":"1","name":"ok"},{"id":"2","name":null},{"id":"3"}]"#).unwrap();

        let products = load_catalog(&path).unwrap();
        assert_eq!(products[1].name(), "Sin nombre");
        save_catalog(&path, &products).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written[1]["name"].is_null());
        assert!(written[2].get("name").is_none());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "[{\"id\": ").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains("products.json"));
    }
}
