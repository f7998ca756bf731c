//! Web font catalog
//!
//! Reads a Google Fonts style listing:
//! `{"items": [{"family": "...", "variants": ["regular", "700"], "files": {"regular": "https://..."}}]}`.
//! Variant strings outside the known weights are skipped.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use contracts::FontVariant;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{FontError, Result};

#[derive(Debug, Deserialize)]
struct RawCatalog {
    items: Vec<RawFont>,
}

#[derive(Debug, Deserialize)]
struct RawFont {
    family: String,
    #[serde(default)]
    variants: Vec<String>,
    #[serde(default)]
    files: HashMap<String, String>,
}

/// One catalog family
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFont {
    family: String,
    files: BTreeMap<FontVariant, String>,
}

impl CatalogFont {
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Variants with a downloadable file, weight-ordered
    pub fn variants(&self) -> impl Iterator<Item = FontVariant> + '_ {
        self.files.keys().copied()
    }

    pub fn has_variant(&self, variant: FontVariant) -> bool {
        self.files.contains_key(&variant)
    }

    /// File URL for a variant
    pub fn file_url(&self, variant: FontVariant) -> Option<&str> {
        self.files.get(&variant).map(String::as_str)
    }

    /// Every variant as shown to users (`Regular`, `Bold (700) Italic`, ...)
    pub fn human_readable_variants(&self) -> Vec<String> {
        self.variants().map(|v| v.human_readable()).collect()
    }

    /// Upright variants only
    pub fn human_readable_weights(&self) -> Vec<String> {
        self.variants()
            .filter(|v| !v.is_italic())
            .map(|v| v.human_readable())
            .collect()
    }
}

/// Family listing with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    fonts: Vec<CatalogFont>,
    by_name: HashMap<String, usize>,
}

impl FontCatalog {
    /// Parse the catalog JSON
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(content)
            .map_err(|e| FontError::catalog(format!("JSON parse error: {e}")))?;

        let mut catalog = FontCatalog::default();
        for item in raw.items {
            let files: BTreeMap<FontVariant, String> = item
                .files
                .into_iter()
                .filter_map(|(variant, url)| match variant.parse::<FontVariant>() {
                    Ok(v) => Some((v, url)),
                    Err(e) => {
                        debug!(family = %item.family, error = %e, "skipping variant");
                        None
                    }
                })
                .collect();

            if files.is_empty() {
                debug!(
                    family = %item.family,
                    listed = item.variants.len(),
                    "family has no usable file, skipped"
                );
                continue;
            }

            let key = item.family.to_lowercase();
            if catalog.by_name.contains_key(&key) {
                debug!(family = %item.family, "duplicate family, first entry kept");
                continue;
            }
            catalog.by_name.insert(key, catalog.fonts.len());
            catalog.fonts.push(CatalogFont {
                family: item.family,
                files,
            });
        }

        Ok(catalog)
    }

    /// Load the catalog from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FontError::catalog(format!("cannot read '{}': {e}", path.display()))
        })?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), families = catalog.len(), "font catalog loaded");
        Ok(catalog)
    }

    /// Family by name, ignoring case
    pub fn find(&self, family: &str) -> Option<&CatalogFont> {
        self.by_name
            .get(&family.to_lowercase())
            .map(|&idx| &self.fonts[idx])
    }

    /// File URL for a family + variant
    pub fn resolve(&self, family: &str, variant: FontVariant) -> Result<&str> {
        let font = self.find(family).ok_or_else(|| FontError::UnknownFamily {
            family: family.to_string(),
        })?;
        font.file_url(variant).ok_or_else(|| FontError::UnknownVariant {
            family: font.family.clone(),
            variant,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogFont> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "kind": "webfonts#webfontList",
        "items": [
            {
                "family": "Roboto",
                "variants": ["100", "regular", "italic", "700", "700italic"],
                "files": {
                    "100": "https://fonts.test/roboto-100.ttf",
                    "regular": "https://fonts.test/roboto-regular.ttf",
                    "italic": "https://fonts.test/roboto-italic.ttf",
                    "700": "https://fonts.test/roboto-700.ttf",
                    "700italic": "https://fonts.test/roboto-700italic.ttf"
                }
            },
            {
                "family": "Odd Sans",
                "variants": ["650"],
                "files": { "650": "https://fonts.test/odd.ttf" }
            }
        ]
    }"#;

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = FontCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("rOBOTO").unwrap().family(), "Roboto");
        assert!(catalog.find("Odd Sans").is_none());
    }

    #[test]
    fn test_resolve_variant() {
        let catalog = FontCatalog::from_json(CATALOG).unwrap();
        let bold = FontVariant::new(700, false).unwrap();
        assert_eq!(
            catalog.resolve("roboto", bold).unwrap(),
            "https://fonts.test/roboto-700.ttf"
        );

        let black = FontVariant::new(900, false).unwrap();
        assert!(matches!(
            catalog.resolve("Roboto", black),
            Err(FontError::UnknownVariant { .. })
        ));
        assert!(matches!(
            catalog.resolve("Lato", FontVariant::REGULAR),
            Err(FontError::UnknownFamily { .. })
        ));
    }

    #[test]
    fn test_human_readable_variants() {
        let catalog = FontCatalog::from_json(CATALOG).unwrap();
        let roboto = catalog.find("Roboto").unwrap();
        assert_eq!(
            roboto.human_readable_variants(),
            vec![
                "Thin (100)",
                "Regular",
                "Italic",
                "Bold (700)",
                "Bold (700) Italic"
            ]
        );
        assert_eq!(
            roboto.human_readable_weights(),
            vec!["Thin (100)", "Regular", "Bold (700)"]
        );
    }

    #[test]
    fn test_missing_items_is_error() {
        let err = FontCatalog::from_json(r#"{"kind": "webfonts#webfontList"}"#).unwrap_err();
        assert!(matches!(err, FontError::Catalog { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let catalog = FontCatalog::load(file.path()).unwrap();
        assert!(catalog.find("roboto").is_some());
    }
}
