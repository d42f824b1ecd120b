//! Product documents and id derivation.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Maximum length of a derived product id, in characters.
pub const MAX_DERIVED_ID_LENGTH: usize = 50;

/// Maximum product name length.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum product description length.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum category and brand length.
pub const MAX_FACET_LENGTH: usize = 50;

/// Maximum product rating.
pub const MAX_RATING: f64 = 5.0;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex: non-word characters"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex: whitespace run"));

/// Derives a slug-like product id from a product name.
///
/// Lowercases the name, strips every character that is neither a word
/// character nor whitespace, collapses whitespace runs into `_` and keeps at
/// most [`MAX_DERIVED_ID_LENGTH`] characters.
///
/// # Examples
///
/// ```
/// use search_tool::derive_product_id;
///
/// assert_eq!(derive_product_id("Smartphone XYZ!!"), "smartphone_xyz");
/// assert_eq!(derive_product_id("Fone  Bluetooth  JBL"), "fone_bluetooth_jbl");
/// ```
#[must_use]
pub fn derive_product_id(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, "_");
    collapsed.chars().take(MAX_DERIVED_ID_LENGTH).collect()
}

/// A product document as stored in the engine.
///
/// Field names on the wire follow the `produtos` collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product id.
    pub id: String,
    /// Product name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Detailed description.
    #[serde(rename = "descricao")]
    pub description: String,
    /// Price, strictly positive.
    #[serde(rename = "preco")]
    pub price: f64,
    /// Category (facet).
    #[serde(rename = "categoria")]
    pub category: String,
    /// Brand (facet).
    #[serde(rename = "marca")]
    pub brand: String,
    /// Average rating in `[0, 5]`.
    #[serde(rename = "avaliacao")]
    pub rating: f64,
    /// Units in stock.
    #[serde(rename = "estoque")]
    pub stock: i64,
    /// Classification tags (facet).
    pub tags: Vec<String>,
}

/// A product submitted for indexing, possibly without an id.
///
/// Accepts both the collection field names (`nome`, `preco`, ...) and their
/// English aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Optional explicit id. Derived from the name when absent or blank.
    #[serde(default)]
    pub id: Option<String>,
    /// Product name.
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    /// Detailed description.
    #[serde(rename = "descricao", alias = "description")]
    pub description: String,
    /// Price, strictly positive.
    #[serde(rename = "preco", alias = "price")]
    pub price: f64,
    /// Category.
    #[serde(rename = "categoria", alias = "category")]
    pub category: String,
    /// Brand.
    #[serde(rename = "marca", alias = "brand")]
    pub brand: String,
    /// Average rating, defaults to 0.
    #[serde(rename = "avaliacao", alias = "rating", default)]
    pub rating: f64,
    /// Units in stock, defaults to 0.
    #[serde(rename = "estoque", alias = "stock", default)]
    pub stock: i64,
    /// Tags, defaults to empty.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductInput {
    /// Validates field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_LENGTH {
            return Err(Error::InvalidInput(format!(
                "nome must have between 1 and {MAX_NAME_LENGTH} characters"
            )));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::InvalidInput(format!(
                "descricao must have at most {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(Error::InvalidInput(
                "preco must be greater than 0".to_string(),
            ));
        }
        if self.category.chars().count() > MAX_FACET_LENGTH {
            return Err(Error::InvalidInput(format!(
                "categoria must have at most {MAX_FACET_LENGTH} characters"
            )));
        }
        if self.brand.chars().count() > MAX_FACET_LENGTH {
            return Err(Error::InvalidInput(format!(
                "marca must have at most {MAX_FACET_LENGTH} characters"
            )));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(Error::InvalidInput(format!(
                "avaliacao must be between 0 and {MAX_RATING}"
            )));
        }
        if self.stock < 0 {
            return Err(Error::InvalidInput(
                "estoque must be greater than or equal to 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates the input and resolves it into a storable [`Product`].
    ///
    /// A missing or blank id is replaced by [`derive_product_id`] applied to
    /// the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if validation fails or the name yields
    /// an empty id.
    pub fn into_product(self) -> Result<Product> {
        self.validate()?;

        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => derive_product_id(&self.name),
        };
        if id.is_empty() {
            return Err(Error::InvalidInput(format!(
                "cannot derive an id from nome '{}'",
                self.name
            )));
        }

        Ok(Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            brand: self.brand,
            rating: self.rating,
            stock: self.stock,
            tags: self.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn input(name: &str) -> ProductInput {
        ProductInput {
            id: None,
            name: name.to_string(),
            description: "Tela OLED de 6.1 polegadas".to_string(),
            price: 4999.0,
            category: "smartphones".to_string(),
            brand: "Apple".to_string(),
            rating: 4.8,
            stock: 12,
            tags: vec!["5g".to_string()],
        }
    }

    #[test_case("Smartphone XYZ!!", "smartphone_xyz" ; "strips punctuation")]
    #[test_case("iPhone 15 Pro", "iphone_15_pro" ; "lowercases")]
    #[test_case("Fone   Bluetooth\tJBL", "fone_bluetooth_jbl" ; "collapses whitespace")]
    #[test_case(" Caixa de Som ", "_caixa_de_som_" ; "keeps edge whitespace as underscores")]
    #[test_case("Câmera Ação 4K", "câmera_ação_4k" ; "keeps unicode word characters")]
    #[test_case("Notebook_Gamer-X", "notebook_gamerx" ; "keeps underscores drops hyphens")]
    fn test_derive_product_id(name: &str, expected: &str) {
        assert_eq!(derive_product_id(name), expected);
    }

    #[test]
    fn test_derive_product_id_truncates_to_fifty_chars() {
        let name = "a".repeat(80);
        assert_eq!(derive_product_id(&name).chars().count(), 50);
    }

    #[test]
    fn test_into_product_derives_missing_id() {
        let product = input("Smartphone XYZ!!").into_product().unwrap();
        assert_eq!(product.id, "smartphone_xyz");
    }

    #[test]
    fn test_into_product_keeps_explicit_id() {
        let mut product = input("Smartphone XYZ");
        product.id = Some("sku-123".to_string());
        assert_eq!(product.into_product().unwrap().id, "sku-123");
    }

    #[test]
    fn test_into_product_derives_blank_id() {
        let mut product = input("Smartphone XYZ");
        product.id = Some("  ".to_string());
        assert_eq!(product.into_product().unwrap().id, "smartphone_xyz");
    }

    #[test]
    fn test_into_product_rejects_underivable_id() {
        let err = input("!!!").into_product().unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut product = input("Tablet");
        product.price = 0.0;
        assert!(product.validate().is_err());

        let mut product = input("Tablet");
        product.rating = 5.5;
        assert!(product.validate().is_err());

        let mut product = input("Tablet");
        product.stock = -1;
        assert!(product.validate().is_err());

        let mut product = input("Tablet");
        product.brand = "x".repeat(51);
        assert!(product.validate().is_err());

        assert!(input("").validate().is_err());
        assert!(input("Tablet").validate().is_ok());
    }

    #[test]
    fn test_product_input_accepts_collection_and_english_names() {
        let pt: ProductInput = serde_json::from_value(serde_json::json!({
            "nome": "Kindle", "descricao": "E-reader", "preco": 499.0,
            "categoria": "leitores", "marca": "Amazon"
        }))
        .unwrap();
        let en: ProductInput = serde_json::from_value(serde_json::json!({
            "name": "Kindle", "description": "E-reader", "price": 499.0,
            "category": "leitores", "brand": "Amazon"
        }))
        .unwrap();
        assert_eq!(pt, en);
        assert!(pt.tags.is_empty());
        assert!(pt.rating.abs() < f64::EPSILON);
    }

    #[test]
    fn test_product_serializes_collection_field_names() {
        let product = input("Kindle").into_product().unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], "kindle");
        assert_eq!(value["nome"], "Kindle");
        assert_eq!(value["marca"], "Apple");
        assert_eq!(value["estoque"], 12);
    }
}
