//! The `produtos` collection schema and its field names.

use serde::{Deserialize, Serialize};

/// Document id field.
pub const FIELD_ID: &str = "id";
/// Product name field.
pub const FIELD_NAME: &str = "nome";
/// Product description field.
pub const FIELD_DESCRIPTION: &str = "descricao";
/// Price field.
pub const FIELD_PRICE: &str = "preco";
/// Category facet.
pub const FIELD_CATEGORY: &str = "categoria";
/// Brand facet.
pub const FIELD_BRAND: &str = "marca";
/// Rating field, also the default sorting field.
pub const FIELD_RATING: &str = "avaliacao";
/// Stock field.
pub const FIELD_STOCK: &str = "estoque";
/// Tags facet.
pub const FIELD_TAGS: &str = "tags";

/// Fields searched by a full product search.
pub const SEARCH_QUERY_FIELDS: [&str; 4] = [FIELD_NAME, FIELD_DESCRIPTION, FIELD_BRAND, FIELD_TAGS];

/// Fields searched by an autocomplete prefix search.
pub const AUTOCOMPLETE_QUERY_FIELDS: [&str; 2] = [FIELD_NAME, FIELD_BRAND];

/// A field declaration in a collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Engine field type (`string`, `float`, `int32`, `string[]`).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the field is faceted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub facet: bool,
}

impl FieldSchema {
    fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            facet: false,
        }
    }

    fn faceted(name: &str, field_type: &str) -> Self {
        Self {
            facet: true,
            ..Self::new(name, field_type)
        }
    }
}

/// A collection schema as accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Collection name.
    pub name: String,
    /// Field declarations.
    pub fields: Vec<FieldSchema>,
    /// Field used to order results when no sort is given.
    pub default_sorting_field: String,
}

/// Builds the product collection schema under the given collection name.
#[must_use]
pub fn product_collection_schema(collection: &str) -> CollectionSchema {
    CollectionSchema {
        name: collection.to_string(),
        fields: vec![
            FieldSchema::new(FIELD_ID, "string"),
            FieldSchema::new(FIELD_NAME, "string"),
            FieldSchema::new(FIELD_DESCRIPTION, "string"),
            FieldSchema::new(FIELD_PRICE, "float"),
            FieldSchema::faceted(FIELD_CATEGORY, "string"),
            FieldSchema::faceted(FIELD_BRAND, "string"),
            FieldSchema::new(FIELD_RATING, "float"),
            FieldSchema::new(FIELD_STOCK, "int32"),
            FieldSchema::faceted(FIELD_TAGS, "string[]"),
        ],
        default_sorting_field: FIELD_RATING.to_string(),
    }
}
