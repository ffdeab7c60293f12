use std::fmt;

use mongodb::bson::Bson;

/// Identifier of a product document. Mirrors the `_id` types found in the
/// products collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductId {
    /// Hex form of a 12-byte ObjectId.
    ObjectId(String),
    Int(i64),
    String(String),
    /// Any other `_id` (double, UUID, compound document), kept verbatim so
    /// updates address the exact value that was read.
    Other(Bson),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::ObjectId(hex) => write!(f, "ObjectId({})", hex),
            ProductId::Int(value) => write!(f, "{}", value),
            ProductId::String(value) => write!(f, "\"{}\"", value),
            ProductId::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Int(value)
    }
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        ProductId::Int(value as i64)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::String(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: Option<String>,
    description: Option<String>,
    embeddings: Option<Vec<f32>>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, description: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description,
            embeddings: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_embeddings(mut self, embeddings: Vec<f32>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn embeddings(&self) -> Option<&[f32]> {
        self.embeddings.as_deref()
    }

    pub fn has_embeddings(&self) -> bool {
        self.embeddings.is_some()
    }

    /// Text to feed the model, `None` when the description is absent or blank.
    pub fn embeddable_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn set_embeddings(&mut self, embeddings: Vec<f32>) {
        self.embeddings = Some(embeddings);
    }

    pub fn clear_embeddings(&mut self) -> bool {
        self.embeddings.take().is_some()
    }
}

/// Which documents an operation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductFilter {
    #[default]
    All,
    WithEmbeddings,
    MissingEmbeddings,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::WithEmbeddings => product.has_embeddings(),
            ProductFilter::MissingEmbeddings => !product.has_embeddings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeddable_text_trims_and_rejects_blank() {
        let product = Product::new(1, Some("  red shoes ".to_string()));
        assert_eq!(product.embeddable_text(), Some("red shoes"));

        let blank = Product::new(2, Some("   ".to_string()));
        assert_eq!(blank.embeddable_text(), None);

        let missing = Product::new(3, None);
        assert_eq!(missing.embeddable_text(), None);
    }

    #[test]
    fn test_filter_matches_embedding_presence() {
        let with = Product::new(1, None).with_embeddings(vec![0.5]);
        let without = Product::new(2, None);

        assert!(ProductFilter::All.matches(&with));
        assert!(ProductFilter::WithEmbeddings.matches(&with));
        assert!(!ProductFilter::WithEmbeddings.matches(&without));
        assert!(ProductFilter::MissingEmbeddings.matches(&without));
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::Int(7).to_string(), "7");
        assert_eq!(ProductId::from("sku-1").to_string(), "\"sku-1\"");
        assert_eq!(
            ProductId::ObjectId("65f0c0ffee".to_string()).to_string(),
            "ObjectId(65f0c0ffee)"
        );
        assert!(ProductId::Other(Bson::Double(2.5)).to_string().contains("2.5"));
    }

    #[test]
    fn test_clear_embeddings_reports_presence() {
        let mut product = Product::new(1, None).with_embeddings(vec![1.0]);
        assert!(product.clear_embeddings());
        assert!(!product.clear_embeddings());
    }
}
