use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProductSort {
    #[default]
    #[serde(rename = "relevant")]
    Relevant,
    #[serde(rename = "low-high")]
    PriceAsc,
    #[serde(rename = "high-low")]
    PriceDesc,
}

impl ProductSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            ProductSort::Relevant => "created_at DESC, product_id DESC",
            ProductSort::PriceAsc => "price ASC, product_id ASC",
            ProductSort::PriceDesc => "price DESC, product_id DESC",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct FindAllProducts {
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub sub_category: Option<String>,

    #[serde(default)]
    pub bestseller: Option<bool>,

    #[serde(default)]
    pub sort: ProductSort,
}

impl FindAllProducts {
    /// True when no filter narrows the catalogue, so the listing can be cached.
    pub fn is_unfiltered(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());

        blank(&self.search)
            && blank(&self.category)
            && blank(&self.sub_category)
            && self.bestseller.is_none()
            && self.sort == ProductSort::Relevant
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    #[schema(example = "Cotton Crew T-Shirt")]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 1, message = "Price must be greater than zero"))]
    #[schema(example = 499)]
    pub price: i64,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    #[schema(example = "Men")]
    pub category: String,

    #[validate(length(min = 1, max = 100, message = "Sub category must be 1-100 characters"))]
    #[schema(example = "Topwear")]
    pub sub_category: String,

    #[validate(custom(function = "validate_sizes"))]
    #[schema(example = json!(["S", "M", "L"]))]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub bestseller: bool,
}

impl CreateProductRequest {
    /// Trims sizes and drops blanks and duplicates, keeping first-seen order.
    pub fn normalize_sizes(&mut self) {
        let mut seen = Vec::with_capacity(self.sizes.len());
        for size in self.sizes.drain(..) {
            let size = size.trim().to_string();
            if !size.is_empty() && !seen.contains(&size) {
                seen.push(size);
            }
        }
        self.sizes = seen;
    }
}

fn validate_sizes(sizes: &[String]) -> Result<(), ValidationError> {
    if sizes.iter().all(|s| s.trim().is_empty()) {
        let mut err = ValidationError::new("sizes");
        err.message = Some("At least one size is required".into());
        return Err(err);
    }
    Ok(())
}

/// An uploaded image, held in memory until it is pushed to the CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sizes: &[&str]) -> CreateProductRequest {
        CreateProductRequest {
            name: "Tee".into(),
            description: "Soft cotton".into(),
            price: 499,
            category: "Men".into(),
            sub_category: "Topwear".into(),
            sizes: sizes.iter().map(ToString::to_string).collect(),
            bestseller: false,
        }
    }

    #[test]
    fn normalize_sizes_dedups_and_trims() {
        let mut req = request(&[" M", "L", "M ", "", "XL"]);
        req.normalize_sizes();
        assert_eq!(req.sizes, vec!["M", "L", "XL"]);
    }

    #[test]
    fn empty_sizes_fail_validation() {
        assert!(request(&[]).validate().is_err());
        assert!(request(&[" "]).validate().is_err());
        assert!(request(&["S"]).validate().is_ok());
    }

    #[test]
    fn category_longer_than_column_fails_validation() {
        let mut req = request(&["M"]);
        req.category = "x".repeat(101);
        assert!(req.validate().is_err());

        let mut req = request(&["M"]);
        req.sub_category = "y".repeat(101);
        assert!(req.validate().is_err());

        let mut req = request(&["M"]);
        req.category = "x".repeat(100);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn default_listing_is_cacheable() {
        assert!(FindAllProducts::default().is_unfiltered());

        let filtered = FindAllProducts {
            category: Some("Women".into()),
            ..Default::default()
        };
        assert!(!filtered.is_unfiltered());

        let blank_search = FindAllProducts {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank_search.is_unfiltered());
    }
}
