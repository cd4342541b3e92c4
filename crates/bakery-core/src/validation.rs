//! Field-level validation for the admin product and category forms.
//!
//! Forms hold raw text exactly as typed. `validate` turns them into typed
//! drafts or reports every failing field at once so the caller can block
//! submission and keep the user's input.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::categories::{slugify, Category, CategoryDraft, CategoryPatch};
use crate::products::{normalize_tags, Discount, Product, ProductDraft, ProductPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: &'static str, message: &str) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields: self.0 })
        }
    }
}

/// Raw product form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub discount: String,
    /// Comma-separated.
    pub tags: String,
    pub available: bool,
    pub theme: String,
    pub flavour: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            discount: "0".to_string(),
            tags: String::new(),
            available: true,
            theme: String::new(),
            flavour: String::new(),
        }
    }
}

impl ProductForm {
    /// Prefills the form for editing an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            discount: product.discount.percent().to_string(),
            tags: product.tags.join(", "),
            available: product.available,
            theme: product.theme.clone(),
            flavour: product.flavour.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate(&self) -> Result<ProductDraft, ValidationError> {
        let mut errors = Collector::default();
        errors.required("name", &self.name);
        errors.required("description", &self.description);
        errors.required("category", &self.category);

        let price = match Decimal::from_str(self.price.trim()) {
            Ok(p) if p.is_sign_negative() && !p.is_zero() => {
                errors.push("price", "must not be negative");
                None
            }
            Ok(p) => Some(p),
            Err(_) => {
                errors.push("price", "must be a number");
                None
            }
        };

        let discount = match self.discount.trim().parse::<u8>().map(Discount::new) {
            Ok(Ok(d)) => Some(d),
            _ => {
                errors.push("discount", "must be a whole number between 0 and 100");
                None
            }
        };

        errors.finish()?;
        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: price.unwrap_or_default(),
            category: self.category.trim().to_string(),
            discount: discount.unwrap_or_default(),
            tags: normalize_tags(self.tags.split(',')),
            available: self.available,
            theme: self.theme.trim().to_string(),
            flavour: self.flavour.trim().to_string(),
        })
    }

    /// Validates and keeps only the fields that differ from `original`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn to_patch(&self, original: &Product) -> Result<ProductPatch, ValidationError> {
        let draft = self.validate()?;
        let changed = |new: &String, old: &String| (new != old).then(|| new.clone());
        Ok(ProductPatch {
            name: changed(&draft.name, &original.name),
            description: changed(&draft.description, &original.description),
            price: (draft.price != original.price).then_some(draft.price),
            category: changed(&draft.category, &original.category),
            available: (draft.available != original.available).then_some(draft.available),
            discount: (draft.discount != original.discount).then_some(draft.discount),
            tags: (draft.tags != original.tags).then(|| draft.tags.clone()),
            theme: changed(&draft.theme, &original.theme),
            flavour: changed(&draft.flavour, &original.flavour),
        })
    }
}

/// Raw category form input.
///
/// While creating, the slug follows the name until the user edits the slug
/// directly. Editing an existing category never rewrites the slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    name: String,
    pub description: String,
    slug: String,
    slug_locked: bool,
}

impl CategoryForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            slug: category.slug.clone(),
            slug_locked: true,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        if !self.slug_locked {
            self.slug = slugify(name);
        }
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.slug = slug.to_string();
        self.slug_locked = true;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate(&self) -> Result<CategoryDraft, ValidationError> {
        let mut errors = Collector::default();
        errors.required("name", &self.name);
        errors.required("description", &self.description);
        errors.required("slug", &self.slug);
        if !self.slug.is_empty() && slugify(&self.slug) != self.slug {
            errors.push("slug", "may only contain a-z, 0-9 and '-'");
        }
        errors.finish()?;
        Ok(CategoryDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            slug: self.slug.clone(),
        })
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn to_patch(&self, original: &Category) -> Result<CategoryPatch, ValidationError> {
        let draft = self.validate()?;
        let changed = |new: String, old: &String| (&new != old).then_some(new);
        Ok(CategoryPatch {
            name: changed(draft.name, &original.name),
            description: changed(draft.description, &original.description),
            slug: changed(draft.slug, &original.slug),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Black Forest".to_string(),
            description: "Cherry and cream".to_string(),
            price: "1200.50".to_string(),
            category: "Cake".to_string(),
            discount: "10".to_string(),
            tags: "birthday, chocolate, birthday".to_string(),
            available: true,
            theme: "Classic".to_string(),
            flavour: "Chocolate".to_string(),
        }
    }

    #[test]
    fn valid_product_form_produces_draft() {
        let draft = valid_form().validate().unwrap();
        assert_eq!(draft.price, Decimal::from_str("1200.50").unwrap());
        assert_eq!(draft.discount.percent(), 10);
        assert_eq!(draft.tags, vec!["birthday", "chocolate"]);
    }

    #[test]
    fn product_form_reports_all_failing_fields() {
        let form = ProductForm {
            name: " ".to_string(),
            price: "abc".to_string(),
            discount: "150".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.message_for("name"), Some("is required"));
        assert_eq!(err.message_for("price"), Some("must be a number"));
        assert!(err.message_for("discount").is_some());
        assert!(err.message_for("category").is_none());
        assert_eq!(err.fields.len(), 3);
    }

    #[test]
    fn negative_price_is_rejected() {
        let form = ProductForm {
            price: "-1".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err().message_for("price"),
            Some("must not be negative")
        );
    }

    #[test]
    fn fractional_discount_is_rejected() {
        let form = ProductForm {
            discount: "12.5".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn to_patch_only_contains_changes() {
        let original_draft = valid_form().validate().unwrap();
        let original = Product {
            id: "p1".to_string(),
            product_id: None,
            name: original_draft.name,
            description: original_draft.description,
            price: original_draft.price,
            discount: original_draft.discount,
            category: original_draft.category,
            tags: original_draft.tags,
            theme: original_draft.theme,
            flavour: original_draft.flavour,
            images: vec![],
            available: true,
            created_at: None,
            updated_at: None,
        };
        let mut form = ProductForm::from_product(&original);
        form.price = "999".to_string();
        form.available = false;

        let patch = form.to_patch(&original).unwrap();
        assert_eq!(patch.price, Some(Decimal::from(999)));
        assert_eq!(patch.available, Some(false));
        assert!(patch.name.is_none());
        assert!(patch.tags.is_none());
    }

    #[test]
    fn new_category_slug_follows_name() {
        let mut form = CategoryForm::new();
        form.set_name("Dry Cakes");
        assert_eq!(form.slug(), "dry-cakes");
        form.set_name("Dry Cakes & Rusks");
        assert_eq!(form.slug(), "dry-cakes--rusks");
    }

    #[test]
    fn edited_slug_stops_following_name() {
        let mut form = CategoryForm::new();
        form.set_name("Cookies");
        form.set_slug("biscuits");
        form.set_name("Cookies and Biscuits");
        assert_eq!(form.slug(), "biscuits");
    }

    #[test]
    fn editing_existing_category_keeps_slug() {
        let category = Category {
            id: "c1".to_string(),
            name: "Cake".to_string(),
            description: "All cakes".to_string(),
            slug: "cakes".to_string(),
            images: vec![],
        };
        let mut form = CategoryForm::from_category(&category);
        form.set_name("Celebration Cake");
        assert_eq!(form.slug(), "cakes");
        let patch = form.to_patch(&category).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Celebration Cake"));
        assert!(patch.slug.is_none());
    }

    #[test]
    fn category_slug_with_spaces_is_rejected() {
        let mut form = CategoryForm::new();
        form.set_name("Pies");
        form.description = "Sweet and savoury".to_string();
        form.set_slug("sweet pies");
        let err = form.validate().unwrap_err();
        assert!(err.message_for("slug").is_some());
    }
}
