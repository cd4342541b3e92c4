use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// A whole-number discount percentage in `0..=100`.
///
/// The backend stores discounts as floats, so deserialization accepts `20`
/// and `20.0` but rejects `12.5`, `-1` and `101`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Discount(u8);

impl Discount {
    pub const NONE: Discount = Discount(0);

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDiscount`] when `percent > 100`.
    pub fn new(percent: u8) -> Result<Self, CoreError> {
        if percent > 100 {
            return Err(CoreError::InvalidDiscount(percent.to_string()));
        }
        Ok(Self(percent))
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for Discount {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || !(0.0..=100.0).contains(&value) {
            return Err(CoreError::InvalidDiscount(value.to_string()));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u8))
    }
}

impl<'de> Deserialize<'de> for Discount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Discount::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// A product as served by `/api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Legacy numeric identifier, present on older records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(deserialize_with = "non_negative_price")]
    pub price: Decimal,
    #[serde(default)]
    pub discount: Discount,
    /// Category *name*, not id.
    #[serde(default, deserialize_with = "nullable_string")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub theme: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub flavour: String,
    /// Ordered image URLs; the first is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_available() -> bool {
    true
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = <Decimal as Deserialize>::deserialize(deserializer)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(serde::de::Error::custom(CoreError::InvalidPrice(
            price.to_string(),
        )));
    }
    Ok(price)
}

impl Product {
    /// Price after discount, rounded to 2 decimals for display.
    ///
    /// `price × (1 − discount/100)`. Never sent back to the backend.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.price, self.discount)
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        !self.discount.is_zero()
    }

    /// The cover image, if the product has any images.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Case-insensitive substring match on the product name.
    #[must_use]
    pub fn name_matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.name.to_lowercase().contains(&needle)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// `price × (1 − discount/100)`, rounded half away from zero to 2 decimals.
#[must_use]
pub fn effective_price(price: Decimal, discount: Discount) -> Decimal {
    let remaining = Decimal::from(100 - u32::from(discount.percent()));
    (price * remaining / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a price with exactly two decimals, e.g. `"80.00"`.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Client-side name search over an already-fetched list.
///
/// Preserves the original order; an empty query keeps everything.
#[must_use]
pub fn filter_by_name<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| p.name_matches(query)).collect()
}

/// Trims tags, drops blanks, and removes duplicates keeping first occurrence.
#[must_use]
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Fields for creating a product. Sent as multipart form fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub discount: Discount,
    pub tags: Vec<String>,
    pub available: bool,
    pub theme: String,
    pub flavour: String,
}

impl ProductDraft {
    /// Multipart text fields in the order the backend documents them.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("price", self.price.to_string()),
            ("category", self.category.clone()),
            ("discount", self.discount.percent().to_string()),
            ("tags", tags_json(&self.tags)),
            ("available", self.available.to_string()),
            ("theme", self.theme.clone()),
            ("flavour", self.flavour.clone()),
        ]
    }
}

/// Partial update for a product; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub available: Option<bool>,
    pub discount: Option<Discount>,
    pub tags: Option<Vec<String>>,
    pub theme: Option<String>,
    pub flavour: Option<String>,
}

impl ProductPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty()
    }

    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.name {
            fields.push(("name", v.clone()));
        }
        if let Some(v) = &self.description {
            fields.push(("description", v.clone()));
        }
        if let Some(v) = self.price {
            fields.push(("price", v.to_string()));
        }
        if let Some(v) = &self.category {
            fields.push(("category", v.clone()));
        }
        if let Some(v) = self.available {
            fields.push(("available", v.to_string()));
        }
        if let Some(v) = self.discount {
            fields.push(("discount", v.percent().to_string()));
        }
        if let Some(v) = &self.tags {
            fields.push(("tags", tags_json(v)));
        }
        if let Some(v) = &self.theme {
            fields.push(("theme", v.clone()));
        }
        if let Some(v) = &self.flavour {
            fields.push(("flavour", v.clone()));
        }
        fields
    }
}

/// The backend parses `tags` as a JSON-encoded array of strings.
fn tags_json(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_product(name: &str) -> Product {
        Product {
            id: format!("id-{name}"),
            product_id: None,
            name: name.to_string(),
            description: String::new(),
            price: dec("100.00"),
            discount: Discount::NONE,
            category: "Cake".to_string(),
            tags: vec![],
            theme: String::new(),
            flavour: String::new(),
            images: vec![],
            available: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn twenty_percent_off_one_hundred_is_eighty() {
        let mut p = make_product("Cake");
        p.discount = Discount::new(20).unwrap();
        assert_eq!(p.effective_price(), dec("80.00"));
        assert_eq!(format_price(p.effective_price()), "80.00");
    }

    #[test]
    fn zero_discount_keeps_price() {
        let mut p = make_product("Cake");
        p.price = dec("850");
        assert_eq!(p.effective_price(), p.price);
        assert!(!p.has_discount());
    }

    #[test]
    fn effective_price_rounds_half_away_from_zero() {
        // 0.25 at 50% off is 0.125
        assert_eq!(
            effective_price(dec("0.25"), Discount::new(50).unwrap()),
            dec("0.13")
        );
    }

    #[test]
    fn full_discount_is_free() {
        assert_eq!(
            effective_price(dec("42.10"), Discount::new(100).unwrap()),
            Decimal::ZERO
        );
    }

    #[test]
    fn discount_rejects_out_of_range() {
        assert!(Discount::new(101).is_err());
        assert!(Discount::try_from(-1.0).is_err());
        assert!(Discount::try_from(12.5).is_err());
        assert!(Discount::try_from(f64::NAN).is_err());
        assert_eq!(Discount::try_from(20.0).unwrap().percent(), 20);
    }

    #[test]
    fn name_filter_is_case_insensitive_and_ordered() {
        let products = vec![
            make_product("Chocolate Cake"),
            make_product("Vanilla Bread"),
            make_product("Choco Chip Cookie"),
        ];
        let names: Vec<&str> = filter_by_name(&products, "choc")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Chocolate Cake", "Choco Chip Cookie"]);
    }

    #[test]
    fn empty_query_matches_everything() {
        let products = vec![make_product("A"), make_product("B")];
        assert_eq!(filter_by_name(&products, "  ").len(), 2);
    }

    #[test]
    fn deserializes_backend_product() {
        let json = serde_json::json!({
            "_id": "507f1f77bcf86cd799439011",
            "name": "Chocolate Truffle Cake",
            "description": "Rich and moist.",
            "price": 850,
            "category": "Cake",
            "available": true,
            "discount": 20.0,
            "tags": ["chocolate", "birthday"],
            "theme": null,
            "flavour": "Chocolate",
            "images": ["/uploads/chocolate.jpg"]
        });
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.id, "507f1f77bcf86cd799439011");
        assert_eq!(p.price, dec("850"));
        assert_eq!(p.discount.percent(), 20);
        assert_eq!(p.theme, "");
        assert_eq!(p.cover_image(), Some("/uploads/chocolate.jpg"));
        assert_eq!(p.effective_price(), dec("680.00"));
    }

    #[test]
    fn deserialize_accepts_float_price() {
        let json = serde_json::json!({"_id": "1", "name": "Bun", "price": 12.99});
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.price, dec("12.99"));
        assert!(p.available, "available defaults to true");
    }

    #[test]
    fn deserialize_accepts_string_and_zero_price() {
        let json = serde_json::json!({"_id": "1", "name": "Bun", "price": "250.50"});
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.price, dec("250.50"));

        let json = serde_json::json!({"_id": "2", "name": "Sample", "price": 0});
        let p: Product = serde_json::from_value(json).unwrap();
        assert!(p.price.is_zero());
    }

    #[test]
    fn deserialize_rejects_fractional_discount() {
        let json = serde_json::json!({"_id": "1", "name": "Bun", "price": 1, "discount": 12.5});
        assert!(serde_json::from_value::<Product>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_negative_price() {
        let json = serde_json::json!({"_id": "1", "name": "Bun", "price": -3});
        assert!(serde_json::from_value::<Product>(json).is_err());
    }

    #[test]
    fn normalize_tags_trims_and_dedupes() {
        let tags = normalize_tags([" birthday", "eggless", "", "birthday "]);
        assert_eq!(tags, vec!["birthday", "eggless"]);
    }

    #[test]
    fn draft_form_fields_encode_tags_as_json() {
        let draft = ProductDraft {
            name: "Bun".to_string(),
            description: "Soft".to_string(),
            price: dec("2.50"),
            category: "Bread".to_string(),
            discount: Discount::new(5).unwrap(),
            tags: vec!["breakfast".to_string(), "vegan".to_string()],
            available: false,
            theme: "Classic".to_string(),
            flavour: "Plain".to_string(),
        };
        let fields = draft.form_fields();
        let get = |k: &str| fields.iter().find(|(n, _)| *n == k).map(|(_, v)| v.as_str());
        assert_eq!(get("price"), Some("2.50"));
        assert_eq!(get("discount"), Some("5"));
        assert_eq!(get("tags"), Some(r#"["breakfast","vegan"]"#));
        assert_eq!(get("available"), Some("false"));
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn patch_sends_only_present_fields() {
        let patch = ProductPatch {
            price: Some(dec("9.99")),
            available: Some(true),
            ..ProductPatch::default()
        };
        assert_eq!(
            patch.form_fields(),
            vec![("price", "9.99".to_string()), ("available", "true".to_string())]
        );
        assert!(ProductPatch::default().is_empty());
    }
}
