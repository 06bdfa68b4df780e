use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fireinv_core::{DomainError, DomainResult, ProductId};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Unit price in cents (two decimal places, at most 99 999 999.99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const MAX_CENTS: u64 = 9_999_999_999;

    pub fn from_cents(cents: u64) -> DomainResult<Self> {
        if cents > Self::MAX_CENTS {
            return Err(DomainError::validation("price must be <= 99999999.99"));
        }
        Ok(Self(cents))
    }

    /// Round a decimal amount to whole cents.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price must be >= 0"));
        }
        let cents = (amount * 100.0).round();
        if cents > Self::MAX_CENTS as f64 {
            return Err(DomainError::validation("price must be <= 99999999.99"));
        }
        Ok(Self(cents as u64))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

/// Partial update; `None` leaves a field unchanged. An empty description
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(input: ProductInput, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: ProductId::new(),
            name: validate_name(&input.name)?,
            description: validate_description(input.description.as_deref())?,
            price: Price::from_decimal(input.price)?,
            quantity: validate_quantity(input.quantity)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate every provided field, then apply them all (or none).
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|d| validate_description(Some(d)))
            .transpose()?;
        let price = patch.price.map(Price::from_decimal).transpose()?;
        let quantity = patch.quantity.map(validate_quantity).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name required"));
    }
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(DomainError::validation(format!(
            "name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: Option<&str>) -> DomainResult<Option<String>> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(Some(description.to_string()))
}

fn validate_quantity(quantity: i64) -> DomainResult<i32> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity must be >= 0"));
    }
    i32::try_from(quantity).map_err(|_| DomainError::validation("quantity is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        ProductInput {
            name: "Fire extinguisher".into(),
            description: Some("6 kg ABC powder".into()),
            price: 49.99,
            quantity: 12,
        }
    }

    #[test]
    fn create_success() {
        let now = Utc::now();
        let p = Product::create(input(), now).unwrap();
        assert_eq!(p.name, "Fire extinguisher");
        assert_eq!(p.description.as_deref(), Some("6 kg ABC powder"));
        assert_eq!(p.price.cents(), 4999);
        assert_eq!(p.quantity, 12);
        assert_eq!(p.created_at, now);
        assert_eq!(p.updated_at, now);
    }

    #[test]
    fn create_rejects_bad_fields() {
        let cases: Vec<(ProductInput, &str)> = vec![
            (ProductInput { name: "  ".into(), ..input() }, "name required"),
            (ProductInput { name: "x".into(), ..input() }, "name must be between 2 and 100 characters"),
            (ProductInput { name: "x".repeat(101), ..input() }, "name must be between 2 and 100 characters"),
            (
                ProductInput { description: Some("d".repeat(501)), ..input() },
                "description must be at most 500 characters",
            ),
            (ProductInput { price: -0.01, ..input() }, "price must be >= 0"),
            (ProductInput { price: f64::NAN, ..input() }, "price must be a number"),
            (ProductInput { price: 100_000_000.0, ..input() }, "price must be <= 99999999.99"),
            (ProductInput { quantity: -1, ..input() }, "quantity must be >= 0"),
            (ProductInput { quantity: i64::from(i32::MAX) + 1, ..input() }, "quantity is too large"),
        ];
        for (bad, expected) in cases {
            let err = Product::create(bad, Utc::now()).unwrap_err();
            assert_eq!(err, DomainError::Validation(expected.into()));
        }
    }

    #[test]
    fn blank_description_becomes_none() {
        let p = Product::create(ProductInput { description: Some("   ".into()), ..input() }, Utc::now()).unwrap();
        assert_eq!(p.description, None);
    }

    #[test]
    fn zero_price_and_quantity_are_allowed() {
        let p = Product::create(ProductInput { price: 0.0, quantity: 0, ..input() }, Utc::now()).unwrap();
        assert_eq!(p.price.cents(), 0);
        assert_eq!(p.quantity, 0);
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let created = Utc::now();
        let mut p = Product::create(input(), created).unwrap();
        let later = created + chrono::Duration::seconds(5);

        p.apply_patch(ProductPatch { price: Some(59.5), ..Default::default() }, later).unwrap();
        assert_eq!(p.price.to_string(), "59.50");
        assert_eq!(p.name, "Fire extinguisher");
        assert_eq!(p.created_at, created);
        assert_eq!(p.updated_at, later);
    }

    #[test]
    fn patch_is_all_or_nothing() {
        let mut p = Product::create(input(), Utc::now()).unwrap();
        let before = p.clone();
        let err = p
            .apply_patch(
                ProductPatch {
                    name: Some("Smoke detector".into()),
                    quantity: Some(-3),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, DomainError::Validation("quantity must be >= 0".into()));
        assert_eq!(p, before);
    }

    #[test]
    fn patch_can_clear_description() {
        let mut p = Product::create(input(), Utc::now()).unwrap();
        p.apply_patch(ProductPatch { description: Some(String::new()), ..Default::default() }, Utc::now())
            .unwrap();
        assert_eq!(p.description, None);
    }

    #[test]
    fn price_display_and_rounding() {
        assert_eq!(Price::from_decimal(10.0).unwrap().to_string(), "10.00");
        assert_eq!(Price::from_decimal(0.125).unwrap().cents(), 13);
        assert_eq!(Price::from_decimal(99_999_999.99).unwrap().cents(), Price::MAX_CENTS);
        assert!(Price::from_cents(Price::MAX_CENTS + 1).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any in-range cent amount survives decimal conversion.
            #[test]
            fn decimal_roundtrip(cents in 0u64..=Price::MAX_CENTS) {
                let price = Price::from_cents(cents).unwrap();
                prop_assert_eq!(Price::from_decimal(price.as_decimal()).unwrap(), price);
            }

            /// Property: names within bounds are accepted and trimmed.
            #[test]
            fn valid_names_accepted(name in "[A-Za-z][A-Za-z0-9 ]{0,98}[A-Za-z0-9]") {
                let padded = format!("  {name} ");
                let p = Product::create(ProductInput { name: padded, ..input() }, Utc::now()).unwrap();
                prop_assert_eq!(p.name, name);
            }
        }
    }
}
