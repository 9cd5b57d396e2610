use stockctl_core::{DomainError, DomainResult, Entity, ProductId, ValueObject};

/// Product name: must contain something other than whitespace.
///
/// The text is kept exactly as entered; trimming only decides emptiness.
/// Uniqueness is exact and case-sensitive, and is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductName(String);

impl ProductName {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("empty name"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ProductName {}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stock quantity, within `[0, i64::MAX]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i64);

impl Quantity {
    pub const MAX: i64 = i64::MAX;

    /// Validate a raw integer (as typed by a user) into a quantity.
    pub fn try_from_raw(raw: i128) -> DomainResult<Self> {
        if (0..=i128::from(Self::MAX)).contains(&raw) {
            Ok(Self(raw as i64))
        } else {
            Err(DomainError::validation("quantity out of range"))
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from_raw(i128::from(value))
    }
}

/// Unit price. Finite and never negative.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation("negative price"));
        }
        // -0.0 is normalized so every store reads back the same zero.
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl ValueObject for Price {}

/// A validated product that has not been persisted yet (no id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub quantity: Quantity,
    pub price: Price,
}

impl NewProduct {
    /// Validate raw user input. Checks run in order: name, quantity, price.
    pub fn validate(name: &str, quantity: i128, price: f64) -> DomainResult<Self> {
        Ok(Self {
            name: ProductName::parse(name)?,
            quantity: Quantity::try_from_raw(quantity)?,
            price: Price::new(price)?,
        })
    }
}

/// Entity: Product.
///
/// `id` and `name` are fixed once the product exists; only quantity and price
/// change, and only through the store's update operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    quantity: Quantity,
    price: Price,
}

impl Product {
    pub fn new(id: ProductId, name: ProductName, quantity: Quantity, price: Price) -> Self {
        Self {
            id,
            name,
            quantity,
            price,
        }
    }

    /// Attach a store-assigned id to a validated new product.
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self::new(id, new.name, new.quantity, new.price)
    }

    /// Rebuild a product from raw stored columns, re-checking every invariant.
    pub fn restore(id: i64, name: &str, quantity: i64, price: f64) -> DomainResult<Self> {
        Ok(Self {
            id: ProductId::try_from(id)?,
            name: ProductName::parse(name)?,
            quantity: Quantity::try_from(quantity)?,
            price: Price::new(price)?,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity.get()
    }

    pub fn price(&self) -> f64 {
        self.price.get()
    }

    pub(crate) fn set_stock(&mut self, quantity: Quantity, price: Price) {
        self.quantity = quantity;
        self.price = price;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keeps_surrounding_whitespace() {
        let name = ProductName::parse("  Widget \t").unwrap();
        assert_eq!(name.as_str(), "  Widget \t");
        assert_ne!(name, ProductName::parse("Widget").unwrap());
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        for raw in ["", "   ", "\t\n"] {
            assert_eq!(
                ProductName::parse(raw).unwrap_err(),
                DomainError::validation("empty name")
            );
        }
    }

    #[test]
    fn quantity_bounds() {
        assert_eq!(Quantity::try_from_raw(0).unwrap().get(), 0);
        assert_eq!(
            Quantity::try_from_raw(i128::from(i64::MAX)).unwrap().get(),
            i64::MAX
        );
        assert_eq!(
            Quantity::try_from_raw(-1).unwrap_err(),
            DomainError::validation("quantity out of range")
        );
        assert_eq!(
            Quantity::try_from_raw(i128::from(i64::MAX) + 1).unwrap_err(),
            DomainError::validation("quantity out of range")
        );
    }

    #[test]
    fn price_bounds() {
        assert_eq!(Price::new(0.0).unwrap().get(), 0.0);
        assert_eq!(Price::new(9.99).unwrap().get(), 9.99);
        assert_eq!(
            Price::new(-0.01).unwrap_err(),
            DomainError::validation("negative price")
        );
        let not_finite = DomainError::validation("price must be a finite number");
        assert_eq!(Price::new(f64::NAN).unwrap_err(), not_finite);
        assert_eq!(Price::new(f64::INFINITY).unwrap_err(), not_finite);
        assert_eq!(Price::new(f64::NEG_INFINITY).unwrap_err(), not_finite);
    }

    #[test]
    fn negative_zero_price_becomes_zero() {
        let price = Price::new(-0.0).unwrap().get();
        assert_eq!(price, 0.0);
        assert!(price.is_sign_positive());
        assert_eq!(format!("{price:.2}"), "0.00");
    }

    #[test]
    fn validate_reports_first_failing_rule() {
        let err = NewProduct::validate("  ", -1, -1.0).unwrap_err();
        assert_eq!(err, DomainError::validation("empty name"));

        let err = NewProduct::validate("Widget", -1, -1.0).unwrap_err();
        assert_eq!(err, DomainError::validation("quantity out of range"));

        let err = NewProduct::validate("Widget", 1, -1.0).unwrap_err();
        assert_eq!(err, DomainError::validation("negative price"));
    }

    #[test]
    fn restore_rejects_corrupt_rows() {
        assert!(Product::restore(1, "Widget", 10, 9.99).is_ok());
        assert!(Product::restore(1, "", 10, 9.99).is_err());
        assert!(Product::restore(1, "Widget", -3, 9.99).is_err());
        assert!(Product::restore(-1, "Widget", 3, 9.99).is_err());
    }

    #[test]
    fn identity_is_the_store_assigned_id() {
        let id = ProductId::try_from(3_i64).unwrap();
        let new = NewProduct::validate(" Widget ", 1, 1.0).unwrap();
        let product = Product::from_new(id, new);

        assert_eq!(Entity::id(&product), id);
        assert_eq!(product.name(), " Widget ");
    }

    #[test]
    fn stored_quantity_is_revalidated() {
        assert!(Quantity::try_from(-1_i64).is_err());
        assert_eq!(Quantity::try_from(7_i64).unwrap().get(), 7);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any negative quantity is rejected, any non-negative i64 accepted.
            #[test]
            fn quantity_sign_decides_validity(raw in any::<i64>()) {
                let result = Quantity::try_from_raw(i128::from(raw));
                prop_assert_eq!(result.is_ok(), raw >= 0);
            }

            /// Property: any negative finite price is rejected.
            #[test]
            fn negative_prices_rejected(raw in -1.0e12f64..-1.0e-9f64) {
                prop_assert_eq!(
                    Price::new(raw).unwrap_err(),
                    DomainError::validation("negative price")
                );
            }

            /// Property: parsing keeps the text and is idempotent.
            #[test]
            fn name_parse_is_idempotent(raw in "[ \t]{0,3}[A-Za-z0-9][A-Za-z0-9 ]{0,30}[ \t]{0,3}") {
                let once = ProductName::parse(&raw).unwrap();
                let twice = ProductName::parse(once.as_str()).unwrap();
                prop_assert_eq!(once.as_str(), raw.as_str());
                prop_assert_eq!(once, twice);
            }
        }
    }
}
