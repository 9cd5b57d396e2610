//! Product storage port and an in-memory implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use stockctl_core::ProductId;

use crate::product::{NewProduct, Price, Product, Quantity};

/// Result type returned by every store operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable CRUD over the single products table.
///
/// Implementations never let a lower-level failure escape as a panic: every
/// error comes back as a `StoreError`.
pub trait ProductStore: Send + Sync {
    /// Create the products table if it does not exist. Idempotent.
    fn initialize(&self) -> StoreResult<()>;

    /// Append a product and return the id assigned to it.
    fn insert(&self, product: &NewProduct) -> StoreResult<ProductId>;

    /// All products, in storage order.
    fn select_all(&self) -> StoreResult<Vec<Product>>;

    /// The product with `id`, if any.
    fn select_by_id(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Overwrite quantity and price of product `id`. Returns rows affected (0 or 1).
    fn update_quantity_and_price(
        &self,
        id: ProductId,
        quantity: Quantity,
        price: Price,
    ) -> StoreResult<u64>;

    /// Remove product `id`. Returns rows affected (0 or 1).
    fn delete_by_id(&self, id: ProductId) -> StoreResult<u64>;
}

/// Store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("a product named '{0}' already exists")]
    DuplicateName(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    last_id: i64,
}

/// In-memory product store for tests/dev.
///
/// Mirrors the SQLite store: ids start at 1 and are never reused, names are
/// unique by exact match, and listing follows id (insertion) order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    table: RwLock<Table>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::unavailable("in-memory product table lock poisoned")
    }
}

impl ProductStore for InMemoryProductStore {
    fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    fn insert(&self, product: &NewProduct) -> StoreResult<ProductId> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        if table.rows.values().any(|p| p.name() == product.name.as_str()) {
            return Err(StoreError::DuplicateName(product.name.to_string()));
        }
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::unavailable("product id space exhausted"))?;
        let id = ProductId::try_from(next).map_err(|e| StoreError::unavailable(e.to_string()))?;
        table.last_id = next;
        table.rows.insert(id, Product::from_new(id, product.clone()));
        Ok(id)
    }

    fn select_all(&self) -> StoreResult<Vec<Product>> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.values().cloned().collect())
    }

    fn select_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.get(&id).cloned())
    }

    fn update_quantity_and_price(
        &self,
        id: ProductId,
        quantity: Quantity,
        price: Price,
    ) -> StoreResult<u64> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        match table.rows.get_mut(&id) {
            Some(product) => {
                product.set_stock(quantity, price);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_by_id(&self, id: ProductId) -> StoreResult<u64> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}
