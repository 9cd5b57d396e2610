//! Product service: validation in front of the store, plus outcome shaping.

use thiserror::Error;
use tracing::{debug, instrument};

use stockctl_core::{DomainError, ProductId};

use crate::product::{NewProduct, Price, Product, Quantity};
use crate::store::{ProductStore, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome vocabulary exposed to the terminal layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input broke a domain rule. The store was not called.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted product does not exist.
    #[error("product not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::NotFound => ServiceError::NotFound,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName(_) => DomainError::conflict("name already exists").into(),
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
        }
    }
}

/// Stateless orchestration over a `ProductStore`.
///
/// Validation always runs first; a rejected input never reaches the store.
#[derive(Debug, Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S: ProductStore> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the backing table if needed. Safe on every startup.
    pub fn initialize(&self) -> ServiceResult<()> {
        self.store.initialize()?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    pub fn create_product(&self, name: &str, quantity: i128, price: f64) -> ServiceResult<ProductId> {
        let product = NewProduct::validate(name, quantity, price)?;
        let id = self.store.insert(&product)?;
        debug!(%id, name = product.name.as_str(), "product created");
        Ok(id)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.store.select_all()?)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn get_product(&self, id: i128) -> ServiceResult<Product> {
        let id = ProductId::try_from_raw(id)?;
        self.store.select_by_id(id)?.ok_or_else(|| DomainError::not_found().into())
    }

    #[instrument(skip(self), level = "debug")]
    pub fn update_product(&self, id: i128, quantity: i128, price: f64) -> ServiceResult<()> {
        let id = ProductId::try_from_raw(id)?;
        let quantity = Quantity::try_from_raw(quantity)?;
        let price = Price::new(price)?;

        let affected = self.store.update_quantity_and_price(id, quantity, price)?;
        if affected == 0 {
            return Err(DomainError::not_found().into());
        }
        debug!(%id, "product updated");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    pub fn delete_product(&self, id: i128) -> ServiceResult<()> {
        let id = ProductId::try_from_raw(id)?;

        let affected = self.store.delete_by_id(id)?;
        if affected == 0 {
            return Err(DomainError::not_found().into());
        }
        debug!(%id, "product deleted");
        Ok(())
    }
}
