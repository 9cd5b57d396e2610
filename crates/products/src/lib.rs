//! Products domain module.
//!
//! This crate contains the product entity, its validation rules, the storage
//! port (`ProductStore`) and the service that orchestrates them. It performs
//! no IO itself; persistence lives behind the `ProductStore` trait.

pub mod product;
pub mod service;
pub mod store;

pub use product::{NewProduct, Price, Product, ProductName, Quantity};
pub use service::{ProductService, ServiceError, ServiceResult};
pub use store::{InMemoryProductStore, ProductStore, StoreError, StoreResult};
pub use stockctl_core::ProductId;
