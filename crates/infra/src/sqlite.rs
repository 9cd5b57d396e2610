//! SQLite-backed product store.
//!
//! Every operation opens its own connection, runs inside a transaction
//! (commit on success, rollback on error) and closes the connection before
//! returning. Nothing is held between calls, so another process may use the
//! same file in between.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row, Sqlite, Transaction};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use stockctl_core::ProductId;
use stockctl_products::{NewProduct, Price, Product, ProductStore, Quantity, StoreError, StoreResult};

/// DDL for the single products table.
pub const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        name      TEXT NOT NULL UNIQUE,
        quantity  INTEGER NOT NULL,
        price     REAL NOT NULL
    )
"#;

type TxFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, sqlx::Error>> + Send + 'c>>;

/// Raw column values of one `products` row.
type RawRow = (i64, String, i64, f64);

/// SQLite-backed `ProductStore`.
///
/// The API is synchronous: a private current-thread runtime drives sqlx, and
/// each call blocks until its statement has committed or rolled back. Do not
/// call it from inside another tokio runtime.
#[derive(Debug)]
pub struct SqliteProductStore {
    path: PathBuf,
    options: SqliteConnectOptions,
    runtime: Runtime,
}

impl SqliteProductStore {
    /// Prepare a store for the database file at `path`.
    ///
    /// No connection is made here; the file is created on first use.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::unavailable(format!("failed to start store runtime: {e}")))?;
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        Ok(Self {
            path,
            options,
            runtime,
        })
    }

    /// How long a statement waits on a lock held by another connection
    /// before failing. sqlx defaults to five seconds.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.busy_timeout(timeout);
        self
    }

    /// Run `work` in a fresh connection + transaction, then close the connection.
    fn run<T, F>(&self, work: F) -> Result<T, sqlx::Error>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut Transaction<'_, Sqlite>) -> TxFuture<'c, T> + Send + Sync,
    {
        self.runtime.block_on(async {
            let mut conn = SqliteConnection::connect_with(&self.options).await?;
            let outcome = conn.transaction(work).await;
            let closed = conn.close().await;
            let value = outcome?;
            closed?;
            Ok::<_, sqlx::Error>(value)
        })
    }

    fn unavailable(&self, operation: &'static str, err: sqlx::Error) -> StoreError {
        warn!(operation, path = %self.path.display(), error = %err, "sqlite operation failed");
        StoreError::unavailable(format!("{operation} failed: {err}"))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn read_row(row: &sqlx::sqlite::SqliteRow) -> Result<RawRow, sqlx::Error> {
    Ok((
        row.try_get("id")?,
        row.try_get("name")?,
        row.try_get("quantity")?,
        row.try_get("price")?,
    ))
}

fn restore((id, name, quantity, price): RawRow) -> StoreResult<Product> {
    Product::restore(id, &name, quantity, price).map_err(|e| {
        warn!(id, error = %e, "stored product row violates invariants");
        StoreError::unavailable(format!("product row {id} is invalid: {e}"))
    })
}

impl ProductStore for SqliteProductStore {
    fn initialize(&self) -> StoreResult<()> {
        self.run(|tx| {
            Box::pin(async move {
                sqlx::query(CREATE_PRODUCTS_TABLE).execute(&mut **tx).await?;
                Ok::<_, sqlx::Error>(())
            })
        })
        .map_err(|e| self.unavailable("initialize", e))?;
        debug!(path = %self.path.display(), "products table ready");
        Ok(())
    }

    fn insert(&self, product: &NewProduct) -> StoreResult<ProductId> {
        let name = product.name.as_str().to_string();
        let quantity = product.quantity.get();
        let price = product.price.get();

        let bound_name = name.clone();
        let rowid = self
            .run(move |tx| {
                Box::pin(async move {
                    let result = sqlx::query(
                        r#"
                        INSERT INTO products (name, quantity, price)
                        VALUES (?1, ?2, ?3)
                        "#,
                    )
                    .bind(bound_name)
                    .bind(quantity)
                    .bind(price)
                    .execute(&mut **tx)
                    .await?;
                    Ok::<_, sqlx::Error>(result.last_insert_rowid())
                })
            })
            .map_err(|e| {
                if is_unique_violation(&e) {
                    debug!(name = %name, "duplicate product name");
                    StoreError::DuplicateName(name.clone())
                } else {
                    self.unavailable("insert", e)
                }
            })?;

        let id = ProductId::try_from(rowid)
            .map_err(|e| StoreError::unavailable(format!("sqlite returned rowid {rowid}: {e}")))?;
        debug!(%id, name = %name, "product inserted");
        Ok(id)
    }

    fn select_all(&self) -> StoreResult<Vec<Product>> {
        let rows = self
            .run(|tx| {
                Box::pin(async move {
                    let rows = sqlx::query(
                        r#"
                        SELECT id, name, quantity, price
                        FROM products
                        ORDER BY id
                        "#,
                    )
                    .fetch_all(&mut **tx)
                    .await?;
                    rows.iter().map(read_row).collect::<Result<Vec<_>, sqlx::Error>>()
                })
            })
            .map_err(|e| self.unavailable("select_all", e))?;

        rows.into_iter().map(restore).collect()
    }

    fn select_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let key = id.as_i64();
        let row = self
            .run(move |tx| {
                Box::pin(async move {
                    let row = sqlx::query(
                        r#"
                        SELECT id, name, quantity, price
                        FROM products
                        WHERE id = ?1
                        "#,
                    )
                    .bind(key)
                    .fetch_optional(&mut **tx)
                    .await?;
                    row.as_ref().map(read_row).transpose()
                })
            })
            .map_err(|e| self.unavailable("select_by_id", e))?;

        row.map(restore).transpose()
    }

    fn update_quantity_and_price(
        &self,
        id: ProductId,
        quantity: Quantity,
        price: Price,
    ) -> StoreResult<u64> {
        let key = id.as_i64();
        let quantity = quantity.get();
        let price = price.get();

        let affected = self
            .run(move |tx| {
                Box::pin(async move {
                    let result = sqlx::query(
                        r#"
                        UPDATE products
                        SET quantity = ?1, price = ?2
                        WHERE id = ?3
                        "#,
                    )
                    .bind(quantity)
                    .bind(price)
                    .bind(key)
                    .execute(&mut **tx)
                    .await?;
                    Ok::<_, sqlx::Error>(result.rows_affected())
                })
            })
            .map_err(|e| self.unavailable("update_quantity_and_price", e))?;

        debug!(%id, affected, "product stock updated");
        Ok(affected)
    }

    fn delete_by_id(&self, id: ProductId) -> StoreResult<u64> {
        let key = id.as_i64();
        let affected = self
            .run(move |tx| {
                Box::pin(async move {
                    let result = sqlx::query("DELETE FROM products WHERE id = ?1")
                        .bind(key)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<_, sqlx::Error>(result.rows_affected())
                })
            })
            .map_err(|e| self.unavailable("delete_by_id", e))?;

        debug!(%id, affected, "product delete executed");
        Ok(affected)
    }
}
