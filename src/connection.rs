//! Connection handle.
//!
//! A connection pairs the driver configuration with the schema provider that
//! answers catalog requests. Statements borrow the connection, so any number
//! of them may run side by side, each with its own cursor.

use crate::catalog::attributes::Limits;
use crate::catalog::schema::SchemaProvider;
use crate::config::DriverConfig;
use crate::error::Result;
use crate::logging;
use crate::statement::Statement;

/// A connection to a cache cluster.
#[derive(Debug)]
pub struct Connection<P: SchemaProvider> {
    config: DriverConfig,
    /// Attribute limits derived from `config`.
    limits: Limits,
    provider: P,
}

impl<P: SchemaProvider> Connection<P> {
    /// Connect with an ODBC connection string.
    ///
    /// # Arguments
    ///
    /// * `conn_str` - e.g. `DRIVER={Apache Ignite};ADDRESS=127.0.0.1:11110;SCHEMA=cache`
    /// * `provider` - Source of table and column descriptors
    ///
    /// # Example
    ///
    /// ```
    /// use ignite_odbc_rs::{Connection, MemorySchemaProvider};
    ///
    /// let conn = Connection::connect(
    ///     "DRIVER={Apache Ignite};ADDRESS=127.0.0.1:11110;SCHEMA=cache",
    ///     MemorySchemaProvider::new(),
    /// )?;
    /// assert_eq!(conn.config().schema, "cache");
    /// # Ok::<(), ignite_odbc_rs::Error>(())
    /// ```
    pub fn connect(conn_str: &str, provider: P) -> Result<Self> {
        let config = DriverConfig::parse(conn_str)?;
        Ok(Self::with_config(config, provider))
    }

    /// Connect with an already built configuration.
    pub fn with_config(config: DriverConfig, provider: P) -> Self {
        logging::init_logging(&config.log);
        tracing::debug!(
            address = %config.address(),
            schema = %config.schema,
            "connection opened"
        );
        Self {
            limits: config.limits(),
            config,
            provider,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Allocate a statement.
    pub fn statement(&self) -> Statement<'_, P> {
        Statement::new(self)
    }

    /// Close the connection, returning the provider.
    pub fn close(self) -> P {
        tracing::debug!(address = %self.config.address(), "connection closed");
        self.provider
    }
}
