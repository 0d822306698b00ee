use crate::{
    config::ToolboxConfig,
    convert::{Conversions, KeyCodec},
    db::{
        compiler::Compiler, cursor::RawCursor, driver::StorageDriver, features::Features,
        index::IndexRegistry, query::Query,
    },
    error::Error,
    model::EmbeddedRegistry,
    obs::{MetricsSink, NoopMetricsSink},
};
use std::sync::Arc;

///
/// Connection
///
/// Everything a compiler needs for one backend: the driver, value
/// conversions, the index proxy and the metrics sink. Built once at startup
/// and shared by reference; compilers borrow it per query.
///

pub struct Connection<D: StorageDriver> {
    driver: D,
    conversions: Conversions,
    config: ToolboxConfig,
    indexes: IndexRegistry,
    features: Features,
    sink: Arc<dyn MetricsSink>,
}

impl<D: StorageDriver> Connection<D> {
    /// Validate `config` and wire the connection around `driver`.
    pub fn new(driver: D, config: ToolboxConfig) -> Result<Self, Error> {
        config.validate()?;
        let indexes = IndexRegistry::from_config(&config)?;

        Ok(Self {
            driver,
            conversions: Conversions::new(config.storage),
            config,
            indexes,
            features: Features::default(),
            sink: Arc::new(NoopMetricsSink),
        })
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_key_codec(mut self, codec: Arc<dyn KeyCodec>) -> Self {
        self.conversions = self.conversions.with_key_codec(codec);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: EmbeddedRegistry) -> Self {
        self.conversions = self.conversions.with_registry(registry);
        self
    }

    #[must_use]
    pub fn with_indexes(mut self, indexes: IndexRegistry) -> Self {
        self.indexes = indexes;
        self
    }

    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    #[must_use]
    pub const fn conversions(&self) -> &Conversions {
        &self.conversions
    }

    #[must_use]
    pub const fn config(&self) -> &ToolboxConfig {
        &self.config
    }

    #[must_use]
    pub const fn indexes(&self) -> &IndexRegistry {
        &self.indexes
    }

    #[must_use]
    pub const fn features(&self) -> &Features {
        &self.features
    }

    #[must_use]
    pub fn sink(&self) -> &dyn MetricsSink {
        self.sink.as_ref()
    }

    /// Fresh compiler for one logical query.
    #[must_use]
    pub const fn compiler(&self, query: Query) -> Compiler<'_, D> {
        Compiler::new(self, query)
    }

    #[must_use]
    #[expect(clippy::unused_self)]
    pub const fn cursor(&self) -> RawCursor {
        RawCursor
    }

    /// Transactions are not supported; commit is accepted and does nothing.
    #[expect(clippy::unused_self)]
    pub const fn commit(&self) {}

    #[expect(clippy::unused_self)]
    pub const fn rollback(&self) {}
}

impl<D: StorageDriver + std::fmt::Debug> std::fmt::Debug for Connection<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("driver", &self.driver)
            .field("config", &self.config)
            .field("indexes", &self.indexes)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Repr, StorageConfig},
        db::{driver::MemoryDriver, predicate::Lookup},
        error::ErrorClass,
    };

    #[test]
    fn new_wires_indexes_from_config() {
        let config = ToolboxConfig::from_toml(
            r#"
            [indexes.Person]
            name = "iexact"
            "#,
        )
        .expect("config");
        let conn = Connection::new(MemoryDriver::new(), config).expect("connection");

        assert!(conn.indexes().is_indexed("Person", "name", Lookup::IExact));
        assert!(!conn.features().supports_transactions);
    }

    #[test]
    fn invalid_storage_config_is_rejected() {
        let config = ToolboxConfig {
            storage: StorageConfig {
                list: Repr::Dict,
                ..StorageConfig::default()
            },
            ..ToolboxConfig::default()
        };

        let err = Connection::new(MemoryDriver::new(), config).expect_err("dict list");
        assert_eq!(err.class, ErrorClass::Validation);
    }

    #[test]
    fn cursor_is_refused() {
        let conn =
            Connection::new(MemoryDriver::new(), ToolboxConfig::default()).expect("connection");

        assert!(conn.cursor().fetch_all().is_err());
    }
}
