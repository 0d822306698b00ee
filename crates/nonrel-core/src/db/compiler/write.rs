use crate::{
    convert::ConvertMode,
    db::{
        compiler::{Compiler, CompilerState},
        driver::StorageDriver,
        features::pk_default_value,
        record::Record,
    },
    error::{Error, ErrorOrigin},
    obs::{ExecKind, Span},
    value::Value,
};
use std::collections::BTreeMap;

impl<D: StorageDriver> Compiler<'_, D> {
    /// Convert `values` (keyed by field name) and store them as a new record.
    ///
    /// Fields missing from `values` are stored at their default. With
    /// `return_key` the driver's key is decoded through the primary key's
    /// descriptor before it is returned.
    pub fn insert(
        &mut self,
        values: &BTreeMap<String, Value>,
        return_key: bool,
    ) -> Result<Option<Value>, Error> {
        self.check_query()?;
        let record = self.storage_record(values, true)?;

        self.state = CompilerState::Executed;
        let model = &self.query.model;
        let pk = model.primary_key();
        let mut span = Span::new(self.conn.sink(), ExecKind::Insert, &model.name);
        let key = self.conn.driver().insert(&model.table, &pk.column, record)?;
        span.set_rows(1);

        if !return_key {
            return Ok(None);
        }

        key.map(|key| self.conn.conversions().from_storage(&key, pk))
            .transpose()
    }

    /// Overwrite `values` on every record matching the query's filter.
    pub fn update(&mut self, values: &BTreeMap<String, Value>) -> Result<usize, Error> {
        let plan = self.build_plan()?;
        let record = self.storage_record(values, false)?;

        self.state = CompilerState::Executed;
        let model = &self.query.model;
        let mut span = Span::new(self.conn.sink(), ExecKind::Update, &model.name);
        let changed = self
            .conn
            .driver()
            .update(&model.table, &record, &plan.filters)?;
        span.set_rows(u64::try_from(changed).unwrap_or(u64::MAX));

        Ok(changed)
    }

    /// Delete every record matching the query's filter. Only the primary
    /// key is projected.
    pub fn delete(&mut self) -> Result<usize, Error> {
        let pk_name = self.query.model.primary_key().name.clone();
        self.query.select = Some(vec![pk_name]);
        let plan = self.build_plan()?;

        self.state = CompilerState::Executed;
        let model = &self.query.model;
        let mut span = Span::new(self.conn.sink(), ExecKind::Delete, &model.name);
        let removed = self.conn.driver().delete(&model.table, &plan.filters)?;
        span.set_rows(u64::try_from(removed).unwrap_or(u64::MAX));

        Ok(removed)
    }

    // Build the storage record for a write: NULL checks, per-field
    // conversion, then derived index columns. A complete record also
    // carries every field the caller left out, at its default.
    fn storage_record(
        &self,
        values: &BTreeMap<String, Value>,
        complete: bool,
    ) -> Result<Record, Error> {
        let model = &self.query.model;
        let conversions = self.conn.conversions();
        let mut record = Record::new();

        if let Some(name) = values.keys().find(|name| model.field(name).is_none()) {
            return Err(Error::validation(
                ErrorOrigin::Compiler,
                format!("unknown field '{name}' on {}", model.name),
            ));
        }

        for field in &model.fields {
            let default;
            let value = match values.get(&field.name) {
                Some(value) => value,
                None if complete => {
                    default = field.default_or_null();
                    &default
                }
                None => continue,
            };

            // An unset key is left out so the driver generates one.
            if field.primary_key && *value == pk_default_value() {
                continue;
            }
            if value.is_null() && !field.nullable {
                return Err(Error::integrity(
                    ErrorOrigin::Compiler,
                    format!("You can't set {} (a non-nullable field) to None!", field.name),
                ));
            }

            let stored = conversions.to_storage(value, field, ConvertMode::Store)?;
            record.insert(field.column.clone(), stored);
        }

        self.conn.indexes().augment(model, &mut record);

        Ok(record)
    }
}
