use crate::{
    convert::Conversions,
    db::{driver::RecordIter, record::Record},
    error::{Error, ErrorOrigin},
    model::FieldModel,
    obs::{MetricsEvent, MetricsSink, Span},
    value::Value,
};

///
/// Rows
///
/// Lazy sequence of decoded result rows in projection order.
/// Each pull may call into the driver. The first error ends the sequence.
///

pub struct Rows<'c> {
    records: RecordIter<'c>,
    fields: Vec<FieldModel>,
    conversions: &'c Conversions,
    sink: &'c dyn MetricsSink,
    entity: String,
    span: Span<'c>,
    scanned: u64,
    done: bool,
}

impl<'c> Rows<'c> {
    pub(super) fn new(
        records: RecordIter<'c>,
        fields: Vec<FieldModel>,
        conversions: &'c Conversions,
        sink: &'c dyn MetricsSink,
        entity: &str,
        span: Span<'c>,
    ) -> Self {
        Self {
            records,
            fields,
            conversions,
            sink,
            entity: entity.to_string(),
            span,
            scanned: 0,
            done: false,
        }
    }

    /// Projected fields, in the order every row's values follow.
    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Vec<Value>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(next) = self.records.next() else {
            self.done = true;
            return None;
        };
        self.scanned = self.scanned.saturating_add(1);

        let row = next.and_then(|record| make_result(&record, &self.fields, self.conversions));
        match &row {
            Ok(_) => self.span.add_row(),
            Err(_) => self.done = true,
        }

        Some(row)
    }
}

impl Drop for Rows<'_> {
    fn drop(&mut self) {
        self.sink.record(MetricsEvent::RowsScanned {
            entity: &self.entity,
            rows: self.scanned,
        });
    }
}

/// Decode one stored record into projected values.
///
/// A missing column falls back to the field default. A NULL left on a
/// non-nullable field is an integrity fault.
pub(super) fn make_result(
    record: &Record,
    fields: &[FieldModel],
    conversions: &Conversions,
) -> Result<Vec<Value>, Error> {
    fields
        .iter()
        .map(|field| {
            let value = match record.get(&field.column) {
                Some(value) => value.clone(),
                None => field.default_or_null(),
            };

            if value.is_null() && !field.nullable {
                return Err(Error::integrity(
                    ErrorOrigin::Compiler,
                    format!("Non-nullable field {} can't be None!", field.name),
                ));
            }

            conversions.from_storage(&value, field)
        })
        .collect()
}
