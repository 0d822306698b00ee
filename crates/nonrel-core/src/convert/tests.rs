use crate::{
    config::{Repr, StorageConfig},
    convert::{ConvertMode, Conversions, KeyCodec, MODEL_COLUMN, MODULE_COLUMN},
    db::predicate::Lookup,
    error::{Error, ErrorClass, ErrorOrigin},
    model::{EntityModel, FieldModel, StorageKind},
    test_support::{address, conversions, field, person, pet},
    value::{EmbeddedValue, Value},
};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::sync::Arc;

fn store(conv: &Conversions, value: &Value, field: &FieldModel) -> Value {
    conv.to_storage(value, field, ConvertMode::Store)
        .expect("store conversion")
}

fn round_trip(conv: &Conversions, value: &Value, field: &FieldModel) -> Value {
    let stored = store(conv, value, field);
    conv.from_storage(&stored, field).expect("load conversion")
}

fn storage_with(list: Repr, set: Repr, dict: Repr, embedded: Repr) -> StorageConfig {
    StorageConfig {
        list,
        set,
        dict,
        embedded,
    }
}

fn address_value(street: &str, zip: i64) -> Value {
    Value::Embedded(EmbeddedValue::tagged(
        "app.Address",
        [("street", Value::from(street)), ("zip", Value::Int(zip))],
    ))
}

///
/// Uppercases text keys on the way in.
///

#[derive(Debug)]
struct UpperKeys;

impl KeyCodec for UpperKeys {
    fn encode(&self, value: &Value, _field: &FieldModel) -> Result<Value, Error> {
        match value {
            Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
            other => Err(Error::storage(
                ErrorOrigin::Convert,
                format!("cannot encode {}", other.type_label()),
            )),
        }
    }

    fn decode(&self, value: &Value, _field: &FieldModel) -> Result<Value, Error> {
        match value {
            Value::Text(s) => Ok(Value::Text(s.to_lowercase())),
            other => Ok(other.clone()),
        }
    }
}

#[test]
fn scalars_are_stored_as_is() {
    let conv = Conversions::default();
    let model = person();
    let day = NaiveDate::from_ymd_opt(2011, 7, 1).expect("date");

    assert_eq!(
        store(&conv, &Value::from("Kakashi"), &field(&model, "name")),
        Value::from("Kakashi")
    );
    assert_eq!(
        store(&conv, &Value::Date(day), &field(&model, "birthday")),
        Value::Date(day)
    );
}

#[test]
fn null_is_identity_for_every_kind() {
    let conv = conversions(StorageConfig::binary());
    let model = person();

    for f in &model.fields {
        assert_eq!(store(&conv, &Value::Null, f), Value::Null, "{}", f.name);
        assert_eq!(conv.from_storage(&Value::Null, f).expect("load"), Value::Null);
    }
}

#[test]
fn list_round_trips_in_every_representation() {
    let names = field(&person(), "names");
    let value = Value::from_list(["a", "b", "c"]);

    for repr in [Repr::List, Repr::Bytes, Repr::String] {
        let conv = Conversions::new(storage_with(repr, Repr::Set, Repr::Dict, Repr::Dict));
        assert_eq!(round_trip(&conv, &value, &names), value, "{repr}");
    }
}

#[test]
fn serialized_lists_are_single_blobs() {
    let names = field(&person(), "names");
    let value = Value::from_list(["a", "b"]);

    let binary = Conversions::new(StorageConfig::binary());
    assert!(matches!(store(&binary, &value, &names), Value::Bytes(_)));

    let textual = Conversions::new(StorageConfig::textual());
    let Value::Text(text) = store(&textual, &value, &names) else {
        panic!("textual repr must store text");
    };
    assert!(text.starts_with("{\"v\":1,"));
}

#[test]
fn set_is_canonicalized_on_store() {
    let conv = Conversions::default();
    let tags = field(&person(), "tags");
    let value = Value::List(vec![
        Value::from("b"),
        Value::from("a"),
        Value::from("b"),
    ]);

    assert_eq!(
        store(&conv, &value, &tags),
        Value::Set(vec![Value::from("a"), Value::from("b")])
    );
    assert_eq!(round_trip(&conv, &value, &tags), Value::from_set(["a", "b"]));
}

#[test]
fn set_stored_as_list_restores_a_set() {
    let conv = Conversions::new(StorageConfig::flat());
    let tags = field(&person(), "tags");
    let value = Value::from_set(["x", "y"]);

    assert!(matches!(store(&conv, &value, &tags), Value::List(_)));
    assert_eq!(round_trip(&conv, &value, &tags), value);
}

#[test]
fn dict_round_trips_in_every_representation() {
    let scores = field(&person(), "scores");
    let value = Value::from_map([("a", 1), ("b", 2)]);

    for repr in [Repr::Dict, Repr::List, Repr::Bytes, Repr::String] {
        let conv = Conversions::new(storage_with(Repr::List, Repr::Set, repr, Repr::Dict));
        assert_eq!(round_trip(&conv, &value, &scores), value, "{repr}");
    }
}

#[test]
fn dict_in_list_representation_is_interleaved() {
    let conv = Conversions::new(StorageConfig::flat());
    let scores = field(&person(), "scores");
    let value = Value::from_map([("a", 1), ("b", 2)]);

    assert_eq!(
        store(&conv, &value, &scores),
        Value::List(vec![
            Value::from("a"),
            Value::Int(1),
            Value::from("b"),
            Value::Int(2),
        ])
    );
}

#[test]
fn odd_interleaved_mapping_is_a_storage_error() {
    let conv = Conversions::new(StorageConfig::flat());
    let scores = field(&person(), "scores");
    let broken = Value::List(vec![Value::from("a"), Value::Int(1), Value::from("b")]);

    let err = conv.from_storage(&broken, &scores).expect_err("odd length");
    assert_eq!(err.class, ErrorClass::Storage);
    assert!(err.message.contains("odd length"));
}

#[test]
fn malformed_collection_values_are_validation_errors() {
    let conv = Conversions::default();
    let model = person();

    let err = conv
        .to_storage(&Value::Int(5), &field(&model, "names"), ConvertMode::Store)
        .expect_err("int is not iterable");
    assert_eq!(err.class, ErrorClass::Validation);
    assert!(err.message.contains("is not iterable"));

    let err = conv
        .to_storage(
            &Value::from_list([1]),
            &field(&model, "scores"),
            ConvertMode::Store,
        )
        .expect_err("list is not a mapping");
    assert_eq!(err.class, ErrorClass::Validation);
    assert!(err.message.contains("Wrong type for dict field"));
}

#[test]
fn foreign_keys_convert_with_the_referenced_key() {
    let conv = Conversions::default();
    let owner = field(&pet(), "owner");

    assert_eq!(store(&conv, &Value::Int(7), &owner), Value::Int(7));
}

#[test]
fn key_kind_without_codec_is_a_storage_error() {
    let conv = Conversions::default();
    let key = FieldModel::new("ref", StorageKind::Key);

    let err = conv
        .to_storage(&Value::from("abc"), &key, ConvertMode::Store)
        .expect_err("no codec");
    assert_eq!(err.class, ErrorClass::Storage);
    assert!(err.message.contains("unsupported key type"));
}

#[test]
fn key_codec_encodes_and_decodes() {
    let conv = Conversions::default().with_key_codec(Arc::new(UpperKeys));
    let key = FieldModel::new("ref", StorageKind::Key);

    assert_eq!(store(&conv, &Value::from("abc"), &key), Value::from("ABC"));
    assert_eq!(round_trip(&conv, &Value::from("abc"), &key), Value::from("abc"));
}

#[test]
fn collection_primary_keys_are_rejected() {
    let conv = Conversions::default();
    let pk = FieldModel::list("ids", FieldModel::new("id", StorageKind::Integer)).primary_key();

    let err = conv
        .to_storage(&Value::from_list([1]), &pk, ConvertMode::Store)
        .expect_err("list key");
    assert_eq!(err.message, "list may not be used as primary key field.");
}

#[test]
fn typed_embedded_round_trips_by_column() {
    let conv = Conversions::default();
    let home = FieldModel::embedded("home", address());
    let value = address_value("Main St", 1234);

    let Value::Map(columns) = store(&conv, &value, &home) else {
        panic!("dict repr stores a map");
    };
    assert_eq!(columns.get("zip_code"), Some(&Value::Int(1234)));
    assert!(!columns.contains_key(MODULE_COLUMN));

    assert_eq!(round_trip(&conv, &value, &home), value);

    let Value::Embedded(tagged) = value else {
        panic!("fixture is embedded");
    };
    let untagged = Value::Embedded(EmbeddedValue::new(None, tagged.fields));
    let err = conv
        .to_storage(&untagged, &home, ConvertMode::Store)
        .expect_err("untagged instance");
    assert_eq!(err.class, ErrorClass::Validation);
    assert_eq!(
        err.message,
        "Expected instance of type app.Address, not an untagged instance (field home)"
    );
}

#[test]
fn typed_embedded_rejects_foreign_instances() {
    let conv = Conversions::default();
    let home = FieldModel::embedded("home", address());
    let wrong = Value::Embedded(EmbeddedValue::tagged("app.Person", [("name", "x")]));

    let err = conv
        .to_storage(&wrong, &home, ConvertMode::Store)
        .expect_err("wrong type");
    assert_eq!(err.class, ErrorClass::Validation);
    assert!(err.message.contains("Expected instance of type app.Address"));
}

#[test]
fn untyped_embedded_records_its_type() {
    let any = FieldModel::embedded_untyped("anything");
    let value = address_value("Elm St", 99);

    for storage in [
        StorageConfig::default(),
        StorageConfig::flat(),
        StorageConfig::binary(),
        StorageConfig::textual(),
    ] {
        let conv = conversions(storage);
        assert_eq!(round_trip(&conv, &value, &any), value);
    }

    let Value::Map(columns) = store(&conversions(StorageConfig::default()), &value, &any) else {
        panic!("dict repr stores a map");
    };
    assert_eq!(columns.get(MODULE_COLUMN), Some(&Value::from("app")));
    assert_eq!(columns.get(MODEL_COLUMN), Some(&Value::from("Address")));
}

#[test]
fn untyped_embedded_needs_a_registered_type() {
    let conv = conversions(StorageConfig::default());
    let any = FieldModel::embedded_untyped("anything");
    let stranger = Value::Embedded(EmbeddedValue::tagged("app.Stranger", [("a", 1)]));

    let err = conv
        .to_storage(&stranger, &any, ConvertMode::Store)
        .expect_err("unregistered");
    assert_eq!(err.class, ErrorClass::Storage);
    assert!(err.message.contains("unregistered embedded type 'app.Stranger'"));
}

#[test]
fn embedded_key_is_skipped_when_unset() {
    let conv = Conversions::default();
    let model = Arc::new(EntityModel::new(
        "app",
        "Note",
        [FieldModel::new("text", StorageKind::String)],
    ));
    let note = FieldModel::embedded("note", Arc::clone(&model));
    let value = Value::Embedded(EmbeddedValue::tagged("app.Note", [("text", "hi")]));

    let Value::Map(columns) = store(&conv, &value, &note) else {
        panic!("dict repr stores a map");
    };
    assert!(!columns.contains_key("id"));
    assert_eq!(round_trip(&conv, &value, &note), value);
}

#[test]
fn lookup_mode_passes_null_checks_and_date_parts() {
    let conv = Conversions::new(StorageConfig::binary());
    let model = person();

    let isnull = conv
        .to_storage(
            &Value::Bool(true),
            &field(&model, "names"),
            ConvertMode::Lookup(Lookup::IsNull),
        )
        .expect("isnull");
    assert_eq!(isnull, Value::Bool(true));

    let month = conv
        .to_storage(
            &Value::Int(7),
            &field(&model, "birthday"),
            ConvertMode::Lookup(Lookup::Month),
        )
        .expect("month");
    assert_eq!(month, Value::Int(7));
}

#[test]
fn lookup_on_collection_converts_one_element() {
    let conv = Conversions::default();
    let names = field(&person(), "names");

    let arg = conv
        .to_storage(
            &Value::from("Sasuke"),
            &names,
            ConvertMode::Lookup(Lookup::Exact),
        )
        .expect("element lookup");
    assert_eq!(arg, Value::from("Sasuke"));
}

#[test]
fn lookup_on_serialized_collection_is_unsupported() {
    let model = person();
    let presets = [
        StorageConfig::binary(),
        StorageConfig::textual(),
        storage_with(Repr::List, Repr::Bytes, Repr::Dict, Repr::Dict),
        storage_with(Repr::List, Repr::Set, Repr::String, Repr::Dict),
    ];

    for storage in presets {
        let conv = Conversions::new(storage);

        for (name, arg) in [
            ("names", Value::from("Sasuke")),
            ("tags", Value::from("ninja")),
            ("scores", Value::Int(3)),
        ] {
            let repr = match name {
                "names" => storage.list,
                "tags" => storage.set,
                _ => storage.dict,
            };
            let result = conv.to_storage(
                &arg,
                &field(&model, name),
                ConvertMode::Lookup(Lookup::Exact),
            );

            if repr.is_serialized() {
                let err = result.expect_err("serialized collection lookup");
                assert_eq!(err.class, ErrorClass::UnsupportedQuery);
                assert_eq!(
                    err.message,
                    format!("can't filter on serialized collection field {name}")
                );
            } else {
                assert_eq!(result.expect("native collection lookup"), arg);
            }
        }

        // an `in` list goes through the same element conversion
        let err = conv
            .to_storage(
                &Value::from_list(["Sasuke"]),
                &field(&model, "names"),
                ConvertMode::Lookup(Lookup::In),
            )
            .map(|_| ())
            .err();
        assert_eq!(err.is_some(), storage.list.is_serialized());
    }
}

#[test]
fn list_lookups_convert_each_element() {
    let conv = Conversions::default();
    let owner = field(&pet(), "owner");

    let arg = conv
        .to_storage(
            &Value::from_list([1, 2]),
            &owner,
            ConvertMode::Lookup(Lookup::In),
        )
        .expect("in lookup");
    assert_eq!(arg, Value::from_list([1, 2]));
}

///
/// PROPERTIES
///

fn arb_sequence_repr() -> impl Strategy<Value = Repr> {
    prop_oneof![Just(Repr::List), Just(Repr::Bytes), Just(Repr::String)]
}

fn arb_mapping_repr() -> impl Strategy<Value = Repr> {
    prop_oneof![
        Just(Repr::Dict),
        Just(Repr::List),
        Just(Repr::Bytes),
        Just(Repr::String)
    ]
}

proptest! {
    #[test]
    fn list_of_text_round_trips(
        repr in arb_sequence_repr(),
        items in prop::collection::vec("[a-zA-Z0-9 ]{0,8}", 0..6),
    ) {
        let conv = Conversions::new(storage_with(repr, Repr::Set, Repr::Dict, Repr::Dict));
        let names = field(&person(), "names");
        let value = Value::from_list(items);

        prop_assert_eq!(round_trip(&conv, &value, &names), value);
    }

    #[test]
    fn dict_of_ints_round_trips(
        repr in arb_mapping_repr(),
        entries in prop::collection::btree_map("[a-z]{1,4}", any::<i64>(), 0..6),
    ) {
        let conv = Conversions::new(storage_with(Repr::List, Repr::Set, repr, Repr::Dict));
        let scores = field(&person(), "scores");
        let value = Value::from_map(entries);

        prop_assert_eq!(round_trip(&conv, &value, &scores), value);
    }

    #[test]
    fn set_round_trip_is_idempotent(
        items in prop::collection::vec(any::<i64>(), 0..8),
    ) {
        let conv = Conversions::new(StorageConfig::binary());
        let ids = FieldModel::set("ids", FieldModel::new("id", StorageKind::Integer));
        let value = Value::from_set(items);

        prop_assert_eq!(round_trip(&conv, &value, &ids), value);
    }
}
