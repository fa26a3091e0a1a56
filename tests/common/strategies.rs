use config_resolver::{Descriptor, Record, Scalar, RELATIONAL_SCHEMA};
use proptest::prelude::*;
use proptest::strategy::Just;
use std::collections::BTreeMap;

/// Strategy for adapter names
pub fn adapter_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("mysql2".to_string()),
        Just("postgresql".to_string()),
        Just("sqlite3".to_string()),
        Just("trilogy".to_string()),
    ]
}

/// Strategy for short lowercase identifiers used as hosts, databases, users
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// Strategy for a port value, including zero
pub fn port_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0_i64), Just(3306), Just(5432), 1_i64..65_536]
}

/// Strategy for relational settings maps with any subset of fields populated
pub fn relational_fields_strategy() -> impl Strategy<Value = BTreeMap<String, Scalar>> {
    (
        prop::option::of(adapter_strategy()),
        prop::option::of(identifier_strategy()),
        prop::option::of(port_strategy()),
        prop::option::of(identifier_strategy()),
        prop::option::of(identifier_strategy()),
        prop::option::of(prop_oneof![Just("primary".to_string()), Just("replica".to_string())]),
    )
        .prop_map(|(adapter, host, port, database, username, role)| {
            let mut fields = BTreeMap::new();
            let text = [
                ("adapter", adapter),
                ("host", host),
                ("database", database),
                ("username", username),
                ("role", role),
            ];
            for (field, value) in text {
                if let Some(value) = value {
                    fields.insert(field.to_string(), Scalar::Str(value));
                }
            }
            if let Some(port) = port {
                fields.insert("port".to_string(), Scalar::Int(port));
            }
            fields
        })
}

/// Strategy for relational descriptors in map form
pub fn relational_descriptor_strategy() -> impl Strategy<Value = Descriptor> {
    relational_fields_strategy().prop_map(Descriptor::Fields)
}

/// Strategy for a probe descriptor and a matcher built from a subset of its fields
pub fn probe_and_sub_matcher_strategy() -> impl Strategy<Value = (Descriptor, Descriptor)> {
    relational_fields_strategy().prop_flat_map(|fields| {
        let len = fields.len();
        (Just(fields), prop::collection::vec(any::<bool>(), len))
    })
    .prop_map(|(fields, keep)| {
        let subset: BTreeMap<_, _> = fields
            .iter()
            .zip(keep)
            .filter(|(_, keep)| *keep)
            .map(|((field, value), _)| (field.clone(), value.clone()))
            .collect();
        (Descriptor::Fields(fields), Descriptor::Fields(subset))
    })
}

/// Build the record the relational normalizer produces for a settings map.
pub fn expected_record(fields: &BTreeMap<String, Scalar>) -> Record {
    fields
        .iter()
        .fold(Record::empty(&RELATIONAL_SCHEMA), |record, (field, value)| {
            record.with_value(field, Some(value.clone()))
        })
}
