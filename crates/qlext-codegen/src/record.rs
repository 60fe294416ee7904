//! Reference codec over JSON trees.
//!
//! The emitted C++ serializes structs as JSON objects and tagged unions by
//! dispatching on `_ver_`. This module implements the same rules directly on
//! [`serde_json::Value`], driven by the descriptors, so documents can be
//! checked without compiling the generated code:
//!
//! - struct → object with every field, discriminators included
//! - object → struct: known keys are read, unknown keys are ignored; values
//!   for string, numeric and boolean fields must have the matching JSON kind
//! - union → the active variant's object
//! - object → union: exact match of `_ver_` against `V0..V{N-1}`; an
//!   unknown or missing tag is an error
//! - sequences keep order and length; decoding starts from an empty sequence

use serde_json::{Map, Value};
use thiserror::Error;

use crate::mapping::TypeKind;
use crate::schema::{
    EntitySchema, FieldDescriptor, StructDescriptor, TaggedUnionDescriptor, VERSION_FIELD,
};

/// Decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A struct was decoded from something other than an object.
    #[error("{target}: expected a JSON object, found {found}")]
    NotAnObject {
        /// Struct or union being decoded.
        target: String,
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A sequence was decoded from something other than an array.
    #[error("{target}: expected a JSON array, found {found}")]
    NotAnArray {
        /// Element type being decoded.
        target: String,
        /// JSON kind found instead.
        found: &'static str,
    },

    /// A union object lacks a string `_ver_`.
    #[error("{target}: missing version tag '{field}'")]
    MissingVersion {
        /// Union being decoded.
        target: String,
        /// Discriminator field name.
        field: &'static str,
    },

    /// A union object carries a tag matching no variant.
    #[error("{target}: unknown version tag '{tag}'")]
    UnknownVersion {
        /// Union being decoded.
        target: String,
        /// The tag found.
        tag: String,
    },

    /// A field value has a JSON kind its C++ type cannot be read from.
    #[error("{target}.{field}: expected a JSON {expected}, found {found}")]
    WrongKind {
        /// Struct being decoded.
        target: String,
        /// Field name.
        field: String,
        /// Kind the field type reads from.
        expected: &'static str,
        /// Kind found instead.
        found: &'static str,
    },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Initial JSON value for a field: its default when that is a string,
/// number or boolean literal, `null` otherwise.
fn initial_value(field: &FieldDescriptor) -> Value {
    match serde_json::from_str(&field.default) {
        Ok(value @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::Null,
    }
}

const NUMERIC_TYPES: &[&str] = &[
    "double", "float", "int", "long", "unsigned", "Size", "Natural", "Integer", "BigInteger",
    "Real", "Rate", "Spread", "Time", "DiscountFactor", "Volatility", "Probability",
];

/// JSON kind a field's C++ type is read from.
///
/// Types outside the string, numeric and boolean scalars (dates, periods,
/// enums, quote holders) have their own converters and are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// Identifiers and other `std::string` fields.
    String,
    /// Integral and floating-point scalars.
    Number,
    /// `bool`.
    Boolean,
}

impl JsonKind {
    /// The kind `field` must hold, if it is checked.
    pub fn of(field: &FieldDescriptor) -> Option<Self> {
        if field.kind == TypeKind::Resource || field.field_type == "std::string" {
            return Some(JsonKind::String);
        }
        if field.kind != TypeKind::Plain {
            return None;
        }
        let base = field.field_type.rsplit("::").next().unwrap_or_default();
        match base {
            "bool" => Some(JsonKind::Boolean),
            _ if NUMERIC_TYPES.contains(&base) || base == "unsigned int" => Some(JsonKind::Number),
            _ => None,
        }
    }

    /// Returns true if `value` has this kind.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            JsonKind::String => value.is_string(),
            JsonKind::Number => value.is_number(),
            JsonKind::Boolean => value.is_boolean(),
        }
    }

    /// Kind label used in errors.
    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::String => "string",
            JsonKind::Number => "number",
            JsonKind::Boolean => "boolean",
        }
    }
}

/// An instance of a generated struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    slots: Vec<(String, Value)>,
}

impl Record {
    /// A record with every field at its initial value.
    pub fn with_defaults(descriptor: &StructDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            slots: descriptor
                .fields
                .iter()
                .map(|f| (f.name.clone(), initial_value(f)))
                .collect(),
        }
    }

    /// Struct name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.slots.iter().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    /// Sets a known field; returns false for unknown names.
    pub fn set(&mut self, field: &str, value: Value) -> bool {
        match self.slots.iter_mut().find(|(n, _)| n == field) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Field names in layout order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(n, _)| n.as_str())
    }

    /// Serializes every field.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .slots
            .iter()
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect();
        Value::Object(map)
    }

    /// Decodes a record, ignoring keys the struct does not know.
    pub fn from_json(descriptor: &StructDescriptor, tree: &Value) -> Result<Self, DecodeError> {
        let object = tree.as_object().ok_or_else(|| DecodeError::NotAnObject {
            target: descriptor.name.clone(),
            found: kind_of(tree),
        })?;
        let mut record = Self::with_defaults(descriptor);
        for (key, value) in object {
            let Some(field) = descriptor.field(key) else {
                continue;
            };
            if let Some(kind) = JsonKind::of(field) {
                if !kind.accepts(value) {
                    return Err(DecodeError::WrongKind {
                        target: descriptor.name.clone(),
                        field: key.clone(),
                        expected: kind.as_str(),
                        found: kind_of(value),
                    });
                }
            }
            record.set(key, value.clone());
        }
        Ok(record)
    }
}

/// An instance of a tagged union: one active variant.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionRecord {
    active: usize,
    record: Record,
}

impl UnionRecord {
    /// Wraps `record` as variant `active`.
    pub fn new(active: usize, record: Record) -> Self {
        Self { active, record }
    }

    /// Index of the active variant.
    pub fn active(&self) -> usize {
        self.active
    }

    /// The active variant's record.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Serializes the active variant.
    pub fn to_json(&self) -> Value {
        self.record.to_json()
    }

    /// Decodes by dispatching on the version tag.
    pub fn from_json(
        union: &TaggedUnionDescriptor,
        variants: &[StructDescriptor],
        tree: &Value,
    ) -> Result<Self, DecodeError> {
        let object = tree.as_object().ok_or_else(|| DecodeError::NotAnObject {
            target: union.name.clone(),
            found: kind_of(tree),
        })?;
        let tag = object
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MissingVersion {
                target: union.name.clone(),
                field: VERSION_FIELD,
            })?;
        let (active, descriptor) = variants
            .iter()
            .enumerate()
            .find(|(_, v)| v.version.as_deref() == Some(tag))
            .ok_or_else(|| DecodeError::UnknownVersion {
                target: union.name.clone(),
                tag: tag.to_string(),
            })?;
        Ok(Self {
            active,
            record: Record::from_json(descriptor, tree)?,
        })
    }
}

/// A decoded document: either a bare struct or a union value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    /// Single-overload struct, or a variant decoded directly.
    Struct(Record),
    /// Union value.
    Union(UnionRecord),
}

impl SchemaValue {
    /// Serializes the value.
    pub fn to_json(&self) -> Value {
        match self {
            SchemaValue::Struct(r) => r.to_json(),
            SchemaValue::Union(u) => u.to_json(),
        }
    }
}

/// Decoding entry point for one entity's top-level type.
///
/// For a single-overload entity the top-level type is its struct; for a
/// multi-overload entity it is the union.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDocument<'a> {
    schema: &'a EntitySchema,
}

impl<'a> SchemaDocument<'a> {
    /// Creates a document codec for `schema`.
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Name of the top-level type.
    pub fn type_name(&self) -> &str {
        match &self.schema.union {
            Some(u) => &u.name,
            None => &self.schema.structs[0].name,
        }
    }

    /// Decodes one value.
    pub fn decode(&self, tree: &Value) -> Result<SchemaValue, DecodeError> {
        match &self.schema.union {
            Some(union) => {
                UnionRecord::from_json(union, &self.schema.structs, tree).map(SchemaValue::Union)
            }
            None => Record::from_json(&self.schema.structs[0], tree).map(SchemaValue::Struct),
        }
    }

    /// Decodes a sequence of values.
    pub fn decode_sequence(&self, tree: &Value) -> Result<Vec<SchemaValue>, DecodeError> {
        decode_sequence(self.type_name(), tree, |item| self.decode(item))
    }
}

/// Serializes a sequence in order.
pub fn encode_sequence<T>(items: &[T], encode: impl Fn(&T) -> Value) -> Value {
    Value::Array(items.iter().map(encode).collect())
}

/// Decodes a sequence in order into a fresh vector.
pub fn decode_sequence<T>(
    target: &str,
    tree: &Value,
    decode: impl Fn(&Value) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let items = tree.as_array().ok_or_else(|| DecodeError::NotAnArray {
        target: target.to_string(),
        found: kind_of(tree),
    })?;
    items.iter().map(decode).collect()
}
