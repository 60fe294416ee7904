//! QlExt Code Generator
//!
//! Compiles C++ constructor declarations into data-transfer structs, JSON
//! codecs and construction factories for the wrapped pricing library.
//!
//! # Pipeline
//!
//! - **Signature parsing**: comment stripping and grouping of overloads by entity
//! - **Normalization**: qualifier stripping, default splitting, table lookups
//! - **Schema building**: one struct per overload, `V{i}` suffixes and a tagged
//!   union when an entity is overloaded
//! - **Emission**: struct declarations, `to_json`/`from_json` pairs for structs,
//!   unions and vectors, factories threading fields into the external constructor
//!
//! A Rust reference codec ([`Record`], [`UnionRecord`], [`SchemaDocument`])
//! implements the same JSON rules as the emitted C++ so documents can be
//! checked without compiling anything.
//!
//! # Example
//!
//! ```rust
//! use qlext_codegen::{EntryConfig, Generator};
//!
//! let entry = EntryConfig::new("Foo", "QlExt", "FooStructs", "Foo.ctor");
//! let outcome = Generator::default()
//!     .generate_entry(&entry, "Foo(Rate rate); Foo(Rate rate, Period tenor = 0 * Days);")
//!     .unwrap();
//!
//! let unit = outcome.unit().unwrap();
//! assert_eq!(unit.schema.overload_count(), 2);
//! assert!(unit.header.contains("using Foo = std::variant<FooV0,FooV1>;"));
//! ```
//!
//! # Lookup tables
//!
//! Type, value and resolver tables default to [`LookupTables::standard`] and
//! can be extended or replaced from a TOML file with
//! [`LookupTables::from_file`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod emit;
mod error;
mod generator;
mod mapping;
mod normalize;
mod profile;
mod record;
mod schema;
mod signature;

pub use config::{is_identifier, EntryConfig, ExtraField, GenerationConfig};
pub use emit::{argument_expression, emit_unit, GeneratedUnit};
pub use error::{CodegenError, CodegenResult, Validate, ValidationError};
pub use generator::{EntryOutcome, EntryReport, EntryStatus, Generator, RunReport};
pub use mapping::{LookupTables, ResolvedType, TypeKind};
pub use normalize::{normalize_parameters, split_parameter, split_top_level, ParameterDecl, RawParameter};
pub use profile::{TargetProfile, Wrapper};
pub use record::{
    decode_sequence, encode_sequence, DecodeError, JsonKind, Record, SchemaDocument,
    SchemaValue, UnionRecord,
};
pub use schema::{
    build_entity_schema, build_schema, version_tag, EntitySchema, FieldDescriptor, FieldOrigin,
    StructDescriptor, TaggedUnionDescriptor, TYPE_FIELD, VERSION_FIELD,
};
pub use signature::{
    parse_declaration, parse_signatures, strip_comments, ConstructorSignature, SignatureSet,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{EntryConfig, ExtraField, GenerationConfig};
    pub use crate::error::{CodegenError, CodegenResult, Validate};
    pub use crate::generator::{EntryOutcome, Generator, RunReport};
    pub use crate::mapping::LookupTables;
    pub use crate::record::{Record, SchemaDocument, UnionRecord};
    pub use crate::schema::EntitySchema;
}
