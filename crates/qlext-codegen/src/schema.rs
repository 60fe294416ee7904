//! Struct and tagged-union descriptors.
//!
//! One entity with one overload becomes one struct. An entity with N
//! overloads becomes N structs suffixed `V0..V{N-1}` plus a tagged union
//! over them.
//!
//! Field order inside a struct is fixed: configured extra fields, then the
//! type discriminator, then the version discriminator (multi-overload only),
//! then the declared parameters in signature order. Both emitters walk the
//! fields in this order, and the construction emitter relies on the
//! parameter fields matching the external constructor positionally.

use crate::config::ExtraField;
use crate::error::CodegenResult;
use crate::mapping::{LookupTables, TypeKind};
use crate::normalize::{normalize_parameters, ParameterDecl};

/// Name of the type discriminator field.
pub const TYPE_FIELD: &str = "_type_";

/// Name of the version discriminator field.
pub const VERSION_FIELD: &str = "_ver_";

/// Where a field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    /// Configured extra field.
    Extra,
    /// Type discriminator.
    TypeTag,
    /// Version discriminator.
    VersionTag,
    /// Declared constructor parameter.
    Parameter,
}

impl FieldOrigin {
    /// Synthetic fields are not constructor arguments.
    pub fn is_synthetic(self) -> bool {
        !matches!(self, FieldOrigin::Parameter)
    }

    /// Short label for listings.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldOrigin::Extra => "extra",
            FieldOrigin::TypeTag => "type-tag",
            FieldOrigin::VersionTag => "version-tag",
            FieldOrigin::Parameter => "parameter",
        }
    }
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Target-domain type.
    pub field_type: String,
    /// Field name.
    pub name: String,
    /// Initializer, empty for none.
    pub default: String,
    /// Declared type before mapping.
    pub source_type: String,
    /// How the type was resolved.
    pub kind: TypeKind,
    /// Where the field comes from.
    pub origin: FieldOrigin,
}

impl FieldDescriptor {
    fn synthetic(field_type: &str, name: &str, default: String, origin: FieldOrigin) -> Self {
        Self {
            field_type: field_type.to_string(),
            name: name.to_string(),
            default,
            source_type: field_type.to_string(),
            kind: TypeKind::Plain,
            origin,
        }
    }

    fn from_extra(extra: &ExtraField) -> Self {
        Self::synthetic(
            &extra.field_type,
            &extra.name,
            extra.value.clone(),
            FieldOrigin::Extra,
        )
    }

    fn from_parameter(param: ParameterDecl) -> Self {
        Self {
            field_type: param.target_type,
            name: param.name,
            default: param.default,
            source_type: param.source_type,
            kind: param.kind,
            origin: FieldOrigin::Parameter,
        }
    }

    /// Returns true if the field has an initializer.
    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }
}

/// A generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    /// Struct name, version-suffixed for multi-overload entities.
    pub name: String,
    /// Version tag (`V0`, ...) or `None` for single-overload entities.
    pub version: Option<String>,
    /// Fields in layout order.
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that are constructor arguments, in order.
    pub fn constructor_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.origin.is_synthetic())
    }
}

/// A closed sum over the version-suffixed structs of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedUnionDescriptor {
    /// Union name (the configured struct name).
    pub name: String,
    /// Variant struct names in version order.
    pub variants: Vec<String>,
}

/// Everything generated for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    /// External entity (class) name.
    pub entity: String,
    /// Structs in version order.
    pub structs: Vec<StructDescriptor>,
    /// Present when the entity has more than one overload.
    pub union: Option<TaggedUnionDescriptor>,
}

impl EntitySchema {
    /// Looks up a struct by name.
    pub fn struct_named(&self, name: &str) -> Option<&StructDescriptor> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Number of overloads the schema was built from.
    pub fn overload_count(&self) -> usize {
        self.structs.len()
    }
}

/// Version tag for overload `index`.
pub fn version_tag(index: usize) -> String {
    format!("V{index}")
}

/// Builds the schema of one entity from its already-normalized overloads.
///
/// Returns `None` when there are no overloads.
pub fn build_schema(
    entity: &str,
    struct_name: &str,
    overloads: Vec<Vec<ParameterDecl>>,
    extra_fields: &[ExtraField],
    tables: &LookupTables,
) -> Option<EntitySchema> {
    if overloads.is_empty() {
        return None;
    }
    let versioned = overloads.len() > 1;
    let identifier = tables.profile.identifier_type.as_str();

    let structs: Vec<StructDescriptor> = overloads
        .into_iter()
        .enumerate()
        .map(|(i, params)| {
            let version = versioned.then(|| version_tag(i));
            let suffix = version.as_deref().unwrap_or("");

            let mut fields: Vec<FieldDescriptor> =
                extra_fields.iter().map(FieldDescriptor::from_extra).collect();
            fields.push(FieldDescriptor::synthetic(
                identifier,
                TYPE_FIELD,
                format!("\"{entity}{suffix}\""),
                FieldOrigin::TypeTag,
            ));
            if let Some(tag) = &version {
                fields.push(FieldDescriptor::synthetic(
                    identifier,
                    VERSION_FIELD,
                    format!("\"{tag}\""),
                    FieldOrigin::VersionTag,
                ));
            }
            fields.extend(params.into_iter().map(FieldDescriptor::from_parameter));

            StructDescriptor {
                name: format!("{struct_name}{suffix}"),
                version,
                fields,
            }
        })
        .collect();

    let union = versioned.then(|| TaggedUnionDescriptor {
        name: struct_name.to_string(),
        variants: structs.iter().map(|s| s.name.clone()).collect(),
    });

    Some(EntitySchema {
        entity: entity.to_string(),
        structs,
        union,
    })
}

/// Normalizes raw overloads of `entity` and builds its schema.
pub fn build_entity_schema(
    entity: &str,
    struct_name: &str,
    raw_overloads: &[String],
    extra_fields: &[ExtraField],
    tables: &LookupTables,
) -> CodegenResult<Option<EntitySchema>> {
    let overloads = raw_overloads
        .iter()
        .map(|raw| normalize_parameters(entity, raw, tables))
        .collect::<CodegenResult<Vec<_>>>()?;
    Ok(build_schema(
        entity,
        struct_name,
        overloads,
        extra_fields,
        tables,
    ))
}
