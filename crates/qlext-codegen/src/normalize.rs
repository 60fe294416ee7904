//! Parameter list normalization.
//!
//! Turns `"const Handle<Quote>& rate, Natural days = 0"` into resolved
//! [`ParameterDecl`]s. Qualifiers are dropped, defaults are split off and
//! both the type and the default go through the lookup tables.

use crate::error::{CodegenError, CodegenResult};
use crate::mapping::{LookupTables, TypeKind};

/// A resolved constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDecl {
    /// Target-domain field type.
    pub target_type: String,
    /// Parameter name.
    pub name: String,
    /// Target-domain initializer; empty when the parameter has no default.
    pub default: String,
    /// Declared type before mapping, qualifiers removed.
    pub source_type: String,
    /// How the type was resolved.
    pub kind: TypeKind,
}

/// Splits on commas that are not nested in `<>`, `()`, `[]` or `{}`.
pub fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Removes `&` markers and `const` qualifiers.
fn strip_qualifiers(fragment: &str) -> String {
    let without_refs = fragment.replace('&', "");
    without_refs
        .split_whitespace()
        .filter(|token| *token != "const")
        .collect::<Vec<_>>()
        .join(" ")
}

/// A parameter split into source spellings, before table lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    /// Declared type, qualifiers removed.
    pub source_type: String,
    /// Parameter name.
    pub name: String,
    /// Default expression as written, empty if absent.
    pub default: String,
}

/// Splits one fragment into type, name and default.
///
/// Returns `None` when there is no whitespace between type and name.
pub fn split_parameter(fragment: &str) -> Option<RawParameter> {
    let cleaned = strip_qualifiers(fragment);
    let (declaration, default) = match cleaned.split_once('=') {
        Some((lhs, rhs)) => (lhs.trim(), rhs.trim()),
        None => (cleaned.trim(), ""),
    };
    let (source_type, name) = declaration.rsplit_once(char::is_whitespace)?;
    let (source_type, name) = (source_type.trim(), name.trim());
    if source_type.is_empty() || name.is_empty() {
        return None;
    }
    Some(RawParameter {
        source_type: source_type.to_string(),
        name: name.to_string(),
        default: default.to_string(),
    })
}

/// Normalizes a raw parameter list of `entity`.
///
/// An empty list yields no parameters. Unknown types or defaults abort.
pub fn normalize_parameters(
    entity: &str,
    parameters: &str,
    tables: &LookupTables,
) -> CodegenResult<Vec<ParameterDecl>> {
    if parameters.trim().is_empty() {
        return Ok(Vec::new());
    }

    split_top_level(parameters)
        .into_iter()
        .map(|fragment| -> CodegenResult<ParameterDecl> {
            let raw = split_parameter(fragment).ok_or_else(|| CodegenError::MalformedParameter {
                entity: entity.to_string(),
                fragment: fragment.trim().to_string(),
            })?;
            let resolved =
                tables
                    .resolve_type(&raw.source_type)
                    .ok_or_else(|| CodegenError::UnknownType {
                        entity: entity.to_string(),
                        parameter: raw.name.clone(),
                        source_type: raw.source_type.clone(),
                    })?;
            let default =
                tables
                    .resolve_value(&raw.default)
                    .ok_or_else(|| CodegenError::UnknownValue {
                        entity: entity.to_string(),
                        parameter: raw.name.clone(),
                        value: raw.default.clone(),
                    })?;
            Ok(ParameterDecl {
                target_type: resolved.target,
                name: raw.name,
                default,
                source_type: raw.source_type,
                kind: resolved.kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> LookupTables {
        LookupTables::standard()
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        let parts = split_top_level("std::map<int, double> m, Date d = Date(), int x");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].trim(), "std::map<int, double> m");
    }

    #[test]
    fn test_split_parameter_strips_qualifiers() {
        let raw = split_parameter(" const Handle<Quote>& rate ").unwrap();
        assert_eq!(raw.source_type, "Handle<Quote>");
        assert_eq!(raw.name, "rate");
        assert_eq!(raw.default, "");
    }

    #[test]
    fn test_split_parameter_keeps_spaced_types() {
        let raw = split_parameter("ext::optional<BusinessDayConvention> paymentConvention = ext::nullopt").unwrap();
        assert_eq!(raw.source_type, "ext::optional<BusinessDayConvention>");
        assert_eq!(raw.name, "paymentConvention");
        assert_eq!(raw.default, "ext::nullopt");

        let raw = split_parameter("unsigned int n").unwrap();
        assert_eq!(raw.source_type, "unsigned int");
    }

    #[test]
    fn test_split_parameter_without_name() {
        assert!(split_parameter("Real").is_none());
        assert!(split_parameter("= 0").is_none());
    }

    #[test]
    fn test_normalize_full_list() {
        let params = normalize_parameters(
            "Foo",
            "Rate rate, const Period& tenor, bool endOfMonth = false",
            &tables(),
        )
        .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].target_type, "QuantLib::Rate");
        assert_eq!(params[1].target_type, "QuantLib::Period");
        assert_eq!(params[1].source_type, "Period");
        assert_eq!(params[2].name, "endOfMonth");
        assert_eq!(params[2].default, "false");
    }

    #[test]
    fn test_default_with_spaces_is_mapped() {
        let params = normalize_parameters("Foo", "Period tenor = 0 * Days", &tables()).unwrap();
        assert_eq!(params[0].default, "0 * QuantLib::Days");
    }

    #[test]
    fn test_wrapped_types() {
        let params = normalize_parameters(
            "Foo",
            "const Handle<Quote>& q, const ext::shared_ptr<IborIndex>& idx",
            &tables(),
        )
        .unwrap();
        assert_eq!(params[0].target_type, "QuantLib::SimpleQuote");
        assert_eq!(params[0].kind, TypeKind::QuoteHolder);
        assert_eq!(params[1].target_type, "std::string");
        assert_eq!(params[1].kind, TypeKind::Resource);
    }

    #[test]
    fn test_nullopt_default() {
        let params = normalize_parameters(
            "Foo",
            "ext::optional<Frequency> f = ext::nullopt",
            &tables(),
        )
        .unwrap();
        assert_eq!(params[0].default, "QuantLib::ext::nullopt");
    }

    #[test]
    fn test_unknown_default_is_fatal() {
        let err = normalize_parameters("Foo", "ext::optional<Frequency> f = ext::nulopt", &tables())
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnknownValue { ref value, .. } if value == "ext::nulopt"));
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let err = normalize_parameters("Foo", "Perod tenor", &tables()).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownType { ref source_type, .. } if source_type == "Perod"));
    }

    #[test]
    fn test_malformed_fragment_is_fatal() {
        let err = normalize_parameters("Foo", "Rate rate, Real", &tables()).unwrap_err();
        assert!(matches!(err, CodegenError::MalformedParameter { .. }));
    }

    #[test]
    fn test_empty_list() {
        assert!(normalize_parameters("Foo", "  ", &tables()).unwrap().is_empty());
    }
}
