//! Lookup tables translating source spellings into target spellings.
//!
//! Three tables drive generation:
//!
//! - **types**: declared parameter type → struct field type
//! - **values**: default value expression → field initializer
//! - **resolvers**: wrapped external type → context accessor used by factories
//!
//! Lookups are strict. A spelling missing from `types` or `values` is an
//! error, never a pass-through.
//!
//! Tables can be loaded from a TOML mappings file:
//!
//! ```toml
//! inherit_standard = true
//!
//! [profile]
//! context_type = "MyExt::Context"
//!
//! [types]
//! "Handle<ZeroInflationIndex>" = "std::string"
//!
//! [values]
//! "Preceding" = "QuantLib::Preceding"
//!
//! [resolvers]
//! "Handle<ZeroInflationIndex>" = "context.getZeroInflationIndex"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};
use crate::profile::{TargetProfile, Wrapper};

/// How a declared type was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Target-domain field type.
    pub target: String,
    /// Resolution class, used by the construction emitter.
    pub kind: TypeKind,
}

/// Classification of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Stored and passed as is.
    Plain,
    /// Quote handle stored as a value holder.
    QuoteHolder,
    /// External resource stored as an identifier and resolved through the context.
    Resource,
}

/// The three lookup tables plus the target profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    /// Target spellings.
    pub profile: TargetProfile,
    /// Source type → target type.
    pub types: BTreeMap<String, String>,
    /// Source default expression → target initializer.
    pub values: BTreeMap<String, String>,
    /// Wrapped source type → context accessor.
    pub resolvers: BTreeMap<String, String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// On-disk shape of a mappings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MappingsFile {
    inherit_standard: Option<bool>,
    profile: Option<TargetProfile>,
    types: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    resolvers: BTreeMap<String, String>,
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl LookupTables {
    /// Empty tables with the given profile.
    pub fn empty(profile: TargetProfile) -> Self {
        Self {
            profile,
            types: BTreeMap::new(),
            values: BTreeMap::new(),
            resolvers: BTreeMap::new(),
        }
    }

    /// The standard QuantLib tables.
    pub fn standard() -> Self {
        let types = table(&[
            ("bool", "bool"),
            ("BusinessDayConvention", "QuantLib::BusinessDayConvention"),
            ("Calendar", "QuantLib::Calendar"),
            ("Date", "QuantLib::Date"),
            ("DateGeneration::Rule", "QuantLib::DateGeneration::Rule"),
            ("DayCounter", "QuantLib::DayCounter"),
            ("double", "double"),
            ("ext::optional<bool>", "QuantLib::ext::optional<bool>"),
            (
                "ext::optional<BusinessDayConvention>",
                "QuantLib::ext::optional<QuantLib::BusinessDayConvention>",
            ),
            (
                "ext::optional<DateGeneration::Rule>",
                "QuantLib::ext::optional<QuantLib::DateGeneration::Rule>",
            ),
            ("ext::optional<Frequency>", "QuantLib::ext::optional<QuantLib::Frequency>"),
            ("ext::optional<Period>", "QuantLib::ext::optional<QuantLib::Period>"),
            ("ext::shared_ptr<BMAIndex>", "std::string"),
            ("ext::shared_ptr<IborIndex>", "std::string"),
            ("ext::shared_ptr<OvernightIndex>", "std::string"),
            ("ext::shared_ptr<SwapIndex>", "std::string"),
            ("Frequency", "QuantLib::Frequency"),
            ("Futures::Type", "QuantLib::Futures::Type"),
            ("Handle<Quote>", "QuantLib::SimpleQuote"),
            ("Handle<YieldTermStructure>", "std::string"),
            ("int", "int"),
            ("Integer", "QuantLib::Integer"),
            ("Natural", "QuantLib::Natural"),
            ("Period", "QuantLib::Period"),
            ("Pillar::Choice", "QuantLib::Pillar::Choice"),
            ("Rate", "QuantLib::Rate"),
            ("RateAveraging::Type", "QuantLib::RateAveraging::Type"),
            ("Real", "QuantLib::Real"),
            ("Schedule", "QlExt::Schedule"),
            ("Spread", "QuantLib::Spread"),
            ("std::vector<bool>", "std::vector<bool>"),
            ("std::vector<Date>", "std::vector<QuantLib::Date>"),
            ("Swap::Type", "QuantLib::Swap::Type"),
        ]);

        let values = table(&[
            ("0", "0"),
            ("0.0", "0.0"),
            ("{}", "{}"),
            ("true", "true"),
            ("false", "false"),
            ("std::vector<bool>(0)", "std::vector<bool>(0)"),
            ("Pillar::LastRelevantDate", "QuantLib::Pillar::LastRelevantDate"),
            ("Null<Natural>()", "QuantLib::Null<QuantLib::Natural>()"),
            ("Date()", "QuantLib::Date()"),
            ("0 * Days", "0 * QuantLib::Days"),
            ("ext::nullopt", "QuantLib::ext::nullopt"),
            ("RateAveraging::Compound", "QuantLib::RateAveraging::Compound"),
            ("Following", "QuantLib::Following"),
            ("Annual", "QuantLib::Annual"),
            ("Unadjusted", "QuantLib::Unadjusted"),
            ("Calendar()", "QuantLib::Calendar()"),
            ("NullCalendar()", "QuantLib::NullCalendar()"),
            ("Futures::IMM", "QuantLib::Futures::IMM"),
        ]);

        let resolvers = table(&[
            ("Handle<YieldTermStructure>", "context.getYieldTermStructure"),
            ("ext::shared_ptr<BMAIndex>", "context.getBmaIndex"),
            ("ext::shared_ptr<IborIndex>", "context.getIborIndex"),
            ("ext::shared_ptr<OvernightIndex>", "context.getOvernightIndex"),
            ("ext::shared_ptr<SwapIndex>", "context.getSwapIndex"),
        ]);

        Self {
            profile: TargetProfile::quantlib(),
            types,
            values,
            resolvers,
        }
    }

    /// Parses a TOML mappings document.
    ///
    /// With `inherit_standard` (the default) the document is layered over
    /// [`LookupTables::standard`]; otherwise it replaces it.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: MappingsFile = toml::from_str(content)?;
        let mut tables = if file.inherit_standard.unwrap_or(true) {
            Self::standard()
        } else {
            Self::empty(TargetProfile::quantlib())
        };
        if let Some(profile) = file.profile {
            tables.profile = profile;
        }
        tables.types.extend(file.types);
        tables.values.extend(file.values);
        tables.resolvers.extend(file.resolvers);
        Ok(tables)
    }

    /// Loads a TOML mappings file.
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| CodegenError::config(path, e))
    }

    /// Resolves a declared type.
    ///
    /// An explicit `types` entry wins. Otherwise a wrapped quote becomes the
    /// value holder and a wrapped type with a resolver becomes an identifier.
    /// Returns `None` for anything else.
    pub fn resolve_type(&self, source_type: &str) -> Option<ResolvedType> {
        let kind = self.classify(source_type);
        if let Some(target) = self.types.get(source_type) {
            return Some(ResolvedType {
                target: target.clone(),
                kind,
            });
        }
        let target = match kind {
            TypeKind::QuoteHolder => self.profile.quote_holder(),
            TypeKind::Resource => self.profile.identifier_type.clone(),
            TypeKind::Plain => return None,
        };
        Some(ResolvedType { target, kind })
    }

    /// Resolves a default value expression; the empty string means no default.
    pub fn resolve_value(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return Some(String::new());
        }
        self.values.get(value).cloned()
    }

    /// Context accessor for a wrapped source type.
    pub fn resolver(&self, source_type: &str) -> Option<&str> {
        self.resolvers.get(source_type).map(String::as_str)
    }

    fn classify(&self, source_type: &str) -> TypeKind {
        if self.resolvers.contains_key(source_type) {
            return TypeKind::Resource;
        }
        match self.profile.unwrap_template(source_type) {
            Some((Wrapper::Handle, inner)) if self.is_quote(inner) => TypeKind::QuoteHolder,
            _ => TypeKind::Plain,
        }
    }

    fn is_quote(&self, inner: &str) -> bool {
        inner == self.profile.quote_type || inner == self.profile.qualify(&self.profile.quote_type)
    }
}
