//! Target profile: the names of the external library the generated code
//! talks to.
//!
//! Nothing in the emitters hard-codes the wrapped library. Namespaces,
//! smart-pointer spellings, the context type and the JSON tree type all come
//! from here; [`TargetProfile::quantlib`] is the profile the standard lookup
//! tables were written for.

use serde::{Deserialize, Serialize};

/// Spellings used by the emitters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// Namespace of the wrapped library, e.g. `QuantLib`.
    pub library_namespace: String,
    /// Handle template name in source spellings, e.g. `Handle`.
    pub handle_template: String,
    /// Shared pointer template in source spellings, e.g. `ext::shared_ptr`.
    pub shared_ptr_template: String,
    /// Shared pointer factory, relative to the library namespace.
    pub make_shared: String,
    /// Source spelling of the generic quote type wrapped in handles.
    pub quote_type: String,
    /// Concrete value holder stored for quote handles, relative to the library namespace.
    pub quote_holder_type: String,
    /// Target type used for fields holding external-resource identifiers.
    pub identifier_type: String,
    /// Fully qualified context type passed to factories.
    pub context_type: String,
    /// Parameter name of the context in factories.
    pub context_name: String,
    /// Fully qualified JSON tree type.
    pub json_type: String,
    /// Include lines emitted at the top of every header, without `#include`.
    pub includes: Vec<String>,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::quantlib()
    }
}

impl TargetProfile {
    /// Profile for QuantLib with nlohmann::json and the QlExt context.
    pub fn quantlib() -> Self {
        Self {
            library_namespace: "QuantLib".to_string(),
            handle_template: "Handle".to_string(),
            shared_ptr_template: "ext::shared_ptr".to_string(),
            make_shared: "ext::make_shared".to_string(),
            quote_type: "Quote".to_string(),
            quote_holder_type: "SimpleQuote".to_string(),
            identifier_type: "std::string".to_string(),
            context_type: "QlExt::Context".to_string(),
            context_name: "context".to_string(),
            json_type: "nlohmann::json".to_string(),
            includes: [
                "<iostream>",
                "<iomanip>",
                "<stdexcept>",
                "<string>",
                "<unordered_map>",
                "<vector>",
                "<variant>",
                "<ql/quantlib.hpp>",
                "<ql/optional.hpp>",
                "<ql/handle.hpp>",
                "\"JsonUtils.h\"",
                "\"Structs.h\"",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }

    /// Qualifies `name` with the library namespace unless it already is.
    pub fn qualify(&self, name: &str) -> String {
        let prefix = format!("{}::", self.library_namespace);
        if self.library_namespace.is_empty() || name.starts_with(&prefix) {
            name.to_string()
        } else {
            format!("{prefix}{name}")
        }
    }

    /// Qualified shared pointer template, e.g. `QuantLib::ext::shared_ptr`.
    pub fn shared_ptr(&self) -> String {
        self.qualify(&self.shared_ptr_template)
    }

    /// Qualified factory, e.g. `QuantLib::ext::make_shared`.
    pub fn make_shared_fn(&self) -> String {
        self.qualify(&self.make_shared)
    }

    /// Qualified handle template, e.g. `QuantLib::Handle`.
    pub fn handle(&self) -> String {
        self.qualify(&self.handle_template)
    }

    /// Qualified value holder for quotes, e.g. `QuantLib::SimpleQuote`.
    pub fn quote_holder(&self) -> String {
        self.qualify(&self.quote_holder_type)
    }

    /// Splits `Wrapper<Inner>` for either wrapper template.
    ///
    /// Returns which wrapper matched and the inner spelling.
    pub fn unwrap_template<'a>(&self, source_type: &'a str) -> Option<(Wrapper, &'a str)> {
        let source_type = source_type.trim();
        let inner_of = |template: &str| -> Option<&'a str> {
            let rest = source_type.strip_prefix(template)?.trim_start();
            let inner = rest.strip_prefix('<')?.strip_suffix('>')?;
            Some(inner.trim())
        };
        if let Some(inner) = inner_of(&self.handle_template) {
            return Some((Wrapper::Handle, inner));
        }
        inner_of(&self.shared_ptr_template).map(|inner| (Wrapper::SharedPtr, inner))
    }
}

/// The wrapper template a source type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    /// Relinkable handle, e.g. `Handle<YieldTermStructure>`.
    Handle,
    /// Shared pointer, e.g. `ext::shared_ptr<IborIndex>`.
    SharedPtr,
}
