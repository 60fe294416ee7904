//! Constructor signature parsing.
//!
//! A definitions file is free text holding C++ constructor declarations such
//! as
//!
//! ```text
//! // deposit helpers
//! DepositRateHelper(const Handle<Quote>& rate, const ext::shared_ptr<IborIndex>& i);
//! DepositRateHelper(Rate rate, const ext::shared_ptr<IborIndex>& i);
//! ```
//!
//! Parsing strips comments, splits on `;` and groups the raw parameter lists
//! by entity name. The order in which overloads appear is kept: it decides
//! the `V0`, `V1`, ... numbering of the generated variants.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)//[^\n]*|/\*.*?\*/").expect("comment pattern is valid"));

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\w+::)?(\w+)\s*\((.*)\)").expect("declaration pattern is valid")
});

/// One parsed declaration: entity name plus its raw parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSignature {
    /// Entity (class) name, qualifier removed.
    pub entity: String,
    /// Parameter list between the outer parentheses, trimmed.
    pub parameters: String,
}

/// Ordered mapping from entity name to its overloads.
///
/// Entities keep first-seen order, overloads keep source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    entries: Vec<(String, Vec<String>)>,
}

impl SignatureSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an overload to `entity`, creating the entity on first sight.
    pub fn push(&mut self, signature: ConstructorSignature) {
        match self
            .entries
            .iter_mut()
            .find(|(name, _)| *name == signature.entity)
        {
            Some((_, overloads)) => overloads.push(signature.parameters),
            None => self
                .entries
                .push((signature.entity, vec![signature.parameters])),
        }
    }

    /// Raw parameter lists for `entity`, in source order.
    pub fn overloads(&self, entity: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == entity)
            .map(|(_, overloads)| overloads.as_slice())
    }

    /// Entity names in first-seen order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(entity, overloads)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, overloads)| (name.as_str(), overloads.as_slice()))
    }

    /// Number of distinct entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no declaration was recognised.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Removes `//` line comments and `/* */` block comments.
pub fn strip_comments(text: &str) -> String {
    COMMENT_RE.replace_all(text, "").into_owned()
}

/// Parses a single `;`-free declaration.
///
/// Returns `None` when the fragment does not look like `[q::]Name(...)`.
pub fn parse_declaration(fragment: &str) -> Option<ConstructorSignature> {
    let caps = DECLARATION_RE.captures(fragment)?;
    Some(ConstructorSignature {
        entity: caps.get(2)?.as_str().trim().to_string(),
        parameters: caps.get(3)?.as_str().trim().to_string(),
    })
}

/// Parses a whole definitions text into a [`SignatureSet`].
///
/// Fragments that do not match a declaration are skipped.
pub fn parse_signatures(text: &str) -> SignatureSet {
    let stripped = strip_comments(text);
    let mut set = SignatureSet::new();

    for fragment in stripped.split(';') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        match parse_declaration(fragment) {
            Some(signature) => set.push(signature),
            None => debug!(fragment, "skipping text that is not a declaration"),
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_and_block_comments() {
        let text = "A(int a); // trailing, with (parens)\n/* B(int b);\n C(int c); */D(int d);";
        let stripped = strip_comments(text);
        assert!(!stripped.contains("trailing"));
        assert!(!stripped.contains("B(int b)"));
        assert!(stripped.contains("A(int a);"));
        assert!(stripped.contains("D(int d);"));
    }

    #[test]
    fn test_line_comment_at_end_of_text() {
        assert_eq!(strip_comments("A(int a); // no newline").trim(), "A(int a);");
    }

    #[test]
    fn test_overloads_grouped_in_source_order() {
        let set = parse_signatures(
            "Foo(Rate rate);\nBar(int x);\nFoo(Rate rate, Period tenor = 0 * Days);",
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.entities().collect::<Vec<_>>(), vec!["Foo", "Bar"]);
        assert_eq!(
            set.overloads("Foo").unwrap(),
            &["Rate rate".to_string(), "Rate rate, Period tenor = 0 * Days".to_string()]
        );
    }

    #[test]
    fn test_qualifier_is_discarded() {
        let sig = parse_declaration("QuantLib::SwapRateHelper(Rate rate)").unwrap();
        assert_eq!(sig.entity, "SwapRateHelper");
        assert_eq!(sig.parameters, "Rate rate");
    }

    #[test]
    fn test_multiline_declaration() {
        let set = parse_signatures("OISRateHelper(Natural settlementDays,\n    const Period& tenor,\n    bool telescopicValueDates = false);");
        let overloads = set.overloads("OISRateHelper").unwrap();
        assert_eq!(overloads.len(), 1);
        assert!(overloads[0].starts_with("Natural settlementDays,"));
        assert!(overloads[0].ends_with("bool telescopicValueDates = false"));
    }

    #[test]
    fn test_noise_is_skipped() {
        let set = parse_signatures("stray text;\n  ;\nFoo(int a);");
        assert_eq!(set.entities().collect::<Vec<_>>(), vec!["Foo"]);
    }

    #[test]
    fn test_parentheses_inside_defaults_are_kept() {
        let sig = parse_declaration("Foo(Calendar c = NullCalendar(), Date d = Date())").unwrap();
        assert_eq!(sig.parameters, "Calendar c = NullCalendar(), Date d = Date()");
    }

    #[test]
    fn test_commented_out_overload_is_ignored() {
        let set = parse_signatures("Foo(int a);\n// Foo(int a, int b);\nFoo(double a);");
        assert_eq!(set.overloads("Foo").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_signatures("  \n// only a comment\n").is_empty());
    }
}
