//! The tag dictionary: definitions, synonyms and namespace lookups.

use crate::doclet::Doclet;
use crate::tag::Tag;
use std::collections::HashMap;

/// Hook run when a tag is applied to a doclet.
pub type OnTagged = fn(&mut Doclet, &Tag);

/// Hook run on raw tag text before parsing.
pub type OnTagText = fn(&str) -> String;

/// How a single tag behaves: what its text may contain and how it mutates
/// the doclet it is attached to.
#[derive(Debug, Clone, Default)]
pub struct TagDefinition {
    /// Tag text must be non-empty.
    pub must_have_value: bool,
    /// Tag text must be empty.
    pub must_not_have_value: bool,
    /// Tag text must not include a description after the name.
    pub must_not_have_description: bool,
    /// Tag text may start with a `{type}` expression.
    pub can_have_type: bool,
    /// Tag text may include a symbol name.
    pub can_have_name: bool,
    /// Leading whitespace in the tag text is significant, as in `@example`.
    pub keeps_whitespace: bool,
    /// Longnames under this tag's kind get a namespace prefix, like
    /// `module:` or `event:`.
    pub is_namespace: bool,
    pub on_tag_text: Option<OnTagText>,
    pub on_tagged: Option<OnTagged>,
}

/// Maps tag titles to definitions and synonyms to canonical titles.
/// Lookups are case-insensitive; later definitions for the same title
/// replace earlier ones.
#[derive(Default)]
pub struct Dictionary {
    definitions: HashMap<String, TagDefinition>,
    synonyms: HashMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag. Re-defining an existing title replaces it.
    pub fn define_tag(&mut self, title: &str, def: TagDefinition) {
        self.definitions.insert(title.to_lowercase(), def);
    }

    /// Register an alternate spelling for an already-defined tag. Synonyms
    /// are additive: defining one never removes earlier ones.
    pub fn define_synonym(&mut self, title: &str, synonym: &str) {
        self.synonyms
            .insert(synonym.to_lowercase(), title.to_lowercase());
    }

    /// Canonical form of a tag title: lowercased, with synonyms replaced.
    /// Idempotent, and safe to call on unknown titles.
    pub fn normalize(&self, title: &str) -> String {
        let lower = title.to_lowercase();
        match self.synonyms.get(&lower) {
            Some(canonical) => canonical.clone(),
            None => lower,
        }
    }

    /// Look up the definition for a (possibly non-canonical) title.
    pub fn lookup(&self, title: &str) -> Option<&TagDefinition> {
        self.definitions.get(&self.normalize(title))
    }

    pub fn is_defined(&self, title: &str) -> bool {
        self.lookup(title).is_some()
    }

    /// Whether a kind gets namespace-prefixed longnames, like `module:foo`.
    pub fn is_namespace(&self, kind: &str) -> bool {
        self.lookup(kind).is_some_and(|def| def.is_namespace)
    }
}
