//! A single `@tag` pulled out of a comment, with its parsed value and the
//! validation rules from the dictionary applied.

use crate::config::Config;
use crate::diag::Diagnostics;
use crate::dictionary::{Dictionary, TagDefinition};
use crate::doclet::Meta;
use crate::typeexpr::{self, TagInfo};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Info(TagInfo),
}

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    /// The title exactly as written in the comment.
    #[serde(rename = "originalTitle")]
    pub original_title: String,
    /// The canonical title after lowercasing and synonym replacement.
    pub title: String,
    /// The raw text after the title, trimmed.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// The parsed value, when the tag has text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TagValue>,
}

impl Tag {
    /// Build a tag from its raw title and text. The title is normalized
    /// through the dictionary; text runs through the tag's `on_tag_text`
    /// hook before parsing.
    pub fn new(title: &str, text: &str, dict: &Dictionary) -> Tag {
        let canonical = dict.normalize(title.trim());
        let def = dict.lookup(&canonical);

        // @example and friends keep their leading indentation
        let keeps_whitespace = def.is_some_and(|d| d.keeps_whitespace);
        let mut text = if keeps_whitespace {
            text.trim_end().to_string()
        } else {
            text.trim().to_string()
        };
        if let Some(hook) = def.and_then(|d| d.on_tag_text) {
            text = hook(&text);
        }

        let value = if text.is_empty() {
            None
        } else {
            match def {
                Some(d) if d.can_have_type || d.can_have_name => Some(TagValue::Info(
                    typeexpr::parse(&text, d.can_have_name, d.can_have_type),
                )),
                _ => Some(TagValue::Text(text.clone())),
            }
        };

        Tag {
            original_title: title.trim().to_string(),
            title: canonical,
            text,
            value,
        }
    }

    pub fn info(&self) -> Option<&TagInfo> {
        match self.value {
            Some(TagValue::Info(ref info)) => Some(info),
            _ => None,
        }
    }
}

/// Check a tag against its definition. Unknown tags are errors unless the
/// configuration allows them; the remaining rules come from the definition
/// flags. A `must_not_have_value` violation is a warning and the value is
/// kept as written.
pub fn validate(
    tag: &Tag,
    def: Option<&TagDefinition>,
    config: &Config,
    meta: Option<&Meta>,
    diags: &mut Diagnostics,
) {
    let def = match def {
        Some(def) => def,
        None => {
            if !config.allow_unknown_tags.allows(&tag.title) {
                diags.error(format!("The @{} tag is not a known tag.", tag.original_title), meta);
            }
            return;
        }
    };

    if def.must_have_value && tag.text.is_empty() {
        diags.error(
            format!("The @{} tag requires a value.", tag.original_title),
            meta,
        );
    }
    if def.must_not_have_value && !tag.text.is_empty() {
        diags.warning(
            format!(
                "The @{} tag does not permit a value; the value will be ignored.",
                tag.original_title
            ),
            meta,
        );
    }
    if def.must_not_have_description {
        if let Some(info) = tag.info() {
            if !info.text.is_empty() {
                diags.warning(
                    format!(
                        "The @{} tag does not permit a description; the description will be ignored.",
                        tag.original_title
                    ),
                    meta,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllowUnknownTags;
    use crate::dictionary::TagDefinition;

    fn dict() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.define_tag(
            "param",
            TagDefinition {
                can_have_type: true,
                can_have_name: true,
                must_have_value: true,
                ..TagDefinition::default()
            },
        );
        dict.define_tag(
            "ignore",
            TagDefinition {
                must_not_have_value: true,
                ..TagDefinition::default()
            },
        );
        dict.define_tag(
            "type",
            TagDefinition {
                can_have_type: true,
                must_have_value: true,
                must_not_have_description: true,
                ..TagDefinition::default()
            },
        );
        dict.define_synonym("param", "arg");
        dict
    }

    #[test]
    fn title_normalized_original_kept() {
        let tag = Tag::new("Arg", "{string} foo", &dict());
        assert_eq!(tag.title, "param");
        assert_eq!(tag.original_title, "Arg");
    }

    #[test]
    fn value_parsed_when_tag_takes_type_and_name() {
        let d = dict();
        let tag = Tag::new("param", "{number} count how many", &d);
        let info = tag.info().unwrap();
        assert_eq!(info.r#type.names, vec!["number"]);
        assert_eq!(info.name, "count");
        assert_eq!(info.text, "how many");
    }

    #[test]
    fn unknown_tag_is_error_unless_allowed() {
        let d = dict();
        let tag = Tag::new("madeup", "stuff", &d);

        let mut diags = Diagnostics::default();
        validate(&tag, d.lookup("madeup"), &Config::default(), None, &mut diags);
        assert!(diags.has_errors());

        let mut config = Config::default();
        config.allow_unknown_tags = AllowUnknownTags::Bool(true);
        let mut diags = Diagnostics::default();
        validate(&tag, d.lookup("madeup"), &config, None, &mut diags);
        assert!(!diags.has_errors());

        let mut config = Config::default();
        config.allow_unknown_tags = AllowUnknownTags::List(vec!["madeup".to_string()]);
        let mut diags = Diagnostics::default();
        validate(&tag, d.lookup("madeup"), &config, None, &mut diags);
        assert!(!diags.has_errors());
    }

    #[test]
    fn missing_value_is_error() {
        let d = dict();
        let tag = Tag::new("param", "", &d);
        let mut diags = Diagnostics::default();
        validate(&tag, d.lookup("param"), &Config::default(), None, &mut diags);
        assert!(diags.has_errors());
    }

    #[test]
    fn forbidden_value_is_warning_and_kept() {
        let d = dict();
        let tag = Tag::new("ignore", "should not be here", &d);
        let mut diags = Diagnostics::default();
        validate(&tag, d.lookup("ignore"), &Config::default(), None, &mut diags);
        assert!(!diags.has_errors());
        assert_eq!(diags.len(), 1);
        // the value stays on the tag even though it drew a warning
        assert_eq!(tag.text, "should not be here");
    }

    #[test]
    fn forbidden_description_is_warning() {
        let d = dict();
        let tag = Tag::new("type", "{string} trailing words", &d);
        let mut diags = Diagnostics::default();
        validate(&tag, d.lookup("type"), &Config::default(), None, &mut diags);
        assert!(!diags.has_errors());
        assert_eq!(diags.len(), 1);
    }
}
