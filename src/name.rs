//! Symbol name manipulation — scope punctuation, longnames, splitting.
//!
//! A longname is `memberof` + scope punctuation + name, like `Foo#bar`,
//! `Foo.bar` or `Foo~bar`. Quoted segments are atomic: `Foo#"we#ird"` splits
//! into `Foo` and `"we#ird"`, never at the quoted `#`.

use crate::doclet::{Doclet, Scope};
use crate::dictionary::Dictionary;
use regex::Regex;
use std::sync::LazyLock;

/// Longname that represents global scope.
pub const GLOBAL_LONGNAME: &str = "<global>";

/// The characters that join an owner longname to a member name.
pub const SCOPE_PUNC: [char; 3] = ['#', '.', '~'];

pub fn scope_to_punc(scope: Scope) -> Option<char> {
    match scope {
        Scope::Instance => Some('#'),
        Scope::Static => Some('.'),
        Scope::Inner => Some('~'),
        Scope::Global => None,
    }
}

pub fn punc_to_scope(punc: char) -> Option<Scope> {
    match punc {
        '#' => Some(Scope::Instance),
        '.' => Some(Scope::Static),
        '~' => Some(Scope::Inner),
        _ => None,
    }
}

static RE_PROTOTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\.)prototype\.?").unwrap());

static RE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\[?["'].+?["']\]?)"#).unwrap());

// greedy first group, so the split lands on the LAST scope punctuation
static RE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(.+)([#.~]))?(.+?)$").unwrap());

static RE_VARIATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)\(([^)]+)\)$").unwrap());

// like: name, [name], name text, [name] text, name - text, or [name] - text
static RE_NAME_DESC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\[[^\]]+\]|\S+)((?:[ \t]*-\s*|\s+)(\S[\s\S]*))?$").unwrap()
});

static RE_NAMESPACED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+:.+$").unwrap());

/// Rewrite `Foo.prototype.bar` (and bare trailing `.prototype`) to the
/// instance punctuation form `Foo#bar`.
pub fn prototype_to_punc(name: &str) -> String {
    RE_PROTOTYPE.replace_all(name, "#").into_owned()
}

/// The parts of a longname: `a.b#c` has memberof `a.b`, scope `#`, name `c`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameParts {
    pub longname: String,
    pub memberof: String,
    pub scope: String,
    pub name: String,
    pub variation: Option<String>,
}

/// Split a longname into its memberof, scope punctuation, name and
/// variation. Quoted segments are treated as atomic.
pub fn shorten(longname: &str) -> NameParts {
    // quoted strings in a longname are atomic; replace them with tokens
    let mut tokens: Vec<String> = Vec::new();
    let tokenized = RE_QUOTED
        .replace_all(longname, |caps: &regex::Captures| {
            let mut quoted = caps[1].to_string();
            let mut dot = "";
            if quoted.starts_with('[') {
                dot = ".";
                quoted = quoted
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .to_string();
            }
            let token = format!("@{{{}}}@", tokens.len());
            tokens.push(quoted);
            format!("{}{}", dot, token) // foo["bar"] => foo.@{0}@
        })
        .into_owned();

    let tokenized = prototype_to_punc(&tokenized);

    let mut parts = NameParts {
        longname: tokenized.clone(),
        ..NameParts::default()
    };

    if let Some(caps) = RE_SPLIT.captures(&tokenized) {
        parts.memberof = caps.get(1).map_or(String::new(), |m| m.as_str().to_string());
        parts.scope = caps.get(2).map_or(String::new(), |m| m.as_str().to_string());
        parts.name = caps.get(3).map_or(String::new(), |m| m.as_str().to_string());
    } else {
        parts.name = tokenized.clone();
    }

    // like /** @name foo.bar(2) */
    if let Some(caps) = RE_VARIATION.captures(&parts.name.clone()) {
        parts.name = caps[1].to_string();
        parts.variation = Some(caps[2].to_string());
    }

    // restore quoted strings
    for (i, token_value) in tokens.iter().enumerate() {
        let token = format!("@{{{}}}@", i);
        parts.longname = parts.longname.replace(&token, token_value);
        parts.memberof = parts.memberof.replace(&token, token_value);
        parts.name = parts.name.replace(&token, token_value);
    }

    parts
}

/// Reassemble a longname from its parts.
pub fn combine(parts: &NameParts) -> String {
    let mut longname = format!("{}{}{}", parts.memberof, parts.scope, parts.name);
    if let Some(ref variation) = parts.variation {
        longname.push_str(&format!("({})", variation));
    }
    longname
}

/// Wrap a name in double quotes when it contains scope punctuation or
/// quotes, so that splitting the resulting longname stays unambiguous.
pub fn escaped_name(name: &str) -> String {
    if name.starts_with('"') && name.ends_with('"') && name.len() >= 2 {
        return name.to_string();
    }
    if name.contains(SCOPE_PUNC) || name.contains('"') {
        format!("\"{}\"", name)
    } else {
        name.to_string()
    }
}

/// Apply a namespace prefix to the name segment of a longname:
/// `applyNamespace("foo.bar", "event")` yields `foo.event:bar`.
pub fn apply_namespace(longname: &str, ns: &str) -> String {
    let parts = shorten(longname);

    if RE_NAMESPACED.is_match(&parts.name) {
        return parts.longname;
    }

    if let Some(stripped) = parts.longname.strip_suffix(parts.name.as_str()) {
        format!("{}{}:{}", stripped, ns, parts.name)
    } else {
        parts.longname
    }
}

/// Split a string that starts with a name and ends with a description.
/// Accepts `name`, `[name]`, `name text`, `[name] text`, `name - text`.
pub fn split_name_and_description(text: &str) -> (String, String) {
    if let Some(caps) = RE_NAME_DESC.captures(text) {
        let mut name = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let description = caps.get(3).map_or("", |m| m.as_str()).to_string();
        if name == "-" {
            // a bare dash is a placeholder for "no name"
            name.clear();
        }
        (name, description)
    } else {
        (String::new(), String::new())
    }
}

fn name_is_longname(name: &str, memberof: &str) -> bool {
    name.strip_prefix(memberof)
        .is_some_and(|rest| rest.starts_with(SCOPE_PUNC))
}

/// Resolve the `longname`, `memberof`, `scope` and `name` of a doclet from
/// whatever combination of those fields tag processing filled in.
pub fn resolve(doclet: &mut Doclet, dict: &Dictionary) {
    let mut about = NameParts::default();
    let mut memberof = doclet.memberof.clone().unwrap_or_default();
    let mut name = doclet.name.clone();

    // change MyClass.prototype.instanceMethod to MyClass#instanceMethod
    if !name.is_empty() && doclet.kind.is_some() {
        name = prototype_to_punc(&name);
    }
    doclet.name = name.clone();

    if !memberof.is_empty() {
        // @memberof tag (or inferred owner) given
        memberof = prototype_to_punc(&memberof);

        if !name.is_empty() && name_is_longname(&name, &memberof) && name != memberof {
            // the name is a complete longname, like @name foo.bar, @memberof foo
            about = shorten(&name);
        } else if !name.is_empty() && name == memberof && name.starts_with("module:") {
            about = shorten(&name);
        } else if !name.is_empty() && name == memberof {
            // identical name and memberof, like @name foo, @memberof foo
            let scope = doclet.scope.unwrap_or(Scope::Static);
            doclet.scope = Some(scope);
            let punc = scope_to_punc(scope).unwrap_or('.');
            about = shorten(&format!("{}{}{}", memberof, punc, name));
        } else if !name.is_empty() && memberof.ends_with(SCOPE_PUNC) {
            // like @memberof foo# or @memberof foo~
            about = shorten(&format!("{}{}", memberof, name));
        } else if !name.is_empty() {
            if let Some(punc) = doclet.scope.and_then(scope_to_punc) {
                about = shorten(&format!("{}{}{}", memberof, punc, escaped_name(&name)));
            }
        }
    } else {
        // no @memberof
        about = shorten(&name);
    }

    if !about.name.is_empty() {
        doclet.name = about.name.clone();
    }
    if !about.memberof.is_empty() {
        doclet.set_memberof(&about.memberof);
    }
    if !about.longname.is_empty() && (doclet.longname.is_empty() || doclet.longname == doclet.name)
    {
        doclet.set_longname(about.longname.clone(), dict);
    }

    if doclet.scope == Some(Scope::Global) {
        // via @global tag
        doclet.set_longname(doclet.name.clone(), dict);
        doclet.memberof = None;
    } else if !about.scope.is_empty() {
        if about.memberof == GLOBAL_LONGNAME {
            doclet.scope = Some(Scope::Global);
        } else if let Some(scope) = about.scope.chars().next().and_then(punc_to_scope) {
            doclet.scope = Some(scope);
        }
    } else if !doclet.name.is_empty() && doclet.memberof.is_some() && doclet.longname.is_empty() {
        let leading = doclet.name.chars().next();
        if let Some(scope) = leading.and_then(punc_to_scope) {
            doclet.scope = Some(scope);
            doclet.name = doclet.name[1..].to_string();
        } else {
            doclet.scope = Some(Scope::Static);
        }
        let punc = doclet.scope.and_then(scope_to_punc).unwrap_or('.');
        let longname = format!(
            "{}{}{}",
            doclet.memberof.as_deref().unwrap_or(""),
            punc,
            doclet.name
        );
        doclet.set_longname(longname, dict);
    }

    if about.variation.is_some() {
        doclet.variation = about.variation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prototype_rewrite() {
        assert_eq!(prototype_to_punc("Foo.prototype.bar"), "Foo#bar");
        assert_eq!(prototype_to_punc("Foo.prototype"), "Foo#");
        assert_eq!(prototype_to_punc("plain.name"), "plain.name");
    }

    #[test]
    fn shorten_instance_member() {
        let parts = shorten("a.b#c");
        assert_eq!(parts.memberof, "a.b");
        assert_eq!(parts.scope, "#");
        assert_eq!(parts.name, "c");
    }

    #[test]
    fn shorten_static_member_splits_at_last_punc() {
        let parts = shorten("ns.Klass.member");
        assert_eq!(parts.memberof, "ns.Klass");
        assert_eq!(parts.scope, ".");
        assert_eq!(parts.name, "member");
    }

    #[test]
    fn shorten_global_name() {
        let parts = shorten("justAName");
        assert_eq!(parts.memberof, "");
        assert_eq!(parts.scope, "");
        assert_eq!(parts.name, "justAName");
    }

    #[test]
    fn shorten_quoted_segment_is_atomic() {
        let parts = shorten(r#"Foo#"we#ird""#);
        assert_eq!(parts.memberof, "Foo");
        assert_eq!(parts.scope, "#");
        assert_eq!(parts.name, r#""we#ird""#);
    }

    #[test]
    fn shorten_variation() {
        let parts = shorten("a.b#c(2)");
        assert_eq!(parts.name, "c");
        assert_eq!(parts.variation.as_deref(), Some("2"));
    }

    #[test]
    fn roundtrip_through_combine() {
        for longname in ["owner#member", "owner.member", "owner~member"] {
            let parts = shorten(longname);
            assert_eq!(combine(&parts), longname);
        }
    }

    #[test]
    fn namespace_applied_to_name_segment() {
        assert_eq!(apply_namespace("foo.bar", "event"), "foo.event:bar");
        // already namespaced: no change
        assert_eq!(apply_namespace("foo.event:bar", "event"), "foo.event:bar");
    }

    #[test]
    fn split_name_description() {
        assert_eq!(
            split_name_and_description("foo the foo"),
            ("foo".to_string(), "the foo".to_string())
        );
        assert_eq!(
            split_name_and_description("foo - the foo"),
            ("foo".to_string(), "the foo".to_string())
        );
        assert_eq!(
            split_name_and_description("[foo] the foo"),
            ("[foo]".to_string(), "the foo".to_string())
        );
        assert_eq!(
            split_name_and_description("foo"),
            ("foo".to_string(), String::new())
        );
    }

    #[test]
    fn escaping_names_with_punctuation() {
        assert_eq!(escaped_name("simple"), "simple");
        assert_eq!(escaped_name("has#punc"), "\"has#punc\"");
        assert_eq!(escaped_name("\"already\""), "\"already\"");
    }
}
