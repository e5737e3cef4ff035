//! The doclet: one documented symbol, assembled from a comment's tags.

use crate::config::Config;
use crate::diag::Diagnostics;
use crate::dictionary::Dictionary;
use crate::doop::{doop_map, DocValue};
use crate::name;
use crate::tag::Tag;
use crate::typeexpr::{TagInfo, TypeExpression};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Where a symbol lives relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Static,
    Instance,
    Inner,
}

impl Scope {
    pub fn from_str(s: &str) -> Option<Scope> {
        match s {
            "global" => Some(Scope::Global),
            "static" => Some(Scope::Static),
            "instance" => Some(Scope::Instance),
            "inner" => Some(Scope::Inner),
            _ => None,
        }
    }
}

/// Source location of the comment a doclet came from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meta {
    pub filename: String,
    pub lineno: usize,
}

/// One `@borrows A as B` request, resolved later by the borrow pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Borrowed {
    pub from: String,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub r#as: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A documented symbol. Field names follow the JSON output shape.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Doclet {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub longname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memberof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<TypeExpression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TagInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<TagInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<TagInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<TagInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub augments: Vec<String>,
    #[serde(rename = "implements", skip_serializing_if = "Vec::is_empty")]
    pub implements_: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mixes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub borrowed: Vec<Borrowed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub this: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<String>,
    #[serde(rename = "virtual", skip_serializing_if = "is_false")]
    pub virtual_: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub ignore: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub undocumented: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub inheritdoc: bool,
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub override_: bool,
    /// Set on clones copied down from an ancestor.
    #[serde(skip_serializing_if = "is_false")]
    pub inherited: bool,
    /// Longname of the ancestor member a clone was copied from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    /// Longname of the member this one replaces in the ancestor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
    /// Set on members copied in from a mixin.
    #[serde(skip_serializing_if = "is_false")]
    pub mixed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see: Vec<String>,
    /// Tags that were unknown but allowed by configuration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Dynamic data attached by plugins. May contain shared, even cyclic,
    /// values; cloned through `doop`.
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, DocValue>,
}

static RE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*@(\S+)").unwrap());

/// Strip the comment delimiters and the left margin of stars:
/// `/** text\n * more */` becomes `text\nmore`.
pub fn unwrap_comment(comment: &str) -> String {
    let trimmed = comment.trim();
    let inner = trimmed
        .strip_prefix("/**")
        .or_else(|| trimmed.strip_prefix("/*"))
        .unwrap_or(trimmed);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    inner
        .lines()
        .map(|line| {
            let stripped = line.trim_start();
            match stripped.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => stripped,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Split unwrapped comment text into (title, text) tag pairs. Untagged
/// leading text becomes an implicit `description`. A tag's text runs until
/// the next line that starts with `@`.
pub fn split_tags(unwrapped: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;
    let mut leading: Vec<String> = Vec::new();

    for line in unwrapped.lines() {
        if let Some(caps) = RE_TAG_LINE.captures(line) {
            if let Some((title, lines)) = current.take() {
                pairs.push((title, lines.join("\n")));
            }
            let title = caps[1].to_string();
            let end = caps.get(0).map_or(line.len(), |m| m.end());
            let after = line[end..].to_string();
            current = Some((title, vec![after]));
        } else {
            match current {
                Some((_, ref mut lines)) => lines.push(line.to_string()),
                None => leading.push(line.to_string()),
            }
        }
    }
    if let Some((title, lines)) = current.take() {
        pairs.push((title, lines.join("\n")));
    }

    let leading = leading.join("\n");
    if !leading.trim().is_empty() {
        pairs.insert(0, ("description".to_string(), leading));
    }
    pairs
}

impl Doclet {
    /// Build a doclet from a raw comment: unwrap, split into tags, apply
    /// each through the dictionary, then resolve names.
    pub fn from_comment(
        comment: &str,
        meta: Option<Meta>,
        dict: &Dictionary,
        config: &Config,
        diags: &mut Diagnostics,
    ) -> Doclet {
        let mut doclet = Doclet {
            comment: comment.to_string(),
            meta,
            ..Doclet::default()
        };
        for (title, text) in split_tags(&unwrap_comment(comment)) {
            doclet.add_tag(&title, &text, dict, config, diags);
        }
        doclet.post_process(dict);
        doclet
    }

    /// Parse and validate one tag, then let its definition mutate this
    /// doclet. Unknown tags that the configuration allows are retained in
    /// `tags`.
    pub fn add_tag(
        &mut self,
        title: &str,
        text: &str,
        dict: &Dictionary,
        config: &Config,
        diags: &mut Diagnostics,
    ) {
        let tag = Tag::new(title, text, dict);
        let def = dict.lookup(&tag.title);
        crate::tag::validate(&tag, def, config, self.meta.as_ref(), diags);

        match def {
            Some(def) => {
                if let Some(hook) = def.on_tagged {
                    hook(self, &tag);
                }
            }
            None => {
                if config.allow_unknown_tags.allows(&tag.title) {
                    self.tags.push(tag);
                }
            }
        }
    }

    /// Resolve `longname`, `memberof` and `scope` from whatever the tags
    /// filled in, and fill the gaps that resolution leaves.
    pub fn post_process(&mut self, dict: &Dictionary) {
        name::resolve(self, dict);

        if self.longname.is_empty() && !self.name.is_empty() {
            self.set_longname(self.name.clone(), dict);
        }
        if self.memberof.is_none() && !self.longname.is_empty() && self.longname != self.name {
            let parts = name::shorten(&self.longname);
            if !parts.memberof.is_empty() {
                self.memberof = Some(parts.memberof);
            }
        }
    }

    pub fn set_memberof(&mut self, owner: &str) {
        let owner = owner
            .strip_prefix(&format!("{}.", name::GLOBAL_LONGNAME))
            .unwrap_or(owner);
        self.memberof = Some(owner.to_string());
    }

    /// Set the longname, applying the namespace prefix when this doclet's
    /// kind calls for one (like `module:` or `event:`).
    pub fn set_longname(&mut self, longname: String, dict: &Dictionary) {
        let longname = longname
            .strip_prefix(&format!("{}.", name::GLOBAL_LONGNAME))
            .unwrap_or(&longname)
            .to_string();
        self.longname = match self.kind.as_deref() {
            Some(kind) if dict.is_namespace(kind) => name::apply_namespace(&longname, kind),
            _ => longname,
        };
    }

    /// Record a `@borrows` request for the borrow pass.
    pub fn borrow(&mut self, from: &str, r#as: Option<String>) {
        self.borrowed.push(Borrowed {
            from: from.to_string(),
            r#as,
        });
    }

    pub fn augment(&mut self, base: &str) {
        self.augments.push(base.to_string());
    }

    pub fn mix(&mut self, source: &str) {
        self.mixes.push(source.to_string());
    }

    pub fn implement(&mut self, interface: &str) {
        self.implements_.push(interface.to_string());
    }

    /// Deep copy. Plain fields clone normally; `extra` goes through `doop`
    /// so shared and cyclic plugin data cannot alias the original.
    pub fn duplicate(&self) -> Doclet {
        let mut copy = self.clone();
        copy.extra = doop_map(&self.extra);
        copy
    }
}
