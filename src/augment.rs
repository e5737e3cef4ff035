//! Copies members down the augmentation graph: interfaces into their
//! implementers, base classes into subclasses, mixins into their hosts.
//!
//! Each pass walks symbols in dependency order (ancestors first), so a
//! member picked up from an interface is already in place when a subclass
//! inherits it. The passes run in a fixed order: implemented, inherited,
//! mixed in.

use crate::diag::Diagnostics;
use crate::doclet::{Doclet, Scope};
use crate::index::DocletIndex;
use crate::name;
use std::collections::{HashMap, HashSet};

/// Kinds that participate in the augmentation graph.
const GRAPH_KINDS: [&str; 4] = ["class", "external", "interface", "mixin"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Relation {
    Implements,
    Augments,
    Mixes,
}

impl Relation {
    /// Which member scopes are copied across this relation. Inheritance
    /// and implementation move instance members only; statics belong to
    /// the symbol that declares them.
    fn member_scopes(self) -> &'static [Scope] {
        match self {
            Relation::Implements => &[Scope::Instance],
            Relation::Augments => &[Scope::Instance],
            Relation::Mixes => &[Scope::Static],
        }
    }

    fn sources(self, doclet: &Doclet) -> &[String] {
        match self {
            Relation::Implements => &doclet.implements_,
            Relation::Augments => &doclet.augments,
            Relation::Mixes => &doclet.mixes,
        }
    }
}

/// Run the three augmentation passes in their fixed order.
pub fn augment_all(index: &mut DocletIndex, diags: &mut Diagnostics) {
    add_implemented(index, diags);
    add_inherited(index, diags);
    add_mixed_in(index, diags);
}

/// Copy interface members into the classes that implement them.
pub fn add_implemented(index: &mut DocletIndex, diags: &mut Diagnostics) {
    augment(index, Relation::Implements, diags);
}

/// Copy base-class members into subclasses.
pub fn add_inherited(index: &mut DocletIndex, diags: &mut Diagnostics) {
    augment(index, Relation::Augments, diags);
}

/// Copy mixin members into their hosts.
pub fn add_mixed_in(index: &mut DocletIndex, diags: &mut Diagnostics) {
    augment(index, Relation::Mixes, diags);
}

/// Longname -> ancestor longnames, for every documented symbol of a graph
/// kind. Symbols without ancestors still appear, as sort nodes.
fn map_dependencies(index: &DocletIndex, relation: Relation) -> HashMap<String, Vec<String>> {
    let mut deps: HashMap<String, Vec<String>> = HashMap::new();
    for doclet in index.iter() {
        if doclet.undocumented || doclet.ignore || doclet.longname.is_empty() {
            continue;
        }
        let kind = doclet.kind.as_deref().unwrap_or("");
        if !GRAPH_KINDS.contains(&kind) {
            continue;
        }
        let entry = deps.entry(doclet.longname.clone()).or_default();
        for source in relation.sources(doclet) {
            if !entry.contains(source) {
                entry.push(source.clone());
            }
        }
    }
    deps
}

/// Depth-first topological sort, ancestors before dependents. A symbol
/// reached while it is still on the in-progress chain closes a cycle; it
/// contributes nothing and draws a warning.
fn sort_dependencies(
    deps: &HashMap<String, Vec<String>>,
    diags: &mut Diagnostics,
) -> Vec<String> {
    fn visit(
        name: &str,
        deps: &HashMap<String, Vec<String>>,
        visited: &mut HashSet<String>,
        in_progress: &mut Vec<String>,
        order: &mut Vec<String>,
        diags: &mut Diagnostics,
    ) {
        if visited.contains(name) {
            return;
        }
        if in_progress.iter().any(|n| n == name) {
            diags.warning(
                format!(
                    "Circular reference: {} is its own ancestor ({} -> {}).",
                    name,
                    in_progress.join(" -> "),
                    name
                ),
                None,
            );
            return;
        }
        in_progress.push(name.to_string());
        if let Some(ancestors) = deps.get(name) {
            for ancestor in ancestors {
                visit(ancestor, deps, visited, in_progress, order, diags);
            }
        }
        in_progress.pop();
        visited.insert(name.to_string());
        order.push(name.to_string());
    }

    let mut names: Vec<&String> = deps.keys().collect();
    names.sort(); // deterministic walk order
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    for name in names {
        visit(name, deps, &mut visited, &mut Vec::new(), &mut order, diags);
    }
    order
}

/// Documented, non-ignored members of a symbol, restricted to the scopes
/// a relation copies.
fn member_positions(index: &DocletIndex, longname: &str, scopes: &[Scope]) -> Vec<usize> {
    index
        .iter()
        .enumerate()
        .filter(|(_, d)| {
            d.memberof.as_deref() == Some(longname)
                && !d.undocumented
                && !d.ignore
                && !d.name.is_empty()
                && d.scope.is_some_and(|s| scopes.contains(&s))
        })
        .map(|(i, _)| i)
        .collect()
}

fn kind_of(index: &DocletIndex, longname: &str) -> Option<String> {
    index
        .lookup_documented(longname)
        .first()
        .and_then(|&i| index.get(i))
        .and_then(|d| d.kind.clone())
}

fn augment(index: &mut DocletIndex, relation: Relation, diags: &mut Diagnostics) {
    let deps = map_dependencies(index, relation);
    let order = sort_dependencies(&deps, diags);

    for child in &order {
        let ancestors = match deps.get(child) {
            Some(ancestors) if !ancestors.is_empty() => ancestors.clone(),
            _ => continue,
        };
        let child_kind = kind_of(index, child);

        for ancestor in ancestors {
            let members = member_positions(index, &ancestor, relation.member_scopes());
            for pos in members {
                let Some(original) = index.get(pos) else { continue };
                let member_longname = original.longname.clone();
                let mut clone = original.duplicate();

                clone.memberof = Some(child.clone());
                if relation == Relation::Mixes && child_kind.as_deref() == Some("class") {
                    // mixin members land on the instance side of a class
                    clone.scope = Some(Scope::Instance);
                }
                let punc = clone
                    .scope
                    .and_then(name::scope_to_punc)
                    .unwrap_or('.');
                clone.longname = format!("{}{}{}", child, punc, clone.name);

                match relation {
                    Relation::Implements => {
                        clone.implements_ = vec![member_longname.clone()];
                        // the implementation of an abstract member is concrete
                        clone.virtual_ = false;
                    }
                    Relation::Augments => {
                        // an already-inherited member keeps pointing at the
                        // ancestor that originally defined it
                        if !clone.inherited {
                            clone.inherits = Some(member_longname.clone());
                        }
                        clone.inherited = true;
                    }
                    Relation::Mixes => {
                        clone.mixed = true;
                    }
                }

                let own: Vec<usize> = index
                    .lookup_documented(&clone.longname)
                    .into_iter()
                    .filter(|&i| i != pos)
                    .collect();

                if own.is_empty() {
                    index.push(clone);
                    continue;
                }

                let explicit_inherit = own.iter().all(|&i| {
                    index
                        .get(i)
                        .map(|d| d.inheritdoc || d.override_)
                        .unwrap_or(false)
                });

                if explicit_inherit {
                    // @inheritdoc / @override: the ancestor's docs replace
                    // the descendant's own
                    for &i in &own {
                        if let Some(d) = index.get_mut(i) {
                            d.ignore = true;
                        }
                    }
                    clone.virtual_ = false;
                    clone.inheritdoc = false;
                    clone.override_ = false;
                    if relation == Relation::Augments {
                        clone.overrides = Some(member_longname.clone());
                    }
                    index.push(clone);
                } else {
                    // the descendant's own docs win; keep the bookkeeping
                    for &i in &own {
                        if let Some(d) = index.get_mut(i) {
                            match relation {
                                Relation::Implements => {
                                    if !d.implements_.contains(&member_longname) {
                                        d.implements_.push(member_longname.clone());
                                    }
                                }
                                Relation::Augments => {
                                    d.overrides = Some(member_longname.clone());
                                }
                                Relation::Mixes => {}
                            }
                        }
                    }
                }
            }
        }
    }
}
