//! Resolves `@borrows` requests: copies the source doclet under the
//! borrower, renamed and rescoped.

use crate::doclet::Scope;
use crate::index::DocletIndex;
use std::mem;

/// Resolve every pending borrow in the index. Each request clones every
/// doclet found at the source longname (overloads share one longname),
/// renames the clones under the borrower, and appends them. Requests whose
/// source is missing are skipped silently. Consuming the `borrowed` lists
/// makes a second run a no-op.
pub fn resolve_borrows(index: &mut DocletIndex) {
    let original_len = index.len();

    for i in 0..original_len {
        let (owner_longname, requests) = match index.get_mut(i) {
            Some(d) if !d.borrowed.is_empty() => {
                (d.longname.clone(), mem::take(&mut d.borrowed))
            }
            _ => continue,
        };

        for request in requests {
            let sources: Vec<usize> = index.lookup(&request.from).to_vec();

            let as_name = request.r#as.unwrap_or(request.from);
            // only a leading prototype. means "instance side"
            let as_name = match as_name.strip_prefix("prototype.") {
                Some(rest) => format!("#{}", rest),
                None => as_name,
            };
            let parts: Vec<&str> = as_name.split('#').collect();
            let scope = if parts.len() == 2 {
                Scope::Instance
            } else {
                Scope::Static
            };
            let name = parts.last().copied().unwrap_or("").to_string();
            let punc = if scope == Scope::Instance { '#' } else { '.' };

            for pos in sources {
                let Some(original) = index.get(pos) else {
                    continue;
                };
                let mut clone = original.duplicate();
                clone.scope = Some(scope);
                clone.name = name.clone();
                clone.memberof = Some(owner_longname.clone());
                clone.longname = format!("{}{}{}", owner_longname, punc, name);
                // a clone must not replay the source's own borrows
                clone.borrowed.clear();

                index.push(clone);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doclet::Doclet;

    fn doclet(longname: &str, name: &str) -> Doclet {
        Doclet {
            longname: longname.to_string(),
            name: name.to_string(),
            ..Doclet::default()
        }
    }

    fn sample_index() -> DocletIndex {
        let mut index = DocletIndex::new();
        let mut util = doclet("util", "util");
        util.borrow("util.trim", Some("trim".to_string()));
        index.push(util);
        let mut trim = doclet("util.trim", "trim");
        trim.description = Some("Remove whitespace.".to_string());
        index.push(trim);
        index
    }

    #[test]
    fn borrowed_member_is_appended_under_borrower() {
        let mut index = sample_index();
        resolve_borrows(&mut index);

        assert_eq!(index.len(), 3);
        let clone = index.get(2).unwrap();
        assert_eq!(clone.longname, "util.trim");
        assert_eq!(clone.name, "trim");
        assert_eq!(clone.memberof.as_deref(), Some("util"));
        assert_eq!(clone.scope, Some(Scope::Static));
        assert_eq!(clone.description.as_deref(), Some("Remove whitespace."));
    }

    #[test]
    fn prototype_alias_becomes_instance_member() {
        let mut index = DocletIndex::new();
        let mut klass = doclet("Str", "Str");
        klass.borrow("rtrim", Some("prototype.trimEnd".to_string()));
        index.push(klass);
        index.push(doclet("rtrim", "rtrim"));

        resolve_borrows(&mut index);

        let clone = index.get(2).unwrap();
        assert_eq!(clone.scope, Some(Scope::Instance));
        assert_eq!(clone.name, "trimEnd");
        assert_eq!(clone.longname, "Str#trimEnd");
    }

    #[test]
    fn every_doclet_at_the_source_longname_is_cloned() {
        let mut index = DocletIndex::new();
        let mut util = doclet("util", "util");
        util.borrow("trstr", Some("trim".to_string()));
        index.push(util);
        // two overloads documented under the same longname
        let mut first = doclet("trstr", "trstr");
        first.description = Some("Trim one string.".to_string());
        index.push(first);
        let mut second = doclet("trstr", "trstr");
        second.description = Some("Trim many strings.".to_string());
        index.push(second);

        resolve_borrows(&mut index);

        let clones: Vec<_> = index
            .iter()
            .filter(|d| d.longname == "util.trim")
            .collect();
        assert_eq!(clones.len(), 2);
        assert_eq!(clones[0].description.as_deref(), Some("Trim one string."));
        assert_eq!(clones[1].description.as_deref(), Some("Trim many strings."));
    }

    #[test]
    fn only_a_leading_prototype_is_rewritten() {
        let mut index = DocletIndex::new();
        let mut owner = doclet("store", "store");
        owner.borrow("getter", Some("a.prototype.b".to_string()));
        index.push(owner);
        index.push(doclet("getter", "getter"));

        resolve_borrows(&mut index);

        // prototype. in the middle of the alias is just part of the name
        let clone = index.get(2).unwrap();
        assert_eq!(clone.scope, Some(Scope::Static));
        assert_eq!(clone.name, "a.prototype.b");
        assert_eq!(clone.longname, "store.a.prototype.b");
    }

    #[test]
    fn multi_hash_alias_keeps_the_final_segment() {
        let mut index = DocletIndex::new();
        let mut owner = doclet("A", "A");
        owner.borrow("src", Some("x#y#z".to_string()));
        index.push(owner);
        index.push(doclet("src", "src"));

        resolve_borrows(&mut index);

        let clone = index.get(2).unwrap();
        assert_eq!(clone.name, "z");
        // only a clean two-segment split means instance
        assert_eq!(clone.scope, Some(Scope::Static));
    }

    #[test]
    fn missing_source_is_skipped_silently() {
        let mut index = DocletIndex::new();
        let mut d = doclet("A", "A");
        d.borrow("doesNotExist", None);
        index.push(d);

        resolve_borrows(&mut index);
        assert_eq!(index.len(), 1);
        assert!(index.get(0).unwrap().borrowed.is_empty());
    }

    #[test]
    fn resolving_twice_adds_nothing_more() {
        let mut index = sample_index();
        resolve_borrows(&mut index);
        let after_first = index.len();
        resolve_borrows(&mut index);
        assert_eq!(index.len(), after_first);
    }

    #[test]
    fn clone_does_not_carry_pending_borrows() {
        let mut index = DocletIndex::new();
        let mut a = doclet("A", "A");
        a.borrow("B.helper", None);
        index.push(a);
        let mut helper = doclet("B.helper", "helper");
        helper.borrow("C.other", None);
        index.push(helper);
        index.push(doclet("C.other", "other"));

        resolve_borrows(&mut index);
        // A gets its copy of helper, and that copy's own borrow list is
        // empty so a later pass cannot fan out again
        let clone = index.iter().find(|d| d.longname == "A.B.helper").unwrap();
        assert!(clone.borrowed.is_empty());
    }
}
