//! Append-only store of doclets with a longname lookup table.

use crate::doclet::Doclet;
use serde::Serialize;
use std::collections::HashMap;

/// Doclets in discovery order plus a longname index. Several doclets can
/// share a longname, so the index maps to position lists.
#[derive(Default, Serialize)]
pub struct DocletIndex {
    doclets: Vec<Doclet>,
    #[serde(skip)]
    by_longname: HashMap<String, Vec<usize>>,
}

impl DocletIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, doclet: Doclet) {
        let i = self.doclets.len();
        if !doclet.longname.is_empty() {
            self.by_longname
                .entry(doclet.longname.clone())
                .or_default()
                .push(i);
        }
        self.doclets.push(doclet);
    }

    pub fn len(&self) -> usize {
        self.doclets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doclets.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Doclet> {
        self.doclets.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut Doclet> {
        self.doclets.get_mut(i)
    }

    /// Positions of all doclets with this longname, in discovery order.
    pub fn lookup(&self, longname: &str) -> &[usize] {
        self.by_longname
            .get(longname)
            .map_or(&[], |v| v.as_slice())
    }

    /// Positions of documented doclets with this longname. Augmentation
    /// only copies members that are documented and not ignored.
    pub fn lookup_documented(&self, longname: &str) -> Vec<usize> {
        self.lookup(longname)
            .iter()
            .copied()
            .filter(|&i| !self.doclets[i].undocumented && !self.doclets[i].ignore)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Doclet> {
        self.doclets.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Doclet> {
        self.doclets.iter_mut()
    }

    pub fn doclets(&self) -> &[Doclet] {
        &self.doclets
    }

    /// Rebuild the longname table. Needed after a pass that rewrites
    /// longnames in place.
    pub fn reindex(&mut self) {
        self.by_longname.clear();
        for (i, doclet) in self.doclets.iter().enumerate() {
            if !doclet.longname.is_empty() {
                self.by_longname
                    .entry(doclet.longname.clone())
                    .or_default()
                    .push(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doclet(longname: &str) -> Doclet {
        Doclet {
            longname: longname.to_string(),
            ..Doclet::default()
        }
    }

    #[test]
    fn push_and_lookup() {
        let mut index = DocletIndex::new();
        index.push(doclet("Foo"));
        index.push(doclet("Foo#bar"));
        index.push(doclet("Foo"));

        assert_eq!(index.lookup("Foo"), &[0, 2]);
        assert_eq!(index.lookup("Foo#bar"), &[1]);
        assert!(index.lookup("missing").is_empty());
    }

    #[test]
    fn reindex_after_rename() {
        let mut index = DocletIndex::new();
        index.push(doclet("old"));
        index.get_mut(0).unwrap().longname = "new".to_string();

        assert_eq!(index.lookup("old"), &[0]); // stale until reindex
        index.reindex();
        assert!(index.lookup("old").is_empty());
        assert_eq!(index.lookup("new"), &[0]);
    }

    #[test]
    fn documented_view_filters_undocumented_and_ignored() {
        let mut index = DocletIndex::new();
        index.push(doclet("X"));
        let mut und = doclet("X");
        und.undocumented = true;
        index.push(und);
        let mut ign = doclet("X");
        ign.ignore = true;
        index.push(ign);

        assert_eq!(index.lookup("X"), &[0, 1, 2]);
        assert_eq!(index.lookup_documented("X"), vec![0]);
    }
}
