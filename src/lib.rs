//! tagdoc resolves `@tag` doc comments into doclets: one record per
//! documented symbol, with longnames, borrowed members and inheritance
//! resolved.
//!
//! The pipeline: scan source for `/** ... */` blocks, parse each comment's
//! tags through the [`dictionary::Dictionary`], resolve names, then run the
//! two whole-index passes ([`borrow::resolve_borrows`] and
//! [`augment::augment_all`]).

pub mod augment;
pub mod borrow;
pub mod config;
pub mod definitions;
pub mod diag;
pub mod dictionary;
pub mod doclet;
pub mod doop;
pub mod error;
pub mod event;
pub mod index;
pub mod name;
pub mod scan;
pub mod tag;
pub mod typeexpr;

pub use config::Config;
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use dictionary::Dictionary;
pub use doclet::{Doclet, Meta, Scope};
pub use error::{Error, Result};
pub use event::{Event, EventBus, EventData, EventKind};
pub use index::DocletIndex;

/// A dictionary with the core tag set registered, honoring the configured
/// dictionary list.
pub fn core_dictionary(config: &Config) -> Dictionary {
    let mut dict = Dictionary::new();
    for module in &config.dictionaries {
        if module == "core" {
            definitions::define_tags(&mut dict);
        }
    }
    dict
}
