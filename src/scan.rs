//! Line scanner: pulls `/** ... */` blocks out of source text, pairs each
//! with the declaration that follows it, and drives the event lifecycle.
//!
//! This is a deliberately small stand-in for a real syntax tree: a handful
//! of declaration shapes are recognized by regex, enough to name the
//! symbol a comment documents.

use crate::config::Config;
use crate::diag::Diagnostics;
use crate::dictionary::Dictionary;
use crate::doclet::{Doclet, Meta};
use crate::error::Result;
use crate::event::{Event, EventBus, EventData};
use crate::name;
use regex::Regex;
use std::sync::LazyLock;

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?class\s+([A-Za-z_$][\w$]*)").unwrap()
});

static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)").unwrap()
});

static RE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)").unwrap()
});

static RE_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_$][\w$.]*)\s*=").unwrap());

static RE_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:async\s+)?(?:static\s+)?\*?\s*([A-Za-z_$][\w$]*)\s*\(").unwrap()
});

static RE_ALSO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*@also\s*$").unwrap());

/// One doc comment and the symbol name guessed from the line after it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentBlock {
    pub comment: String,
    pub lineno: usize,
    pub code_name: Option<String>,
}

/// Guess the name a declaration line defines.
fn guess_code_name(line: &str) -> Option<String> {
    for re in [&*RE_CLASS, &*RE_FUNCTION, &*RE_VAR, &*RE_ASSIGNMENT, &*RE_METHOD] {
        if let Some(caps) = re.captures(line) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Extract every `/** ... */` block, with its starting line number and the
/// name guessed from the first code line after it. Plain `/* ... */`
/// comments are skipped.
pub fn extract_blocks(source: &str) -> Vec<CommentBlock> {
    let mut blocks: Vec<CommentBlock> = Vec::new();
    let mut current: Option<(usize, Vec<String>)> = None;
    // index into blocks still waiting for their declaration line
    let mut pending: Option<usize> = None;

    for (i, line) in source.lines().enumerate() {
        let lineno = i + 1;
        let trimmed = line.trim_start();

        match current {
            Some((start, ref mut lines)) => {
                lines.push(line.to_string());
                if trimmed.ends_with("*/") {
                    blocks.push(CommentBlock {
                        comment: lines.join("\n"),
                        lineno: start,
                        code_name: None,
                    });
                    pending = Some(blocks.len() - 1);
                    current = None;
                }
            }
            None => {
                if trimmed.starts_with("/**") && !trimmed.starts_with("/***") {
                    if trimmed.ends_with("*/") && trimmed.len() > 4 {
                        // one-liner: /** like this */
                        blocks.push(CommentBlock {
                            comment: line.to_string(),
                            lineno,
                            code_name: None,
                        });
                        pending = Some(blocks.len() - 1);
                    } else {
                        current = Some((lineno, vec![line.to_string()]));
                    }
                } else if !trimmed.is_empty() {
                    if let Some(at) = pending.take() {
                        blocks[at].code_name = guess_code_name(line);
                    }
                }
            }
        }
    }
    blocks
}

/// Split a raw comment on standalone `@also` lines into one comment per
/// documented variant, re-wrapped so each parses on its own.
pub fn split_also(comment: &str) -> Vec<String> {
    let unwrapped = crate::doclet::unwrap_comment(comment);
    if !RE_ALSO.is_match(&unwrapped) {
        return vec![comment.to_string()];
    }
    RE_ALSO
        .split(&unwrapped)
        .map(|part| format!("/** {} */", part.trim()))
        .collect()
}

/// Parse one source stream: emit the per-file lifecycle events, build a
/// doclet per comment (honoring `prevent_default`), and return the kept
/// doclets. Handler errors abort the file.
pub fn process_source(
    source: &str,
    filename: &str,
    dict: &Dictionary,
    config: &Config,
    bus: &mut EventBus,
    diags: &mut Diagnostics,
) -> Result<Vec<Doclet>> {
    let mut event = Event::new(EventData::FileBegin {
        filename: filename.to_string(),
    });
    bus.emit(&mut event)?;

    let mut event = Event::new(EventData::BeforeParse {
        filename: filename.to_string(),
        source: source.to_string(),
    });
    bus.emit(&mut event)?;
    let source = match event.data {
        EventData::BeforeParse { source, .. } => source,
        _ => unreachable!(),
    };

    let mut doclets: Vec<Doclet> = Vec::new();

    for block in extract_blocks(&source) {
        let mut event = Event::new(EventData::JsdocCommentFound {
            filename: filename.to_string(),
            lineno: block.lineno,
            comment: block.comment.clone(),
        });
        bus.emit(&mut event)?;
        let comment = match event.data {
            EventData::JsdocCommentFound { comment, .. } => comment,
            _ => unreachable!(),
        };

        if let Some(ref code_name) = block.code_name {
            let mut event = Event::new(EventData::SymbolFound {
                filename: filename.to_string(),
                lineno: block.lineno,
                code_name: code_name.clone(),
            });
            bus.emit(&mut event)?;
        }

        for part in split_also(&comment) {
            let meta = Meta {
                filename: filename.to_string(),
                lineno: block.lineno,
            };
            let mut doclet = Doclet::from_comment(&part, Some(meta), dict, config, diags);

            if doclet.name.is_empty() {
                if let Some(ref code_name) = block.code_name {
                    doclet.name = name::prototype_to_punc(code_name);
                    doclet.post_process(dict);
                }
            }

            let mut event = Event::new(EventData::NewDoclet { doclet });
            bus.emit(&mut event)?;
            if event.is_default_prevented() {
                continue;
            }
            match event.data {
                EventData::NewDoclet { doclet } => doclets.push(doclet),
                _ => unreachable!(),
            }
        }
    }

    let mut event = Event::new(EventData::FileComplete {
        filename: filename.to_string(),
    });
    bus.emit(&mut event)?;

    Ok(doclets)
}
