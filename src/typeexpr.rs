//! Type expression parsing for tag text like `{(string|number)=} [foo=1] desc`.
//!
//! The braced portion is extracted with balance counting (so nested braces in
//! expressions like `{Object.<string, {a: number}>}` survive), then modifier
//! characters are stripped in a fixed order before the remainder is split
//! into individual type names.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// A parsed type expression plus the modifiers that wrapped it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeExpression {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    /// Individual type names, in source order. Empty when no type was given.
    pub names: Vec<String>,
    /// Set when the `=` suffix or a bracketed name marked the value optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// `?` prefix yields `Some(true)`, `!` prefix yields `Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Set by the `...` repeatable prefix.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variable: bool,
    /// Default value from a bracketed name like `[foo=1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaultvalue: Option<String>,
}

/// The fully parsed value of a tag: type, name and description, any of
/// which may be absent depending on what the tag accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub r#type: TypeExpression,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

static RE_OPTIONAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.+?)\]$").unwrap());

static RE_PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\((.+)\)$").unwrap());

/// Extract the brace-delimited type expression from the start of `text`.
/// Returns the inner expression (with `\{` and `\}` unescaped) and the
/// remainder of the text. Text that does not start with `{` is returned
/// untouched with no expression.
fn extract_type_expression(text: &str) -> (Option<String>, String) {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return (None, text.to_string());
    }

    let mut depth: i32 = 0;
    let mut escaped = false;
    let mut expr = String::new();
    let chars: Vec<char> = trimmed.chars().collect();
    let mut end = None;

    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            // \{ and \} are literal braces inside the expression
            if c != '{' && c != '}' {
                expr.push('\\');
            }
            expr.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => {
                depth += 1;
                if depth > 1 {
                    expr.push(c);
                }
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
                expr.push(c);
            }
            _ => expr.push(c),
        }
    }

    match end {
        Some(i) => {
            let rest: String = chars[i + 1..].iter().collect();
            (Some(expr), rest)
        }
        // unbalanced: treat the whole text as having no type expression
        None => (None, text.to_string()),
    }
}

/// Strip the `=` optional suffix, recording it in `result`.
fn parse_optional(expr: &str, result: &mut TypeExpression) -> String {
    if let Some(stripped) = expr.strip_suffix('=') {
        result.optional = Some(true);
        stripped.to_string()
    } else {
        expr.to_string()
    }
}

/// Strip the `?`/`!` nullability prefix, recording it in `result`.
fn parse_nullable(expr: &str, result: &mut TypeExpression) -> String {
    if let Some(stripped) = expr.strip_prefix('?') {
        result.nullable = Some(true);
        stripped.to_string()
    } else if let Some(stripped) = expr.strip_prefix('!') {
        result.nullable = Some(false);
        stripped.to_string()
    } else {
        expr.to_string()
    }
}

/// Strip the `...` repeatable prefix, recording it in `result`.
fn parse_variable(expr: &str, result: &mut TypeExpression) -> String {
    if let Some(stripped) = expr.strip_prefix("...") {
        result.variable = true;
        stripped.to_string()
    } else {
        expr.to_string()
    }
}

/// Split the remaining expression into type names. Redundant outer
/// parentheses are removed first, then the expression splits on `|`.
fn parse_names(expr: &str, result: &mut TypeExpression) {
    let expr = expr.trim();
    if expr.is_empty() {
        return;
    }
    let inner = match RE_PARENS.captures(expr) {
        Some(caps) => caps[1].to_string(),
        None => expr.to_string(),
    };
    result.names = inner
        .split('|')
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
}

/// Parse a type expression alone, without name or description handling.
pub fn parse_expression(expr: &str) -> TypeExpression {
    let mut result = TypeExpression::default();
    let expr = parse_optional(expr, &mut result);
    let expr = parse_nullable(&expr, &mut result);
    let expr = parse_variable(&expr, &mut result);
    parse_names(&expr, &mut result);
    result
}

/// Parse raw tag text into type, name and description, honouring what the
/// tag accepts. A bracketed name like `[foo=1]` marks the value optional
/// and records the default; an existing `optional: Some(true)` from the
/// `=` modifier is never downgraded.
pub fn parse(raw: &str, can_have_name: bool, can_have_type: bool) -> TagInfo {
    let mut info = TagInfo::default();
    let mut rest = raw.to_string();

    if can_have_type {
        let (expr, remainder) = extract_type_expression(&rest);
        rest = remainder;
        if let Some(expr) = expr {
            info.r#type = parse_expression(&expr);
        }
    }

    let rest = rest.trim();
    if can_have_name {
        let (name, description) = crate::name::split_name_and_description(rest);
        info.name = name;
        info.text = description;
    } else {
        info.text = rest.to_string();
    }

    if can_have_name && !info.name.is_empty() {
        if let Some(caps) = RE_OPTIONAL_NAME.captures(&info.name.clone()) {
            info.r#type.optional = Some(true);
            let inner = caps[1].to_string();
            match inner.split_once('=') {
                Some((name, default)) => {
                    info.name = name.trim().to_string();
                    info.r#type.defaultvalue = Some(default.trim().to_string());
                }
                None => info.name = inner.trim().to_string(),
            }
        }
    }

    info
}
