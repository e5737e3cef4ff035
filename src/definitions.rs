//! The built-in tag set: flags, synonyms and the hooks that let each tag
//! mutate the doclet it is attached to.

use crate::dictionary::{Dictionary, TagDefinition};
use crate::doclet::{Doclet, Scope};
use crate::name;
use crate::tag::Tag;
use crate::typeexpr::TagInfo;

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Pull the parsed value out of a tag, or an empty one for bare tags.
fn info_of(tag: &Tag) -> TagInfo {
    tag.info().cloned().unwrap_or_default()
}

/// `@augments {Foo}` is accepted alongside `@augments Foo`.
fn strip_braces(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
    {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// `@type string` means `@type {string}`.
fn ensure_braces(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.is_empty() {
        trimmed.to_string()
    } else {
        format!("{{{}}}", trimmed)
    }
}

fn set_kind_and_name(doclet: &mut Doclet, tag: &Tag, kind: &str) {
    doclet.kind = Some(kind.to_string());
    if !tag.text.is_empty() {
        let (name, description) = name::split_name_and_description(&tag.text);
        if !name.is_empty() {
            doclet.name = name;
        }
        if !description.is_empty() && doclet.description.is_none() {
            doclet.description = Some(description);
        }
    }
}

fn tagged_abstract(doclet: &mut Doclet, _tag: &Tag) {
    doclet.virtual_ = true;
}

fn tagged_augments(doclet: &mut Doclet, tag: &Tag) {
    doclet.augment(first_word(&tag.text));
}

fn tagged_borrows(doclet: &mut Doclet, tag: &Tag) {
    // @borrows <from> as <as>, the "as" clause optional
    match tag.text.split_once(" as ") {
        Some((from, r#as)) => doclet.borrow(from.trim(), Some(r#as.trim().to_string())),
        None => doclet.borrow(tag.text.trim(), None),
    }
}

fn tagged_class(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "class");
}

fn tagged_constant(doclet: &mut Doclet, tag: &Tag) {
    doclet.kind = Some("constant".to_string());
    let info = info_of(tag);
    if !info.name.is_empty() {
        doclet.name = info.name;
    }
    if !info.r#type.names.is_empty() {
        doclet.r#type = Some(info.r#type);
    }
}

fn tagged_description(doclet: &mut Doclet, tag: &Tag) {
    doclet.description = Some(tag.text.clone());
}

fn tagged_event(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "event");
}

fn tagged_example(doclet: &mut Doclet, tag: &Tag) {
    doclet.examples.push(tag.text.trim_start_matches('\n').to_string());
}

fn tagged_external(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "external");
}

fn tagged_function(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "function");
}

fn tagged_global(doclet: &mut Doclet, _tag: &Tag) {
    doclet.scope = Some(Scope::Global);
    doclet.memberof = None;
}

fn tagged_ignore(doclet: &mut Doclet, _tag: &Tag) {
    doclet.ignore = true;
}

fn tagged_implements(doclet: &mut Doclet, tag: &Tag) {
    doclet.implement(first_word(&tag.text));
}

fn tagged_inheritdoc(doclet: &mut Doclet, _tag: &Tag) {
    doclet.inheritdoc = true;
}

fn tagged_inner(doclet: &mut Doclet, _tag: &Tag) {
    doclet.scope = Some(Scope::Inner);
}

fn tagged_instance(doclet: &mut Doclet, _tag: &Tag) {
    doclet.scope = Some(Scope::Instance);
}

fn tagged_interface(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "interface");
}

fn tagged_kind(doclet: &mut Doclet, tag: &Tag) {
    doclet.kind = Some(first_word(&tag.text).to_string());
}

fn tagged_member(doclet: &mut Doclet, tag: &Tag) {
    doclet.kind = Some("member".to_string());
    let info = info_of(tag);
    if !info.name.is_empty() {
        doclet.name = info.name;
    }
    if !info.r#type.names.is_empty() {
        doclet.r#type = Some(info.r#type);
    }
}

fn tagged_memberof(doclet: &mut Doclet, tag: &Tag) {
    doclet.set_memberof(first_word(&tag.text));
}

fn tagged_mixes(doclet: &mut Doclet, tag: &Tag) {
    doclet.mix(first_word(&tag.text));
}

fn tagged_mixin(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "mixin");
}

fn tagged_module(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "module");
}

fn tagged_name(doclet: &mut Doclet, tag: &Tag) {
    doclet.name = tag.text.clone();
}

fn tagged_namespace(doclet: &mut Doclet, tag: &Tag) {
    set_kind_and_name(doclet, tag, "namespace");
}

fn tagged_override(doclet: &mut Doclet, _tag: &Tag) {
    doclet.override_ = true;
}

fn tagged_param(doclet: &mut Doclet, tag: &Tag) {
    doclet.params.push(info_of(tag));
}

fn tagged_property(doclet: &mut Doclet, tag: &Tag) {
    doclet.properties.push(info_of(tag));
}

fn tagged_returns(doclet: &mut Doclet, tag: &Tag) {
    doclet.returns.push(info_of(tag));
}

fn tagged_scope(doclet: &mut Doclet, tag: &Tag) {
    if let Some(scope) = Scope::from_str(first_word(&tag.text)) {
        doclet.scope = Some(scope);
    }
}

fn tagged_see(doclet: &mut Doclet, tag: &Tag) {
    doclet.see.push(tag.text.clone());
}

fn tagged_static(doclet: &mut Doclet, _tag: &Tag) {
    doclet.scope = Some(Scope::Static);
}

fn tagged_this(doclet: &mut Doclet, tag: &Tag) {
    doclet.this = Some(first_word(&tag.text).to_string());
}

fn tagged_throws(doclet: &mut Doclet, tag: &Tag) {
    doclet.exceptions.push(info_of(tag));
}

fn tagged_type(doclet: &mut Doclet, tag: &Tag) {
    let info = info_of(tag);
    if doclet.kind.as_deref() == Some("function") {
        // a bare @type on a function documents its return type
        doclet.returns.push(TagInfo {
            r#type: info.r#type.clone(),
            ..TagInfo::default()
        });
    }
    doclet.r#type = Some(info.r#type);
}

fn tagged_typedef(doclet: &mut Doclet, tag: &Tag) {
    doclet.kind = Some("typedef".to_string());
    let info = info_of(tag);
    if !info.name.is_empty() {
        doclet.name = info.name;
    }
    if !info.r#type.names.is_empty() {
        doclet.r#type = Some(info.r#type);
    }
}

fn tagged_undocumented(doclet: &mut Doclet, _tag: &Tag) {
    doclet.undocumented = true;
    doclet.comment.clear();
}

/// Register the core tag set.
pub fn define_tags(dict: &mut Dictionary) {
    dict.define_tag(
        "abstract",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_abstract),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("abstract", "virtual");

    dict.define_tag(
        "augments",
        TagDefinition {
            must_have_value: true,
            on_tag_text: Some(strip_braces),
            on_tagged: Some(tagged_augments),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("augments", "extends");

    dict.define_tag(
        "borrows",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_borrows),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "class",
        TagDefinition {
            can_have_name: true,
            on_tagged: Some(tagged_class),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("class", "constructor");

    dict.define_tag(
        "constant",
        TagDefinition {
            can_have_type: true,
            can_have_name: true,
            on_tagged: Some(tagged_constant),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("constant", "const");

    dict.define_tag(
        "description",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_description),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("description", "desc");

    dict.define_tag(
        "event",
        TagDefinition {
            is_namespace: true,
            can_have_name: true,
            on_tagged: Some(tagged_event),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "example",
        TagDefinition {
            keeps_whitespace: true,
            must_have_value: true,
            on_tagged: Some(tagged_example),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "external",
        TagDefinition {
            is_namespace: true,
            can_have_name: true,
            must_have_value: true,
            on_tagged: Some(tagged_external),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("external", "host");

    dict.define_tag(
        "function",
        TagDefinition {
            can_have_name: true,
            on_tagged: Some(tagged_function),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("function", "func");
    dict.define_synonym("function", "method");

    dict.define_tag(
        "global",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_global),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "ignore",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_ignore),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "implements",
        TagDefinition {
            must_have_value: true,
            on_tag_text: Some(strip_braces),
            on_tagged: Some(tagged_implements),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "inheritdoc",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_inheritdoc),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "inner",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_inner),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "instance",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_instance),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "interface",
        TagDefinition {
            can_have_name: true,
            on_tagged: Some(tagged_interface),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "kind",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_kind),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "member",
        TagDefinition {
            can_have_type: true,
            can_have_name: true,
            on_tagged: Some(tagged_member),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("member", "var");

    dict.define_tag(
        "memberof",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_memberof),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "mixes",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_mixes),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "mixin",
        TagDefinition {
            can_have_name: true,
            on_tagged: Some(tagged_mixin),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "module",
        TagDefinition {
            is_namespace: true,
            can_have_name: true,
            on_tagged: Some(tagged_module),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "name",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_name),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "namespace",
        TagDefinition {
            can_have_name: true,
            on_tagged: Some(tagged_namespace),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "override",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_override),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "param",
        TagDefinition {
            can_have_type: true,
            can_have_name: true,
            on_tagged: Some(tagged_param),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("param", "arg");
    dict.define_synonym("param", "argument");

    dict.define_tag(
        "property",
        TagDefinition {
            must_have_value: true,
            can_have_type: true,
            can_have_name: true,
            on_tagged: Some(tagged_property),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("property", "prop");

    dict.define_tag(
        "returns",
        TagDefinition {
            can_have_type: true,
            on_tagged: Some(tagged_returns),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("returns", "return");

    dict.define_tag(
        "scope",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_scope),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "see",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_see),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "static",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_static),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "this",
        TagDefinition {
            must_have_value: true,
            on_tagged: Some(tagged_this),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "throws",
        TagDefinition {
            can_have_type: true,
            on_tagged: Some(tagged_throws),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("throws", "exception");

    dict.define_tag(
        "type",
        TagDefinition {
            can_have_type: true,
            must_have_value: true,
            must_not_have_description: true,
            on_tag_text: Some(ensure_braces),
            on_tagged: Some(tagged_type),
            ..TagDefinition::default()
        },
    );

    dict.define_tag(
        "typedef",
        TagDefinition {
            can_have_type: true,
            can_have_name: true,
            on_tagged: Some(tagged_typedef),
            ..TagDefinition::default()
        },
    );
    dict.define_synonym("typedef", "callback");

    dict.define_tag(
        "undocumented",
        TagDefinition {
            must_not_have_value: true,
            on_tagged: Some(tagged_undocumented),
            ..TagDefinition::default()
        },
    );
}
