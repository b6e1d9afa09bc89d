//! Elixir term conversion utilities
//!
//! Converts between the Rust node tree and BEAM terms. Tag nodes travel
//! as `{:tag, name, attributes, children}` tuples; text nodes travel as
//! bare binaries. Decoding is the only door through which a malformed
//! tree can enter, so it is where `UnknownNodeType` is produced.

use rustler::{Atom, Binary, Encoder, Env, NewBinary, Term};

use crate::core::error::SsmlError;
use crate::dom::node::{AttributeMap, SsmlNode, SsmlTag, SsmlText};

// Pre-defined atoms - created once at compile time
rustler::atoms! {
    tag,
    invalid_utf8,
    unexpected_end_of_input,
    unexpected_character,
    invalid_name,
    invalid_attribute,
    unterminated_attribute_value,
    self_closing_not_supported,
    missing_closing_tag,
    mismatched_closing_tag,
    missing_root_speak_tag,
    trailing_content_after_root,
    unknown_node_type,
}

/// Convert a node to an Elixir term
pub fn node_to_term<'a>(env: Env<'a>, node: &SsmlNode) -> Term<'a> {
    match node {
        SsmlNode::Text(text) => str_to_binary(env, &text.content),
        SsmlNode::Tag(t) => tag_to_term(env, t),
    }
}

/// Convert a tag node to `{:tag, name, attrs, children}`
pub fn tag_to_term<'a>(env: Env<'a>, node: &SsmlTag) -> Term<'a> {
    let name = str_to_binary(env, &node.name);

    // Attributes as {name, value} tuples - build in reverse order
    let mut attrs = Term::list_new_empty(env);
    for (key, value) in node.attributes.iter().rev() {
        let pair = (str_to_binary(env, key), str_to_binary(env, value));
        attrs = attrs.list_prepend(pair.encode(env));
    }

    let mut children = Term::list_new_empty(env);
    for child in node.children.iter().rev() {
        children = children.list_prepend(node_to_term(env, child));
    }

    (tag(), name, attrs, children).encode(env)
}

/// Decode a node term built on the Elixir side
///
/// Anything that is neither a binary nor a well-formed `{:tag, ...}`
/// tuple fails with `UnknownNodeType`.
pub fn term_to_node<'a>(term: Term<'a>) -> Result<SsmlNode, SsmlError> {
    if let Ok(binary) = term.decode::<Binary>() {
        let content =
            std::str::from_utf8(binary.as_slice()).map_err(|_| SsmlError::UnknownNodeType)?;
        return Ok(SsmlNode::Text(SsmlText::new(content)));
    }

    if let Ok((marker, name, attrs, children)) =
        term.decode::<(Atom, String, Vec<(String, String)>, Vec<Term<'a>>)>()
    {
        if marker != tag() {
            return Err(SsmlError::UnknownNodeType);
        }
        let attributes: AttributeMap = attrs.into_iter().collect();
        let mut nodes = Vec::with_capacity(children.len());
        for child in children {
            nodes.push(term_to_node(child)?);
        }
        return Ok(SsmlNode::Tag(SsmlTag {
            name,
            attributes,
            children: nodes,
        }));
    }

    Err(SsmlError::UnknownNodeType)
}

/// Convert an error to its reason term (the caller wraps it in {:error, _})
pub fn error_to_term<'a>(env: Env<'a>, err: &SsmlError) -> Term<'a> {
    match err {
        SsmlError::UnexpectedEndOfInput => unexpected_end_of_input().encode(env),
        SsmlError::UnexpectedCharacter { expected, found } => (
            unexpected_character(),
            str_to_binary(env, &expected.to_string()),
            str_to_binary(env, &found.to_string()),
        )
            .encode(env),
        SsmlError::InvalidName => invalid_name().encode(env),
        SsmlError::InvalidAttribute => invalid_attribute().encode(env),
        SsmlError::UnterminatedAttributeValue => unterminated_attribute_value().encode(env),
        SsmlError::SelfClosingNotSupported => self_closing_not_supported().encode(env),
        SsmlError::MissingClosingTag => missing_closing_tag().encode(env),
        SsmlError::MismatchedClosingTag { expected, found } => (
            mismatched_closing_tag(),
            str_to_binary(env, expected),
            str_to_binary(env, found),
        )
            .encode(env),
        SsmlError::MissingRootSpeakTag => missing_root_speak_tag().encode(env),
        SsmlError::TrailingContentAfterRoot => trailing_content_after_root().encode(env),
        SsmlError::UnknownNodeType => unknown_node_type().encode(env),
    }
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
