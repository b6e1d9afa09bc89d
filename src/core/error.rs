//! Parse and serialization error taxonomy
//!
//! Every grammar-rule failure is fatal to the current call: the error is
//! surfaced to the caller unchanged and parsing never resumes past the
//! offending construct.

use thiserror::Error;

/// Error kinds produced by the parser and the term decoder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsmlError {
    /// The cursor was asked to consume past the end of the input
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// A specific character was required but something else was found
    #[error("expected '{expected}' but found '{found}'")]
    UnexpectedCharacter { expected: char, found: char },

    /// A tag or attribute name was required and the character run was empty
    #[error("expected a tag or attribute name")]
    InvalidName,

    /// An attribute name was not followed by '='
    #[error("invalid attribute (missing '=')")]
    InvalidAttribute,

    /// An attribute value did not start with '"' or its closing '"' was
    /// never found before the end of the input
    #[error("attribute value must be enclosed in double quotes")]
    UnterminatedAttributeValue,

    /// A '/' appeared before the '>' of an open tag
    #[error("self-closing tags are not supported")]
    SelfClosingNotSupported,

    /// The input ended, or markup other than a closing tag appeared, where
    /// a closing tag was required
    #[error("missing closing tag")]
    MissingClosingTag,

    /// A closing tag named a different element than the open tag
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag { expected: String, found: String },

    /// The document does not start with, or is not rooted at, a <speak> tag
    #[error("document root must be a <speak> element")]
    MissingRootSpeakTag,

    /// Input remained after the root element and trailing whitespace
    #[error("only one top-level <speak> element is allowed")]
    TrailingContentAfterRoot,

    /// A term handed in from the VM did not describe a tag or text node
    #[error("unknown node type")]
    UnknownNodeType,
}
