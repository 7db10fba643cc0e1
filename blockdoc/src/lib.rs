//! Block documents
//!
//! A block document is HTML with block boundaries marked by comments:
//!
//! ```text
//! <!-- wp:paragraph --><p>Hallo Welt</p><!-- /wp:paragraph -->
//! ```
//!
//! This crate parses such a document into a tree of [`Block`]s, classifies
//! blocks by kind, and renders the tree back, regenerating markup for the
//! kinds whose markup is derived from their attributes.
//!
//! # Example
//!
//! ```
//! use blockdoc::{Parser, render};
//!
//! let source = "<!-- wp:paragraph --><p>Hallo</p><!-- /wp:paragraph -->";
//! let blocks = Parser::new(source).parse().unwrap();
//! assert_eq!(render(&blocks).unwrap(), source);
//! ```

pub mod ast;
pub mod attributes;
pub mod error;
pub mod escape;
pub mod kind;
pub mod parser;
pub mod render;
pub mod templates;

pub use ast::{Block, BlockList, Closer, InnerContent};
pub use attributes::{AttributeValue, Attributes, attributes_from_json, attributes_to_json};
pub use error::{ParseError, RenderError};
pub use kind::{BlockKind, CustomRender};
pub use parser::Parser;
pub use render::{render, render_block};
