//! Block kind dispatch
//!
//! Every behavior that depends on a block's name (whether its markup is
//! translated directly, regenerated from attributes, or reduced to its
//! children) is decided here, from three static tables.

use std::borrow::Cow;

/// Text-bearing leaf kinds whose visible text lives in their stored markup
pub const LEAF_MARKUP_KINDS: &[&str] = &[
    "core/paragraph",
    "core/heading",
    "core/list",
    "core/quote",
    "core/pullquote",
    "core/verse",
    "core/preformatted",
];

/// Kinds whose markup is a pure function of their attributes
pub const CUSTOM_RENDER_KINDS: &[(&str, CustomRender)] = &[
    ("radicle/image-with-text", CustomRender::ImageWithText),
    ("radicle/page-header", CustomRender::PageHeader),
];

/// Wrapper kinds that only group their children
pub const CHILDREN_ONLY_KINDS: &[&str] = &["radicle/modal", "radicle/gradient-background"];

const DEFAULT_NAMESPACE: &str = "core";

/// Markup generator for a custom-render kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomRender {
    ImageWithText,
    PageHeader,
}

/// How a block is translated and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Freeform text between blocks
    Anonymous,
    /// Markup is translated as a whole, attributes are left alone
    LeafMarkup,
    /// Markup is regenerated from (translated) attributes
    CustomRender(CustomRender),
    /// Only the children are rendered between the delimiters
    ChildrenOnly,
    /// Stored markup is reused verbatim
    Generic,
}

impl BlockKind {
    pub fn classify(name: &str) -> Self {
        if name.is_empty() {
            return BlockKind::Anonymous;
        }

        let name = qualified_name(name);
        let name = name.as_ref();

        if LEAF_MARKUP_KINDS.contains(&name) {
            return BlockKind::LeafMarkup;
        }

        if let Some((_, custom)) = CUSTOM_RENDER_KINDS.iter().find(|(kind, _)| *kind == name) {
            return BlockKind::CustomRender(*custom);
        }

        if CHILDREN_ONLY_KINDS.contains(&name) {
            return BlockKind::ChildrenOnly;
        }

        BlockKind::Generic
    }

    pub fn is_leaf_markup(self) -> bool {
        self == BlockKind::LeafMarkup
    }
}

/// Fully qualified block name: `paragraph` → `core/paragraph`
pub fn qualified_name(name: &str) -> Cow<'_, str> {
    if name.contains('/') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{}/{}", DEFAULT_NAMESPACE, name))
    }
}
