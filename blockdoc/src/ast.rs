use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeValue, Attributes};
use crate::kind::BlockKind;

/// One piece of a block's inner content
///
/// Markup fragments and child placeholders alternate in authored order.
/// Each `Child` stands for the next entry of [`Block::children`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InnerContent {
    Markup(String),
    Child,
}

/// How an open block's closing delimiter appeared in the source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Closer {
    #[default]
    Matching,
    /// Closed by a delimiter naming another block, or the same block spelled differently
    Named(String),
    /// Never closed; the block runs to the end of the document
    Missing,
}

/// A node of the block document tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block name as authored (`core/paragraph`, `paragraph`, `radicle/modal`).
    /// Empty for freeform text between blocks.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Attribute JSON exactly as it appeared in the source document.
    /// Dropped as soon as `attributes` changes.
    #[serde(skip)]
    pub attributes_source: Option<String>,
    /// The authored attribute JSON did not parse; `attributes` is empty and
    /// the markup cannot be rebuilt from it
    #[serde(skip)]
    pub malformed_attributes: bool,
    /// Concatenated markup fragments; `None` for a void block
    pub inner_html: Option<String>,
    #[serde(default)]
    pub inner_content: Vec<InnerContent>,
    #[serde(default)]
    pub children: Vec<Block>,
    #[serde(skip)]
    pub closer: Closer,
}

pub type BlockList = Vec<Block>;

impl Block {
    /// A void block with no attributes: `<!-- wp:kind /-->`
    pub fn new(kind: &str) -> Self {
        Block {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Freeform text outside of any block
    pub fn freeform(text: &str) -> Self {
        Block {
            inner_html: Some(text.to_string()),
            inner_content: vec![InnerContent::Markup(text.to_string())],
            ..Default::default()
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.set_attributes(attributes);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self.attributes_source = None;
        self.malformed_attributes = false;
        self
    }

    /// Append a markup fragment
    pub fn with_markup(mut self, markup: &str) -> Self {
        self.inner_html
            .get_or_insert_with(String::new)
            .push_str(markup);
        self.inner_content
            .push(InnerContent::Markup(markup.to_string()));
        self
    }

    /// Append a child block at the current position in the markup
    pub fn with_child(mut self, child: Block) -> Self {
        self.inner_html.get_or_insert_with(String::new);
        self.inner_content.push(InnerContent::Child);
        self.children.push(child);
        self
    }

    pub fn block_kind(&self) -> BlockKind {
        BlockKind::classify(&self.kind)
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind.is_empty()
    }

    pub fn is_void(&self) -> bool {
        self.inner_html.is_none()
    }

    /// Replace the attributes, discarding the authored JSON text
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
        self.attributes_source = None;
        self.malformed_attributes = false;
    }

    /// Replace the stored markup of a leaf block
    ///
    /// The first markup fragment is replaced as well, so `inner_html` and
    /// `inner_content` stay in agreement.
    pub fn set_inner_html(&mut self, html: String) {
        let first = self
            .inner_content
            .iter()
            .position(|part| matches!(part, InnerContent::Markup(_)));
        match first {
            Some(index) => self.inner_content[index] = InnerContent::Markup(html.clone()),
            None => self.inner_content.insert(0, InnerContent::Markup(html.clone())),
        }
        self.inner_html = Some(html);
    }

    /// Rebuild `inner_html` from the markup fragments of `inner_content`
    pub fn sync_inner_html(&mut self) {
        let html = self
            .inner_content
            .iter()
            .filter_map(|part| match part {
                InnerContent::Markup(markup) => Some(markup.as_str()),
                InnerContent::Child => None,
            })
            .collect::<String>();
        self.inner_html = Some(html);
    }

    /// Number of child placeholders in the inner content
    pub fn child_slots(&self) -> usize {
        self.inner_content
            .iter()
            .filter(|part| matches!(part, InnerContent::Child))
            .count()
    }
}
