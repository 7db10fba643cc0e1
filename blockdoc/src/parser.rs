use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::ast::{Block, BlockList, Closer, InnerContent};
use crate::attributes::{Attributes, attributes_from_json};
use crate::error::ParseError;
use crate::kind::qualified_name;

// `<!-- wp:name ` or `<!-- /wp:name `; attributes and the tail are matched separately
static DELIMITER_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<!--\s+(?P<closer>/)?wp:(?P<name>[a-z][a-z0-9_-]*(?:/[a-z][a-z0-9_-]*)?)\s+")
        .expect("delimiter head pattern is valid")
});

static DELIMITER_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<void>/)?-->").expect("delimiter tail pattern is valid"));

static ATTRIBUTES_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\}\s+(?P<void>/)?-->").expect("attributes tail pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Opener,
    Void,
    Closer,
}

#[derive(Debug)]
struct Token<'s> {
    kind: TokenKind,
    name: &'s str,
    attributes_json: Option<&'s str>,
    start: usize,
    end: usize,
}

struct OpenBlock {
    block: Block,
    offset: usize,
}

/// Splits a serialized block document into a [`BlockList`]
///
/// Blocks are delimited by HTML comments:
///
/// ```text
/// <!-- wp:core/group {"tagName":"section"} -->
/// <section><!-- wp:paragraph --><p>Hallo</p><!-- /wp:paragraph --></section>
/// <!-- /wp:core/group -->
/// <!-- wp:core/spacer /-->
/// ```
///
/// Text between top-level blocks becomes anonymous freeform blocks, so
/// rendering the parsed list reproduces the input exactly.
///
/// Broken input is recovered from the way WordPress' `parse_blocks` does,
/// with a `warn!` for each repair, and still renders back verbatim:
///
/// * a closer with no open block is kept as freeform text
/// * a closer naming another block closes the innermost open block
/// * blocks still open at the end of the document are closed there
/// * attribute JSON that does not parse leaves the block without attributes
///
/// Only nesting deeper than [`Parser::MAX_DEPTH`] is an error.
pub struct Parser {
    source: String,
}

impl Parser {
    /// Deepest nesting of open blocks accepted
    pub const MAX_DEPTH: usize = 64;

    pub fn new(source: &str) -> Self {
        Parser {
            source: source.to_string(),
        }
    }

    pub fn parse(&self) -> Result<BlockList, ParseError> {
        let mut output = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut cursor = 0;

        while let Some(token) = self.next_token(cursor) {
            Self::push_text(&mut stack, &mut output, &self.source[cursor..token.start]);

            match token.kind {
                TokenKind::Void => {
                    let block = Self::start_block(&token, false);
                    Self::finish_block(&mut stack, &mut output, block);
                }
                TokenKind::Opener => {
                    if stack.len() >= Self::MAX_DEPTH {
                        return Err(ParseError::TooDeep {
                            offset: token.start,
                            limit: Self::MAX_DEPTH,
                        });
                    }
                    stack.push(OpenBlock {
                        block: Self::start_block(&token, true),
                        offset: token.start,
                    });
                }
                TokenKind::Closer => match stack.pop() {
                    Some(mut open) => {
                        if qualified_name(&open.block.kind) != qualified_name(token.name) {
                            warn!(
                                open = %open.block.kind,
                                found = token.name,
                                offset = token.start,
                                "Closer names another block, closing the open one"
                            );
                        }
                        if open.block.kind != token.name {
                            open.block.closer = Closer::Named(token.name.to_string());
                        }
                        Self::finish_block(&mut stack, &mut output, open.block);
                    }
                    None => {
                        warn!(
                            name = token.name,
                            offset = token.start,
                            "Closer without an open block, keeping it as text"
                        );
                        output.push(Block::freeform(&self.source[token.start..token.end]));
                    }
                },
            }

            cursor = token.end;
        }

        Self::push_text(&mut stack, &mut output, &self.source[cursor..]);

        while let Some(mut open) = stack.pop() {
            warn!(
                name = %open.block.kind,
                offset = open.offset,
                "Block is never closed, closing it at the end of the document"
            );
            open.block.closer = Closer::Missing;
            Self::finish_block(&mut stack, &mut output, open.block);
        }

        Ok(output)
    }

    fn next_token(&self, from: usize) -> Option<Token<'_>> {
        let mut search = from;
        while let Some(relative) = self.source[search..].find("<!--") {
            let start = search + relative;
            if let Some(token) = self.delimiter_at(start) {
                return Some(token);
            }
            search = start + "<!--".len();
        }
        None
    }

    /// Try to read a block delimiter starting at `start`
    ///
    /// Any other comment is left to be treated as plain markup.
    fn delimiter_at(&self, start: usize) -> Option<Token<'_>> {
        let rest = &self.source[start..];
        let head = DELIMITER_HEAD.captures(rest)?;
        let head_len = head.get(0)?.end();
        let name = head.name("name")?.as_str();
        let tail = &rest[head_len..];

        if head.name("closer").is_some() {
            let closing = DELIMITER_TAIL.captures(tail)?;
            if closing.name("void").is_some() {
                return None;
            }
            return Some(Token {
                kind: TokenKind::Closer,
                name,
                attributes_json: None,
                start,
                end: start + head_len + closing.get(0)?.end(),
            });
        }

        let (attributes_json, tail_len, void) = if tail.starts_with('{') {
            // The attribute object ends at the first `}` that is followed by the delimiter tail
            tail.match_indices('}').find_map(|(index, _)| {
                let closing = ATTRIBUTES_TAIL.captures(&tail[index..])?;
                let consumed = index + closing.get(0)?.end();
                Some((
                    Some(&tail[..=index]),
                    consumed,
                    closing.name("void").is_some(),
                ))
            })?
        } else {
            let closing = DELIMITER_TAIL.captures(tail)?;
            (None, closing.get(0)?.end(), closing.name("void").is_some())
        };

        Some(Token {
            kind: if void {
                TokenKind::Void
            } else {
                TokenKind::Opener
            },
            name,
            attributes_json,
            start,
            end: start + head_len + tail_len,
        })
    }

    fn start_block(token: &Token<'_>, open: bool) -> Block {
        let (attributes, malformed_attributes) = match token.attributes_json {
            Some(json) => match attributes_from_json(json) {
                Ok(attributes) => (attributes, false),
                Err(e) => {
                    warn!(
                        name = token.name,
                        offset = token.start,
                        error = %e,
                        "Invalid block attributes, keeping them as authored"
                    );
                    (Attributes::new(), true)
                }
            },
            None => (Attributes::new(), false),
        };

        Block {
            kind: token.name.to_string(),
            attributes,
            attributes_source: token.attributes_json.map(str::to_string),
            malformed_attributes,
            inner_html: open.then(String::new),
            inner_content: Vec::new(),
            children: Vec::new(),
            closer: Closer::Matching,
        }
    }

    fn push_text(stack: &mut [OpenBlock], output: &mut BlockList, text: &str) {
        if text.is_empty() {
            return;
        }
        match stack.last_mut() {
            Some(open) => {
                let block = &mut open.block;
                block
                    .inner_html
                    .get_or_insert_with(String::new)
                    .push_str(text);
                block
                    .inner_content
                    .push(InnerContent::Markup(text.to_string()));
            }
            None => output.push(Block::freeform(text)),
        }
    }

    fn finish_block(stack: &mut [OpenBlock], output: &mut BlockList, block: Block) {
        match stack.last_mut() {
            Some(parent) => {
                parent.block.inner_content.push(InnerContent::Child);
                parent.block.children.push(block);
            }
            None => output.push(block),
        }
    }
}
