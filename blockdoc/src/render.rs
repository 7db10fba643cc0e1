//! Block tree serialization
//!
//! The inverse of [`crate::parser::Parser`]: a tree that was parsed and not
//! modified renders back to the exact source text. Blocks whose kind has a
//! custom render rule get fresh markup built from their attributes instead
//! of their stored markup, so translated attributes show up in the output.

use crate::ast::{Block, Closer, InnerContent};
use crate::attributes::attributes_to_json;
use crate::error::RenderError;
use crate::kind::BlockKind;
use crate::templates::regenerate;

/// Render a block list back to its serialized form
pub fn render(blocks: &[Block]) -> Result<String, RenderError> {
    let mut output = String::new();
    for block in blocks {
        render_into(&mut output, block)?;
    }
    Ok(output)
}

/// Render a single block, including its delimiters
pub fn render_block(block: &Block) -> Result<String, RenderError> {
    let mut output = String::new();
    render_into(&mut output, block)?;
    Ok(output)
}

fn render_into(output: &mut String, block: &Block) -> Result<(), RenderError> {
    let kind = match block.block_kind() {
        // Markup cannot be rebuilt from attributes that failed to parse
        BlockKind::CustomRender(_) if block.malformed_attributes => BlockKind::Generic,
        kind => kind,
    };

    match kind {
        BlockKind::Anonymous => {
            output.push_str(block.inner_html.as_deref().unwrap_or(""));
        }
        BlockKind::CustomRender(custom) => {
            let markup = regenerate(custom, &block.attributes);
            let stored = block.inner_html.as_deref();

            if markup.is_empty() {
                match stored {
                    None => push_void(output, block)?,
                    Some(stored) => {
                        push_opener(output, block)?;
                        if stored.trim().is_empty() {
                            output.push_str(stored);
                        }
                        push_closer(output, block);
                    }
                }
            } else {
                let (leading, trailing) = surrounding_whitespace(stored);
                push_opener(output, block)?;
                output.push_str(leading);
                output.push_str(&markup);
                output.push_str(trailing);
                push_closer(output, block);
            }
        }
        BlockKind::ChildrenOnly if block.inner_html.is_none() && block.children.is_empty() => {
            push_void(output, block)?;
        }
        BlockKind::ChildrenOnly => {
            check_child_slots(block)?;
            push_opener(output, block)?;
            if block.child_slots() == 0 {
                for child in &block.children {
                    render_into(output, child)?;
                }
            } else {
                // Wrapper markup is not derived from attributes; only the spacing survives
                render_inner_content(output, block, push_spacing)?;
            }
            push_closer(output, block);
        }
        BlockKind::LeafMarkup | BlockKind::Generic => match &block.inner_html {
            None if block.children.is_empty() => push_void(output, block)?,
            _ => {
                check_child_slots(block)?;
                push_opener(output, block)?;
                if block.children.is_empty() {
                    output.push_str(block.inner_html.as_deref().unwrap_or(""));
                } else {
                    render_inner_content(output, block, |output, fragment| {
                        output.push_str(fragment)
                    })?;
                }
                push_closer(output, block);
            }
        },
    }
    Ok(())
}

/// Write markup fragments and rendered children in authored order
fn render_inner_content(
    output: &mut String,
    block: &Block,
    push_fragment: impl Fn(&mut String, &str),
) -> Result<(), RenderError> {
    let mut children = block.children.iter();
    for part in &block.inner_content {
        match part {
            InnerContent::Markup(fragment) => push_fragment(output, fragment),
            InnerContent::Child => {
                if let Some(child) = children.next() {
                    render_into(output, child)?;
                }
            }
        }
    }
    Ok(())
}

fn check_child_slots(block: &Block) -> Result<(), RenderError> {
    let slots = block.child_slots();
    // A wrapper built without placeholders renders its children back to back
    let unslotted = slots == 0 && block.block_kind() == BlockKind::ChildrenOnly;
    if slots != block.children.len() && !unslotted {
        return Err(RenderError::ChildCountMismatch {
            kind: block.kind.clone(),
            slots,
            children: block.children.len(),
        });
    }
    Ok(())
}

fn whitespace_edges(html: &str) -> (&str, &str) {
    let leading = &html[..html.len() - html.trim_start().len()];
    let trailing = &html[html.trim_end().len()..];
    (leading, trailing)
}

/// Whitespace around the stored markup, or a newline on each side
fn surrounding_whitespace(stored: Option<&str>) -> (&str, &str) {
    match stored {
        Some(html) if !html.trim().is_empty() => whitespace_edges(html),
        _ => ("\n", "\n"),
    }
}

/// Keep blank fragments whole and only the outer whitespace of the others
fn push_spacing(output: &mut String, fragment: &str) {
    if fragment.trim().is_empty() {
        output.push_str(fragment);
        return;
    }
    let (leading, trailing) = whitespace_edges(fragment);
    output.push_str(leading);
    output.push_str(trailing);
}

fn attributes_suffix(block: &Block) -> Result<String, RenderError> {
    if let Some(source) = &block.attributes_source {
        return Ok(format!(" {}", source));
    }
    if block.attributes.is_empty() {
        return Ok(String::new());
    }
    let json = attributes_to_json(&block.attributes).map_err(|e| RenderError::Attributes {
        kind: block.kind.clone(),
        message: e.to_string(),
    })?;
    Ok(format!(" {}", json))
}

fn push_opener(output: &mut String, block: &Block) -> Result<(), RenderError> {
    output.push_str(&format!("<!-- wp:{}{} -->", block.kind, attributes_suffix(block)?));
    Ok(())
}

fn push_void(output: &mut String, block: &Block) -> Result<(), RenderError> {
    output.push_str(&format!("<!-- wp:{}{} /-->", block.kind, attributes_suffix(block)?));
    Ok(())
}

fn push_closer(output: &mut String, block: &Block) {
    match &block.closer {
        Closer::Matching => output.push_str(&format!("<!-- /wp:{} -->", block.kind)),
        Closer::Named(name) => output.push_str(&format!("<!-- /wp:{} -->", name)),
        Closer::Missing => {}
    }
}
