//! Walks a block tree and translates it in document order
//!
//! Each block is handled in three steps: its attributes (unless its kind
//! carries its text in markup), then its children, then the markup of
//! leaf-markup kinds. Calls are made one at a time.

use std::sync::LazyLock;

use blockdoc::{Block, BlockList, InnerContent};
use regex::Regex;

use crate::attributes::{KeyScope, translate_attributes};
use crate::context::{BoxFuture, TranslationContext};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Translate every block of `blocks`, returning the translated tree
///
/// Failed strings stay in the source language; the tree shape and the
/// order of blocks never change.
pub async fn translate_tree(ctx: &mut TranslationContext<'_>, blocks: BlockList) -> BlockList {
    translate_blocks(ctx, blocks).await
}

fn translate_blocks<'a>(
    ctx: &'a mut TranslationContext<'_>,
    blocks: BlockList,
) -> BoxFuture<'a, BlockList> {
    Box::pin(async move {
        let mut translated = Vec::with_capacity(blocks.len());
        for block in blocks {
            translated.push(translate_block(ctx, block).await);
        }
        translated
    })
}

async fn translate_block(ctx: &mut TranslationContext<'_>, mut block: Block) -> Block {
    if block.is_anonymous() {
        return block;
    }

    let leaf_markup = block.block_kind().is_leaf_markup();

    if !leaf_markup && !block.attributes.is_empty() {
        let attributes = translate_attributes(ctx, &block.attributes, KeyScope::TopLevel).await;
        if attributes != block.attributes {
            block.set_attributes(attributes);
        }
    }

    if !block.children.is_empty() {
        let children = std::mem::take(&mut block.children);
        block.children = translate_blocks(ctx, children).await;
    }

    if leaf_markup {
        translate_markup(ctx, &mut block).await;
    }

    block
}

async fn translate_markup(ctx: &mut TranslationContext<'_>, block: &mut Block) {
    let Some(html) = block.inner_html.as_deref().filter(|html| !html.is_empty()) else {
        return;
    };

    if block.children.is_empty() {
        if let Some(translated) = ctx.translate_text(html).await {
            block.set_inner_html(translated);
        }
        return;
    }

    // Markup around nested blocks is split into fragments; each is sent on
    // its own so no fragment ends up holding another's text
    let mut changed = false;
    for part in block.inner_content.iter_mut() {
        let InnerContent::Markup(fragment) = part else {
            continue;
        };
        if !has_text(fragment) {
            continue;
        }
        if let Some(translated) = ctx.translate_text(fragment).await {
            *fragment = translated;
            changed = true;
        }
    }
    if changed {
        block.sync_inner_html();
    }
}

/// Whether a markup fragment has any text outside of its tags
fn has_text(fragment: &str) -> bool {
    !TAG.replace_all(fragment, "").trim().is_empty()
}
