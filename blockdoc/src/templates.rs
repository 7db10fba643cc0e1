//! Markup generators for custom-render kinds
//!
//! Each generator reproduces, from attributes alone, the markup the block's
//! editor-side save function writes. The output must match it exactly or
//! the editor flags the block as invalid, so values are emitted the way the
//! save function emits them (escaped only where it escapes).

use crate::attributes::{AttributeValue, Attributes};
use crate::escape::escape_html;
use crate::kind::CustomRender;

/// Label of the "read more" link, fixed by the block's save function
pub const READ_MORE_LABEL: &str = "Mehr →";

pub fn regenerate(custom: CustomRender, attributes: &Attributes) -> String {
    match custom {
        CustomRender::ImageWithText => image_with_text(attributes),
        CustomRender::PageHeader => page_header(attributes),
    }
}

fn str_attribute<'a>(attributes: &'a Attributes, name: &str) -> &'a str {
    attributes
        .get(name)
        .and_then(AttributeValue::as_str)
        .unwrap_or("")
}

/// Image beside a title, a text and an optional link to a post
pub fn image_with_text(attributes: &Attributes) -> String {
    // An absent or null placement means the default, image on the left
    let image_left = attributes
        .get("image_left")
        .filter(|value| **value != AttributeValue::Null)
        .map(AttributeValue::is_truthy)
        .unwrap_or(true);
    let class = if image_left { "image-left" } else { "image-right" };
    let image_url = attributes
        .get("image")
        .map(|image| image.str_field("url"))
        .unwrap_or("");
    let title = str_attribute(attributes, "title");
    let text = str_attribute(attributes, "text");

    let mut html = format!("<div class=\"image-and-text {}\">", class);
    // The image is written even when its URL is empty
    html.push_str(&format!("<img src=\"{}\" alt=\"{}\"/>", image_url, title));
    html.push_str("<div class=\"text\">");

    if !title.is_empty() {
        html.push_str(&format!("<h3>{}</h3>", title));
    }

    if !text.is_empty() {
        html.push_str(&format!("<p>{}</p>", text));
    }

    if let Some(post) = attributes.get("post").filter(|post| post.is_truthy()) {
        html.push_str(&format!(
            "<p class=\"more\"><a href=\"{}\">{}</a></p>",
            post.str_field("link"),
            READ_MORE_LABEL
        ));
    }

    html.push_str("</div></div>");
    html
}

/// A strip of captioned header images
pub fn page_header(attributes: &Attributes) -> String {
    let images = attributes
        .get("images")
        .and_then(AttributeValue::as_list)
        .unwrap_or(&[]);

    let mut html = String::new();
    for image in images {
        let url = image.str_field("url");
        let text = image.str_field("text");

        html.push_str("<div class=\"image-item\">");
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\"/>",
            escape_html(url),
            escape_html(text)
        ));
        html.push_str(&format!(
            "<div class=\"text\"><span>{}</span></div>",
            escape_html(text)
        ));
        html.push_str("</div>");
    }
    html
}
