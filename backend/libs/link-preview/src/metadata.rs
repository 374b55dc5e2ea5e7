//! Open Graph metadata scan

use crate::markup::{Token, Tokenizer};
use serde::{Deserialize, Serialize};

/// Preview attached to a post or comment at creation time.
///
/// Field names are part of the stored record format; empty fields are
/// omitted when serialized and default when missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPreview {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
}

/// Metadata found in a page, before it is bound to a URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.image.is_empty()
    }

    pub fn into_preview(self, url: &str) -> LinkPreview {
        LinkPreview {
            url: url.to_string(),
            title: self.title,
            description: self.description,
            image: self.image,
        }
    }
}

/// Per-field candidates. Each slot keeps its first non-empty value.
#[derive(Default)]
struct Candidates {
    og_title: String,
    title_element: String,
    og_description: String,
    meta_description: String,
    og_image: String,
}

fn set_first(slot: &mut String, value: &str) {
    if slot.is_empty() {
        slot.push_str(value);
    }
}

/// Scan `html` for preview metadata.
///
/// - `og:title` wins over the `<title>` element, wherever either appears
/// - `og:description` wins over `<meta name="description">`
/// - `og:image` is the only image source
///
/// Within one source the first occurrence wins. The `<title>` element only
/// contributes when the token right after its start tag is text.
pub fn scan_metadata(html: &str) -> PageMetadata {
    let mut found = Candidates::default();
    let mut tokens = Tokenizer::new(html);

    while let Some(token) = tokens.next() {
        let Token::StartTag(tag) = token else {
            continue;
        };

        match tag.name.as_str() {
            "meta" => {
                // The last `property` or `name` attribute names the tag
                let mut property = "";
                let mut content = "";
                for (key, value) in &tag.attrs {
                    match key.as_str() {
                        "property" | "name" => property = value.as_ref(),
                        "content" => content = value.as_ref(),
                        _ => {}
                    }
                }

                match property {
                    "og:title" => set_first(&mut found.og_title, content),
                    "og:description" => set_first(&mut found.og_description, content),
                    "og:image" => set_first(&mut found.og_image, content),
                    "description" => set_first(&mut found.meta_description, content),
                    _ => {}
                }
            }
            "title" if !tag.self_closing => {
                if let Some(Token::Text(text)) = tokens.next() {
                    set_first(&mut found.title_element, text.trim());
                }
            }
            _ => {}
        }
    }

    PageMetadata {
        title: first_non_empty(found.og_title, found.title_element),
        description: first_non_empty(found.og_description, found.meta_description),
        image: found.og_image,
    }
}

fn first_non_empty(preferred: String, fallback: String) -> String {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}
