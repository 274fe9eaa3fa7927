use std::collections::{HashMap, HashSet};

use ammonia::Builder;

const ALLOWED_TAGS: [&str; 15] = [
    "p",
    "br",
    "strong",
    "em",
    "ul",
    "ol",
    "li",
    "a",
    "h1",
    "h2",
    "h3",
    "h4",
    "blockquote",
    "code",
    "pre",
];

const ALLOWED_ATTRIBUTES: [&str; 3] = ["href", "title", "alt"];

/// Cleans rich text against the post allow-list: unknown tags are unwrapped,
/// `script`/`style` are dropped with their content, unknown attributes are removed.
pub(crate) fn sanitize_html(raw: &str) -> String {
    let mut builder = Builder::default();
    builder
        .tags(HashSet::from(ALLOWED_TAGS))
        .tag_attributes(HashMap::new())
        .generic_attributes(HashSet::from(ALLOWED_ATTRIBUTES))
        .link_rel(None);

    builder.clean(raw).to_string()
}
