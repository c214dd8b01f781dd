//! URI template resolution for link hrefs.
//!
//! Templated hrefs (RFC6570) are dereferenced by their literal prefix: the
//! text before the first template expression. Values for the variables are
//! never substituted here; callers pass them as query parameters instead.
//!
//! ```rust
//! use hal_client::hal::{template, Link};
//!
//! assert_eq!(template::resolve(&Link::templated("/users{?page,size,sort}")), "/users");
//! assert_eq!(template::resolve(&Link::templated("/items/{id}")), "/items");
//! assert_eq!(template::resolve(&Link::new("/items/{id}")), "/items/{id}");
//! ```

use crate::hal::link::Link;

/// Returns the URL to dereference for a link.
///
/// Non-templated links are returned unchanged, even if their href contains
/// braces.
#[must_use]
pub fn resolve(link: &Link) -> String {
    if link.templated {
        strip_template_vars(&link.href)
    } else {
        link.href.clone()
    }
}

/// Cuts an href at its first template expression.
///
/// An expression is a `{` followed by a `}` with no other brace in between;
/// every operator form (`{id}`, `{?page,size}`, `{+path}`, `{/segments*}`)
/// qualifies. A `{` without a matching `}` is literal text. A `/` left
/// dangling by the cut is removed, so `/items/{id}` becomes `/items`.
#[must_use]
pub fn strip_template_vars(href: &str) -> String {
    let mut search_from = 0;
    while let Some(offset) = href[search_from..].find('{') {
        let open = search_from + offset;
        let rest = &href[open + 1..];
        match rest.find(['{', '}']) {
            Some(i) if rest.as_bytes()[i] == b'}' => return trim_dangling_slash(&href[..open]),
            _ => search_from = open + 1,
        }
    }
    href.to_string()
}

fn trim_dangling_slash(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() || trimmed.ends_with(':') {
        prefix.to_string()
    } else {
        trimmed.to_string()
    }
}
