// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Helpful utilities for working with text returned by the Reddit API.

use htmlentity::entity::{self, ICodedDataTrait};

/// Converts HTML entities into their single-character equivalents.
///
/// Reddit escapes "&" as "&amp;", ">" as "&gt;", and "<" as "&lt;" in
/// comment bodies, self posts, and titles unless a request asks for raw
/// JSON; this function converts those HTML entities back into single,
/// human-readable characters.
///
/// # Examples
///
/// ```
/// use arraw::text::convert_html_entities;
/// let raw = "&lt;This &amp; That&gt;";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// Surrounding whitespace is significant in Markdown, so it is kept:
///
/// ```
/// use arraw::text::convert_html_entities;
/// let raw = "    indented &amp; code";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "    indented & code");
/// ```
///
/// ```
/// use arraw::text::convert_html_entities;
/// let raw = "";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, raw);
/// ```
pub fn convert_html_entities(text: &str) -> String {
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or(text.to_string())
}

/// Splits a fullname such as `t3_2gmzqe` into its kind prefix and base36 id.
///
/// Returns `None` if `fullname` does not have the `<kind>_<id>` shape.
///
/// # Examples
///
/// ```
/// use arraw::text::split_fullname;
/// assert_eq!(split_fullname("t3_2gmzqe"), Some(("t3", "2gmzqe")));
/// assert_eq!(split_fullname("2gmzqe"), None);
/// ```
pub fn split_fullname(fullname: &str) -> Option<(&str, &str)> {
    let (kind, id) = fullname.split_once('_')?;
    if kind.is_empty() || id.is_empty() {
        None
    } else {
        Some((kind, id))
    }
}
