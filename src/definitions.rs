/*
 * definitions.rs
 *
 * mwtok - Library to tokenize MediaWiki wikitext
 * Copyright (C) 2019-2025 Wikijump Team
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

//! Static tag and URI scheme tables consulted by the tokenizer.
//!
//! These lists should be kept up to date with MediaWiki's own registries.

use unicase::UniCase;

/// URI schemes which are valid in external links when followed by `//`.
pub const URI_SCHEMES: [&str; 27] = [
    "bitcoin",
    "ftp",
    "ftps",
    "geo",
    "git",
    "gopher",
    "http",
    "https",
    "irc",
    "ircs",
    "magnet",
    "mailto",
    "mms",
    "news",
    "nntp",
    "redis",
    "sftp",
    "sip",
    "sips",
    "sms",
    "ssh",
    "svn",
    "tel",
    "telnet",
    "urn",
    "worldwind",
    "xmpp",
];

/// URI schemes which do not need an authority component (the `//` part).
pub const URI_SCHEMES_AUTHORITY_OPTIONAL: [&str; 11] = [
    "bitcoin", "geo", "magnet", "mailto", "news", "sip", "sips", "sms", "tel", "urn", "xmpp",
];

/// Tag names whose bodies are emitted as literal text, not re-parsed.
pub const PARSER_BLACKLIST: [&str; 17] = [
    "categorytree",
    "ce",
    "chem",
    "gallery",
    "graph",
    "hiero",
    "imagemap",
    "inputbox",
    "math",
    "nowiki",
    "pre",
    "score",
    "section",
    "source",
    "syntaxhighlight",
    "templatedata",
    "timeline",
];

/// Tag names which may exist without a closing form.
pub const SINGLE: [&str; 12] = [
    "br", "wbr", "hr", "meta", "link", "img", "li", "dt", "dd", "th", "td", "tr",
];

/// Tag names which must exist without a closing form.
pub const SINGLE_ONLY: [&str; 6] = ["br", "wbr", "hr", "meta", "link", "img"];

fn in_list(name: &str, list: &[&str]) -> bool {
    let name = UniCase::ascii(name);
    list.iter().any(|&entry| name == UniCase::ascii(entry))
}

/// Return whether the given tag's contents should be passed to the parser.
#[inline]
pub fn is_parsable(tag: &str) -> bool {
    !in_list(tag, &PARSER_BLACKLIST)
}

/// Return whether the given tag can exist without a close tag.
#[inline]
pub fn is_single(tag: &str) -> bool {
    in_list(tag, &SINGLE)
}

/// Return whether the given tag must exist without a close tag.
#[inline]
pub fn is_single_only(tag: &str) -> bool {
    in_list(tag, &SINGLE_ONLY)
}

/// Return whether the given scheme is valid for external links.
///
/// Schemes followed by an authority component (`//`) check against the full
/// scheme table; schemes without one must be in the authority-optional table.
/// The comparison is whole-string equality, so e.g. `"http"` does not pass
/// for `"https"` or vice versa.
pub fn is_scheme(scheme: &str, slashes: bool) -> bool {
    if slashes {
        in_list(scheme, &URI_SCHEMES)
    } else {
        in_list(scheme, &URI_SCHEMES_AUTHORITY_OPTIONAL)
    }
}

#[test]
fn schemes() {
    assert!(is_scheme("http", true));
    assert!(is_scheme("https", true));
    assert!(is_scheme("mailto", false));

    // Whole-string comparison, not prefix
    assert!(!is_scheme("http", false));
    assert!(!is_scheme("htt", true));
    assert!(!is_scheme("httpss", true));
    assert!(!is_scheme("", true));
    assert!(!is_scheme("", false));
}

#[test]
fn tags() {
    assert!(is_single_only("br"));
    assert!(is_single_only("BR"));
    assert!(!is_single_only("li"));
    assert!(is_single("li"));
    assert!(is_single("br"));
    assert!(!is_single("div"));
    assert!(!is_parsable("nowiki"));
    assert!(!is_parsable("Math"));
    assert!(is_parsable("div"));
    assert!(is_parsable("ref"));
}
