/*
 * test/mod.rs
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

//! End-to-end scenarios for the tokenizer: one input, one expected stream.

mod properties;

use crate::tokenizing::{detokenize, tokenize, Token};
use self::Token::*;

macro_rules! test {
    ($input:expr, $expected:expr $(,)?) => {{
        let actual = tokenize($input, false);
        assert_eq!(
            actual, $expected,
            "Token stream for {:?} does not match expected",
            $input,
        );
    }};
}

#[test]
fn plain_text() {
    assert_eq!(tokenize("", false), Vec::<Token>::new());

    test!("foo", [text!("foo")]);
    test!("foo bar\nbaz", [text!("foo bar\nbaz")]);
    test!("café conquête", [text!("café conquête")]);
}

#[test]
fn templates() {
    test!("{{x}}", [TemplateOpen, text!("x"), TemplateClose]);

    test!(
        "{{x|y=z}}",
        [
            TemplateOpen,
            text!("x"),
            TemplateParamSeparator,
            text!("y"),
            TemplateParamEquals,
            text!("z"),
            TemplateClose,
        ],
    );

    test!(
        "{{x|a|b}}",
        [
            TemplateOpen,
            text!("x"),
            TemplateParamSeparator,
            text!("a"),
            TemplateParamSeparator,
            text!("b"),
            TemplateClose,
        ],
    );

    // Nested: the inner template closes the outer's name requirement
    test!(
        "{{a{{b}}}}",
        [
            TemplateOpen,
            text!("a"),
            TemplateOpen,
            text!("b"),
            TemplateClose,
            TemplateClose,
        ],
    );
}

#[test]
fn templates_unterminated() {
    test!("{{a", [text!("{{a")]);
    test!("{{}}", [text!("{{}}")]);
    test!("{{ }}", [text!("{{ }}")]);
    test!("{{a|", [text!("{{a|")]);
}

#[test]
fn arguments() {
    test!("{{{x}}}", [ArgumentOpen, text!("x"), ArgumentClose]);

    test!(
        "{{{x|d}}}",
        [
            ArgumentOpen,
            text!("x"),
            ArgumentSeparator,
            text!("d"),
            ArgumentClose,
        ],
    );

    // Five braces: an argument inside a template
    test!(
        "{{{{{x}}}}}",
        [
            TemplateOpen,
            ArgumentOpen,
            text!("x"),
            ArgumentClose,
            TemplateClose,
        ],
    );

    // Four braces: one literal brace, then an argument
    test!(
        "{{{{x}}}}",
        [
            text!("{"),
            ArgumentOpen,
            text!("x"),
            ArgumentClose,
            text!("}"),
        ],
    );
}

#[test]
fn wikilinks() {
    test!(
        "[[a]]",
        [WikilinkOpen, text!("a"), WikilinkClose],
    );

    test!(
        "[[a|b]]",
        [
            WikilinkOpen,
            text!("a"),
            WikilinkSeparator,
            text!("b"),
            WikilinkClose,
        ],
    );

    // Templates are allowed inside wikilink titles
    test!(
        "[[{{x}}]]",
        [
            WikilinkOpen,
            TemplateOpen,
            text!("x"),
            TemplateClose,
            WikilinkClose,
        ],
    );

    test!("[[a]", [text!("[[a]")]);
    test!("[[a{b]]", [text!("[[a{b]]")]);
    test!("[[a\nb]]", [text!("[[a\nb]]")]);
}

#[test]
fn external_links() {
    test!(
        "[http://e.com t]",
        [
            ExternalLinkOpen { brackets: true },
            text!("http://e.com"),
            ExternalLinkSeparator { space: true },
            text!("t"),
            ExternalLinkClose,
        ],
    );

    test!(
        "[http://e.com]",
        [
            ExternalLinkOpen { brackets: true },
            text!("http://e.com"),
            ExternalLinkClose,
        ],
    );

    // Invalid scheme degrades to a bracketed span of plain text
    test!("[nope://e.com]", [text!("[nope://e.com]")]);
    test!("[no scheme here]", [text!("[no scheme here]")]);
}

#[test]
fn free_links() {
    test!(
        "see http://x.com. end",
        [
            text!("see "),
            ExternalLinkOpen { brackets: false },
            text!("http://x.com"),
            ExternalLinkClose,
            text!(". end"),
        ],
    );

    // Trailing punctuation stays out of the URI unless it continues
    test!(
        "at http://x.com/a.b no",
        [
            text!("at "),
            ExternalLinkOpen { brackets: false },
            text!("http://x.com/a.b"),
            ExternalLinkClose,
            text!(" no"),
        ],
    );

    // Authority-optional schemes work without slashes
    test!(
        "mailto:a@b.c done",
        [
            ExternalLinkOpen { brackets: false },
            text!("mailto:a@b.c"),
            ExternalLinkClose,
            text!(" done"),
        ],
    );

    // "http" requires slashes, so this stays text
    test!("http:nope stays", [text!("http:nope stays")]);
}

#[test]
fn headings() {
    test!(
        "== h ==\n",
        [
            HeadingStart { level: 2 },
            text!(" h "),
            HeadingEnd,
            text!("\n"),
        ],
    );

    test!(
        "=x=",
        [HeadingStart { level: 1 }, text!("x"), HeadingEnd],
    );

    // Uneven runs: the lower level wins, surplus markers are literal
    test!(
        "=== h ==\n",
        [
            HeadingStart { level: 2 },
            text!("= h "),
            HeadingEnd,
            text!("\n"),
        ],
    );

    // A newline kills an open heading
    test!("== h\n", [text!("== h\n")]);

    // Not at line start
    test!("x == h ==", [text!("x == h ==")]);
}

#[test]
fn entities() {
    test!(
        "&amp;",
        [HtmlEntityStart, text!("amp"), HtmlEntityEnd],
    );

    test!(
        "&#102;",
        [HtmlEntityStart, HtmlEntityNumeric, text!("102"), HtmlEntityEnd],
    );

    test!(
        "&#x10FFFF;",
        [
            HtmlEntityStart,
            HtmlEntityNumeric,
            HtmlEntityHex,
            text!("10FFFF"),
            HtmlEntityEnd,
        ],
    );

    // Leading zeros are preserved but don't count against the length cap
    test!(
        "&#010;",
        [HtmlEntityStart, HtmlEntityNumeric, text!("010"), HtmlEntityEnd],
    );

    test!(
        "&#1;",
        [HtmlEntityStart, HtmlEntityNumeric, text!("1"), HtmlEntityEnd],
    );
}

#[test]
fn entities_invalid() {
    test!("&#0;", [text!("&#0;")]);
    test!("&#x110000;", [text!("&#x110000;")]);
    test!("&abcdefghi;", [text!("&abcdefghi;")]);
    test!("&amp", [text!("&amp")]);
    test!("&;", [text!("&;")]);
    test!("& amp;", [text!("& amp;")]);
}

#[test]
fn comments() {
    test!(
        "a<!--b-->c",
        [text!("a"), CommentStart, text!("b"), CommentEnd, text!("c")],
    );

    test!("<!---->", [CommentStart, CommentEnd]);
    test!("a<!--b", [text!("a<!--b")]);
}

#[test]
fn tags() {
    test!(
        "<ref>x</ref>",
        [
            TagOpenOpen,
            text!("ref"),
            TagCloseOpen,
            text!("x"),
            TagOpenClose,
            text!("ref"),
            TagCloseClose,
        ],
    );

    test!(
        "<a b=\"c\">x</a>",
        [
            TagOpenOpen,
            text!("a"),
            TagAttrStart,
            text!("b"),
            TagAttrEquals,
            TagAttrQuote { quote: '"' },
            text!("c"),
            TagCloseOpen,
            text!("x"),
            TagOpenClose,
            text!("a"),
            TagCloseClose,
        ],
    );

    test!(
        "<a b=c>x</a>",
        [
            TagOpenOpen,
            text!("a"),
            TagAttrStart,
            text!("b"),
            TagAttrEquals,
            text!("c"),
            TagCloseOpen,
            text!("x"),
            TagOpenClose,
            text!("a"),
            TagCloseClose,
        ],
    );

    // Close tag must match the open tag
    test!("<i>x</b>", [text!("<i>x</b>")]);

    // Unterminated open tag
    test!("<i>x", [text!("<i>x")]);
    test!("< a>", [text!("< a>")]);
}

#[test]
fn single_only_tags() {
    test!(
        "<br>",
        [
            TagOpenOpen,
            text!("br"),
            TagCloseSelfclose { implicit: true },
        ],
    );

    test!(
        "<br/>",
        [
            TagOpenOpen,
            text!("br"),
            TagCloseSelfclose { implicit: false },
        ],
    );

    // A closing form of a single-only tag reads as another opening
    test!(
        "</br>",
        [
            TagOpenOpen,
            text!("br"),
            TagCloseSelfclose { implicit: true },
        ],
    );

    test!("</div>", [text!("</div>")]);
}

#[test]
fn blacklisted_tags() {
    test!(
        "<nowiki>''x''</nowiki>",
        [
            TagOpenOpen,
            text!("nowiki"),
            TagCloseOpen,
            text!("''x''"),
            TagOpenClose,
            text!("nowiki"),
            TagCloseClose,
        ],
    );

    // Entities are still live inside a blacklisted body
    test!(
        "<nowiki>&amp;</nowiki>",
        [
            TagOpenOpen,
            text!("nowiki"),
            TagCloseOpen,
            HtmlEntityStart,
            text!("amp"),
            HtmlEntityEnd,
            TagOpenClose,
            text!("nowiki"),
            TagCloseClose,
        ],
    );

    test!("<nowiki>x", [text!("<nowiki>x")]);
}

#[test]
fn styles() {
    test!(
        "''x''",
        [ItalicOpen, text!("x"), ItalicClose],
    );

    test!(
        "'''x'''",
        [BoldOpen, text!("x"), BoldClose],
    );

    test!(
        "'''''x'''''",
        [ItalicOpen, BoldOpen, text!("x"), BoldClose, ItalicClose],
    );

    // Four ticks: one literal apostrophe, then bold
    test!(
        "''''x'''",
        [text!("'"), BoldOpen, text!("x"), BoldClose],
    );

    // Six ticks: one literal apostrophe, then bold italics
    test!(
        "''''''x'''''",
        [
            text!("'"),
            ItalicOpen,
            BoldOpen,
            text!("x"),
            BoldClose,
            ItalicClose,
        ],
    );

    test!("''x", [text!("''x")]);
}

#[test]
fn skip_style_tags() {
    let actual = tokenize("''x''", true);
    assert_eq!(actual, vec![text!("''x''")]);
}

#[test]
fn lists() {
    test!("* item", [UnorderedListItem, text!(" item")]);
    test!("# item", [OrderedListItem, text!(" item")]);
    test!("#*x", [OrderedListItem, UnorderedListItem, text!("x")]);
    test!(
        "a\n* b",
        [text!("a\n"), UnorderedListItem, text!(" b")],
    );

    // Not at line start
    test!("a * b", [text!("a * b")]);
}

#[test]
fn description_lists() {
    test!(
        ";a:b",
        [
            DescriptionTerm,
            text!("a"),
            DescriptionItem,
            text!("b"),
        ],
    );

    test!(";a\nb", [DescriptionTerm, text!("a\nb")]);
}

#[test]
fn horizontal_rules() {
    test!("----", [HorizontalRule]);
    test!("--------", [HorizontalRule]);
    test!("----\nx", [HorizontalRule, text!("\nx")]);
    test!("---", [text!("---")]);
    test!("x----", [text!("x----")]);
}

#[test]
fn tables() {
    test!(
        "{|\n|a\n|}",
        [
            TagOpenOpen,
            text!("table"),
            TagCloseOpen,
            TagOpenOpen,
            text!("td"),
            TagCloseOpen,
            text!("a\n"),
            TagOpenClose,
            text!("td"),
            TagCloseClose,
            TagOpenClose,
            text!("table"),
            TagCloseClose,
        ],
    );

    test!(
        "{|\n|-\n|a\n|}",
        [
            TagOpenOpen,
            text!("table"),
            TagCloseOpen,
            TagOpenOpen,
            text!("tr"),
            TagCloseOpen,
            TagOpenOpen,
            text!("td"),
            TagCloseOpen,
            text!("a\n"),
            TagOpenClose,
            text!("td"),
            TagCloseClose,
            TagOpenClose,
            text!("tr"),
            TagCloseClose,
            TagOpenClose,
            text!("table"),
            TagCloseClose,
        ],
    );

    // Cells may carry a style prefix ended by a single pipe
    test!(
        "{|\n|align=left|a\n|}",
        [
            TagOpenOpen,
            text!("table"),
            TagCloseOpen,
            TagOpenOpen,
            text!("td"),
            TagAttrStart,
            text!("align"),
            TagAttrEquals,
            text!("left"),
            TagCloseOpen,
            text!("a\n"),
            TagOpenClose,
            text!("td"),
            TagCloseClose,
            TagOpenClose,
            text!("table"),
            TagCloseClose,
        ],
    );

    // Unterminated table degrades to text
    test!("{|\n|a", [text!("{|\n|a")]);

    // Not at line start
    test!("x{|\n|}", [text!("x{|\n|}")]);
}

#[test]
fn header_cells() {
    test!(
        "{|\n!h\n|}",
        [
            TagOpenOpen,
            text!("table"),
            TagCloseOpen,
            TagOpenOpen,
            text!("th"),
            TagCloseOpen,
            text!("h\n"),
            TagOpenClose,
            text!("th"),
            TagCloseClose,
            TagOpenClose,
            text!("table"),
            TagCloseClose,
        ],
    );
}

#[test]
fn brace_runs() {
    // 255 braces is the cap; the rest are literal
    let mut input = "{".repeat(300);
    input.push('x');

    let tokens = tokenize(&input, false);
    assert_eq!(
        detokenize(&tokens),
        input,
        "Brace run did not round-trip as text",
    );
}

#[test]
fn detokenize_round_trip() {
    // Serializing a stream and tokenizing the result must reproduce the
    // stream, for well-formed and degraded constructs alike. Where the
    // serialization is canonical rather than byte-exact (rule length,
    // implicit closes, table markup), the fixpoint still holds.
    const INPUTS: &[&str] = &[
        "foo",
        "{{x}}",
        "{{x|y=z}}",
        "{{a{{b}}}}",
        "{{a",
        "{{}}",
        "{{{x|d}}}",
        "{{{{x}}}}",
        "[[a|b]]",
        "[[{{x}}]]",
        "[[a]",
        "[http://e.com t]",
        "[http://e.com]",
        "[nope://e.com]",
        "see http://x.com. end",
        "mailto:a@b.c done",
        "http:nope stays",
        "== h ==\n",
        "=== h ==\n",
        "== h\n",
        "&amp;",
        "&#010;",
        "&#x10FFFF;",
        "&#0;",
        "a<!--b-->c",
        "a<!--b",
        "<ref>x</ref>",
        "<a b=\"c\">x</a>",
        "<a b=c>x</a>",
        "<i>x</b>",
        "<br>",
        "<br/>",
        "</br>",
        "</div>",
        "<nowiki>''x''</nowiki>",
        "<nowiki>x",
        "''x''",
        "'''x'''",
        "'''''x'''''",
        "''''x'''",
        "''x",
        "* item",
        "#*x",
        ";a:b",
        ";a\nb",
        "----",
        "--------",
        "x----",
        "{|\n|a\n|}",
        "{|\n|-\n|a\n|}",
        "{|\n|align=left|a\n|}",
        "{|\n!h\n|}",
        "{|\n|a",
        "x{|\n|}",
    ];

    for input in INPUTS {
        let tokens = tokenize(input, false);
        let text = detokenize(&tokens);

        assert_eq!(
            tokenize(&text, false),
            tokens,
            "Round trip for {input:?} (via {text:?}) changed the stream",
        );
    }
}
