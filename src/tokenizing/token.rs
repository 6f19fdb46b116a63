/*
 * tokenizing/token.rs
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

use strum_macros::IntoStaticStr;

/// A flat, ordered sequence of tokens, as emitted by the tokenizer.
pub type TokenList = Vec<Token>;

/// One token of scanned wikitext.
///
/// Tokens are emitted in left-to-right scan order. Adjacent text is always
/// merged: no two `Text` tokens ever appear side by side in an emitted
/// stream, and `Text` payloads are never empty.
#[derive(Serialize, Deserialize, IntoStaticStr, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Token {
    //
    // Plain text
    //
    Text(String),

    //
    // Templates
    //
    TemplateOpen,
    TemplateParamSeparator,
    TemplateParamEquals,
    TemplateClose,

    //
    // Template arguments
    //
    ArgumentOpen,
    ArgumentSeparator,
    ArgumentClose,

    //
    // Wikilinks
    //
    WikilinkOpen,
    WikilinkSeparator,
    WikilinkClose,

    //
    // External links
    //
    ExternalLinkOpen { brackets: bool },
    ExternalLinkSeparator { space: bool },
    ExternalLinkClose,

    //
    // HTML entities
    //
    HtmlEntityStart,
    HtmlEntityNumeric,
    HtmlEntityHex,
    HtmlEntityEnd,

    //
    // Headings
    //
    HeadingStart { level: u8 },
    HeadingEnd,

    //
    // Comments
    //
    CommentStart,
    CommentEnd,

    //
    // HTML tags
    //
    TagOpenOpen,
    TagAttrStart,
    TagAttrEquals,
    TagAttrQuote { quote: char },
    TagCloseOpen,
    TagCloseSelfclose { implicit: bool },
    TagOpenClose,
    TagCloseClose,

    //
    // Bold and italics
    //
    ItalicOpen,
    ItalicClose,
    BoldOpen,
    BoldClose,

    //
    // Lists and rules
    //
    OrderedListItem,
    UnorderedListItem,
    DescriptionTerm,
    DescriptionItem,
    HorizontalRule,
}

impl Token {
    /// The name of this token's variant, without any payload.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.into()
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }

    /// The text payload, if this is a `Text` token.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Reassemble a token stream into wikitext source.
///
/// Each token contributes the literal span it was scanned from. Where the
/// tokenizer does not retain the exact bytes (horizontal rule length,
/// whitespace inside tags, implicitly closed tags, table markup), a
/// canonical spelling is chosen whose tokenization is the same stream, so
/// for any stream this function produces, tokenizing the result yields the
/// stream back.
///
/// A few spans depend on surrounding stream state rather than the token
/// alone: external link closes mirror their open's `brackets`, a heading's
/// closing run repeats its opening level, and a quoted attribute value is
/// re-closed just before the attribute area it belongs to ends.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut link_brackets: Vec<bool> = Vec::new();
    let mut heading_levels: Vec<u8> = Vec::new();

    // Open quoted attribute values, each with the tag nesting depth it was
    // opened at. Values may contain whole nested tags, which must not close
    // the quote early.
    let mut open_quotes: Vec<(char, usize)> = Vec::new();
    let mut tag_depth: usize = 0;

    for token in tokens {
        if let Some(&(quote, depth)) = open_quotes.last() {
            let ends_attr_area = matches!(
                token,
                Token::TagAttrStart
                    | Token::TagCloseOpen
                    | Token::TagCloseSelfclose { .. },
            );

            if depth == tag_depth && ends_attr_area {
                text.push(quote);
                open_quotes.pop();
            }
        }

        match token {
            Token::Text(payload) => text.push_str(payload),

            Token::TemplateOpen => text.push_str("{{"),
            Token::TemplateParamSeparator => text.push('|'),
            Token::TemplateParamEquals => text.push('='),
            Token::TemplateClose => text.push_str("}}"),

            Token::ArgumentOpen => text.push_str("{{{"),
            Token::ArgumentSeparator => text.push('|'),
            Token::ArgumentClose => text.push_str("}}}"),

            Token::WikilinkOpen => text.push_str("[["),
            Token::WikilinkSeparator => text.push('|'),
            Token::WikilinkClose => text.push_str("]]"),

            Token::ExternalLinkOpen { brackets } => {
                link_brackets.push(*brackets);
                if *brackets {
                    text.push('[');
                }
            }
            Token::ExternalLinkSeparator { space } => {
                if *space {
                    text.push(' ');
                }
            }
            Token::ExternalLinkClose => {
                if link_brackets.pop().unwrap_or(false) {
                    text.push(']');
                }
            }

            Token::HtmlEntityStart => text.push('&'),
            Token::HtmlEntityNumeric => text.push('#'),
            Token::HtmlEntityHex => text.push('x'),
            Token::HtmlEntityEnd => text.push(';'),

            Token::HeadingStart { level } => {
                heading_levels.push(*level);
                text.push_str(&"=".repeat(usize::from(*level)));
            }
            Token::HeadingEnd => {
                let level = heading_levels.pop().unwrap_or(1);
                text.push_str(&"=".repeat(usize::from(level)));
            }

            Token::CommentStart => text.push_str("<!--"),
            Token::CommentEnd => text.push_str("-->"),

            Token::TagOpenOpen => {
                tag_depth += 1;
                text.push('<');
            }
            Token::TagAttrStart => text.push(' '),
            Token::TagAttrEquals => text.push('='),
            Token::TagAttrQuote { quote } => {
                text.push(*quote);
                open_quotes.push((*quote, tag_depth));
            }
            Token::TagCloseOpen => text.push('>'),
            Token::TagCloseSelfclose { implicit } => {
                tag_depth = tag_depth.saturating_sub(1);
                text.push_str(if *implicit { ">" } else { "/>" });
            }
            Token::TagOpenClose => text.push_str("</"),
            Token::TagCloseClose => {
                tag_depth = tag_depth.saturating_sub(1);
                text.push('>');
            }

            Token::ItalicOpen | Token::ItalicClose => text.push_str("''"),
            Token::BoldOpen | Token::BoldClose => text.push_str("'''"),

            Token::OrderedListItem => text.push('#'),
            Token::UnorderedListItem => text.push('*'),
            Token::DescriptionTerm => text.push(';'),
            Token::DescriptionItem => text.push(':'),
            Token::HorizontalRule => text.push_str("----"),
        }
    }

    text
}

#[test]
fn names() {
    assert_eq!(Token::Text(String::from("abc")).name(), "Text");
    assert_eq!(Token::TemplateOpen.name(), "TemplateOpen");
    assert_eq!(
        Token::ExternalLinkOpen { brackets: false }.name(),
        "ExternalLinkOpen",
    );
    assert_eq!(Token::HeadingStart { level: 3 }.name(), "HeadingStart");
}

#[test]
fn text_payload() {
    let token = Token::Text(String::from("abc"));
    assert!(token.is_text());
    assert_eq!(token.text(), Some("abc"));

    let token = Token::HorizontalRule;
    assert!(!token.is_text());
    assert_eq!(token.text(), None);
}

#[test]
fn detokenize_fixed_spans() {
    let tokens = vec![
        Token::TemplateOpen,
        text!("x"),
        Token::TemplateParamSeparator,
        text!("y"),
        Token::TemplateParamEquals,
        text!("z"),
        Token::TemplateClose,
    ];
    assert_eq!(detokenize(&tokens), "{{x|y=z}}");

    let tokens = vec![
        Token::HtmlEntityStart,
        Token::HtmlEntityNumeric,
        Token::HtmlEntityHex,
        text!("1F"),
        Token::HtmlEntityEnd,
    ];
    assert_eq!(detokenize(&tokens), "&#x1F;");

    let tokens = vec![
        Token::CommentStart,
        text!("note"),
        Token::CommentEnd,
    ];
    assert_eq!(detokenize(&tokens), "<!--note-->");
}

#[test]
fn detokenize_stateful_spans() {
    // External link closes mirror their open's brackets
    let tokens = vec![
        Token::ExternalLinkOpen { brackets: true },
        text!("http://e.com"),
        Token::ExternalLinkSeparator { space: true },
        text!("t"),
        Token::ExternalLinkClose,
    ];
    assert_eq!(detokenize(&tokens), "[http://e.com t]");

    let tokens = vec![
        Token::ExternalLinkOpen { brackets: false },
        text!("http://e.com"),
        Token::ExternalLinkClose,
    ];
    assert_eq!(detokenize(&tokens), "http://e.com");

    // The closing run repeats the heading's level; surplus markers from the
    // source live on in the title text
    let tokens = vec![
        Token::HeadingStart { level: 2 },
        text!("= h "),
        Token::HeadingEnd,
    ];
    assert_eq!(detokenize(&tokens), "=== h ==");

    // Quoted attribute values are re-closed before the tag is
    let tokens = vec![
        Token::TagOpenOpen,
        text!("a"),
        Token::TagAttrStart,
        text!("b"),
        Token::TagAttrEquals,
        Token::TagAttrQuote { quote: '"' },
        text!("c"),
        Token::TagCloseOpen,
        text!("x"),
        Token::TagOpenClose,
        text!("a"),
        Token::TagCloseClose,
    ];
    assert_eq!(detokenize(&tokens), "<a b=\"c\">x</a>");

    // Implicit self-closes stand for the plain `>` of their open tag
    let tokens = vec![
        Token::TagOpenOpen,
        text!("br"),
        Token::TagCloseSelfclose { implicit: true },
    ];
    assert_eq!(detokenize(&tokens), "<br>");

    let tokens = vec![
        Token::TagOpenOpen,
        text!("br"),
        Token::TagCloseSelfclose { implicit: false },
    ];
    assert_eq!(detokenize(&tokens), "<br/>");
}
