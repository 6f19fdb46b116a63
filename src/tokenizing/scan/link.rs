/*
 * tokenizing/scan/link.rs
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

use super::Parsed;
use crate::definitions::is_scheme;
use crate::tokenizing::prelude::*;

#[inline]
fn is_scheme_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'.' || byte == b'-'
}

impl Tokenizer<'_> {
    /// Parse an internal wikilink at the head of the wikitext.
    ///
    /// `[[` followed by something that parses as a bracketed external link
    /// is the one construct where the two syntaxes collide; the external
    /// link interpretation wins, so that is attempted first.
    pub(crate) fn parse_wikilink(&mut self) -> ParseResult<()> {
        debug!("Parsing a wikilink");

        let reset = self.head + 1;
        self.head += 2;

        let mut extra = Textbuffer::new();
        match self.really_parse_external_link(true, &mut extra) {
            Err(_) => {
                self.head = reset + 1;

                match self.parse_tokens(Context::WIKILINK_TITLE, true) {
                    Err(_) => {
                        self.head = reset;
                        self.emit_text("[[");
                    }
                    Ok(wikilink) => {
                        self.emit(Token::WikilinkOpen);
                        self.emit_all(wikilink);
                        self.emit(Token::WikilinkClose);
                    }
                }
            }
            Ok(link) => {
                if self.context().contains(Context::EXT_LINK_TITLE) {
                    // In this exceptional case, an external link that looks
                    // like a wikilink inside of an external link is parsed
                    // as text:
                    self.head = reset;
                    self.emit_text("[[");
                    return Ok(());
                }

                self.emit_text("[");
                self.emit(Token::ExternalLinkOpen { brackets: true });
                self.emit_all(link);
                self.emit(Token::ExternalLinkClose);
            }
        }

        Ok(())
    }

    /// Handle the separator between a wikilink's title and its text (`|`).
    pub(crate) fn handle_wikilink_separator(&mut self) {
        *self.context_mut() -= Context::WIKILINK_TITLE;
        *self.context_mut() |= Context::WIKILINK_TEXT;
        self.emit(Token::WikilinkSeparator);
    }

    /// Handle the end of a wikilink (`]]`) at the head.
    pub(crate) fn handle_wikilink_end(&mut self) -> ParseResult<Parsed> {
        let stack = self.pop();
        self.head += 1;
        Ok(Parsed::Tokens(stack))
    }

    /// Parse the URI scheme of a bracket-enclosed external link.
    fn parse_bracketed_uri_scheme(&mut self) -> ParseResult<()> {
        self.check_route(Context::EXT_LINK_URI)?;
        self.push(Context::EXT_LINK_URI);

        if self.read(0) == b'/' && self.read(1) == b'/' {
            self.emit_text("//");
            self.head += 2;
            return Ok(());
        }

        let mut buffer = Textbuffer::new();
        let mut this = self.read(0);

        while this != b'\0' && is_scheme_byte(this) {
            buffer.write(this);
            self.emit_char(this);
            self.head += 1;
            this = self.read(0);
        }

        if this != b':' {
            return Err(self.fail_route());
        }

        self.emit_char(b':');
        self.head += 1;

        let slashes = self.read(0) == b'/' && self.read(1) == b'/';
        if slashes {
            self.emit_text("//");
            self.head += 2;
        }

        if !is_scheme(&buffer.export(), slashes) {
            return Err(self.fail_route());
        }

        Ok(())
    }

    /// Parse the URI scheme of a free (no brackets) external link.
    ///
    /// The scheme was already scanned as ordinary text, so it is recovered
    /// by walking the current textbuffer backwards until a non-word
    /// character.
    fn parse_free_uri_scheme(&mut self) -> ParseResult<()> {
        let mut scheme = Textbuffer::new();

        let buffer_len = self.top().textbuffer.len();
        for index in (0..buffer_len).rev() {
            let byte = self.top().textbuffer.read(index);
            if !byte.is_ascii_alphanumeric() && byte != b'_' {
                break;
            }
            scheme.write(byte);
        }

        scheme.reverse();

        let slashes = self.read(0) == b'/' && self.read(1) == b'/';
        if !is_scheme(&scheme.export(), slashes) {
            return Err(BadRoute {
                context: Context::empty(),
            });
        }

        let new_context = self.context() | Context::EXT_LINK_URI;
        self.check_route(new_context)?;
        self.push(new_context);

        self.emit_textbuffer(scheme);
        self.emit_char(b':');

        if slashes {
            self.emit_text("//");
            self.head += 2;
        }

        Ok(())
    }

    /// Handle text in a free external link, including trailing punctuation.
    ///
    /// Punctuation that would end a sentence collects in `tail`; it only
    /// becomes part of the link if more URI text follows it.
    fn handle_free_link_text(&mut self, parens: &mut bool, tail: &mut Textbuffer, this: u8) {
        if this == b'(' && !*parens {
            *parens = true;
            self.flush_tail(tail);
        } else if matches!(this, b',' | b';' | b'\\' | b'.' | b':' | b'!' | b'?')
            || (!*parens && this == b')')
        {
            tail.write(this);
            return;
        } else {
            self.flush_tail(tail);
        }

        self.emit_char(this);
    }

    /// Whether the current head is the end of a URI.
    fn is_uri_end(&self, this: u8, next: u8) -> bool {
        let after = self.read(2);
        let context = self.context();

        matches!(this, b'\0' | b'\n' | b'[' | b']' | b'<' | b'>' | b'"' | b' ')
            || (this == b'\'' && next == b'\'')
            || (this == b'|' && context.intersects(Context::TEMPLATE))
            || (this == b'='
                && context.intersects(Context::TEMPLATE_PARAM_KEY | Context::HEADING))
            || (this == b'}'
                && next == b'}'
                && (context.intersects(Context::TEMPLATE)
                    || (after == b'}' && context.intersects(Context::ARGUMENT))))
    }

    /// Really parse an external link, starting after its opening marker.
    fn really_parse_external_link(
        &mut self,
        brackets: bool,
        extra: &mut Textbuffer,
    ) -> ParseResult<TokenList> {
        if brackets {
            self.parse_bracketed_uri_scheme()?;
        } else {
            self.parse_free_uri_scheme()?;
        }

        let this = self.read(0);
        if this == b'\0' || this == b'\n' || this == b' ' || this == b']' {
            return Err(self.fail_route());
        }
        if !brackets && this == b'[' {
            return Err(self.fail_route());
        }

        let mut parens = false;

        loop {
            let this = self.read(0);
            let next = self.read(1);

            if this == b'&' {
                self.flush_tail(extra);
                self.parse_entity()?;
            } else if this == b'<'
                && next == b'!'
                && self.read(2) == b'-'
                && self.read(3) == b'-'
            {
                self.flush_tail(extra);
                self.parse_comment()?;
            } else if this == b'{' && next == b'{' && self.can_recurse() {
                self.flush_tail(extra);
                self.parse_template_or_argument()?;
            } else if brackets {
                if this == b'\0' || this == b'\n' {
                    return Err(self.fail_route());
                }
                if this == b']' {
                    return Ok(self.pop());
                }
                if self.is_uri_end(this, next) {
                    let space = this == b' ';

                    self.emit(Token::ExternalLinkSeparator { space });
                    if space {
                        // A literal space belongs to the separator itself
                        self.head += 1;
                    }

                    *self.context_mut() -= Context::EXT_LINK_URI;
                    *self.context_mut() |= Context::EXT_LINK_TITLE;
                    return self.parse_tokens(Context::empty(), false);
                }
                self.emit_char(this);
            } else {
                if self.is_uri_end(this, next) {
                    if this == b' ' {
                        extra.write(this);
                    } else {
                        self.head -= 1;
                    }
                    return Ok(self.pop());
                }
                self.handle_free_link_text(&mut parens, extra, this);
            }

            self.head += 1;
        }
    }

    /// Remove a free link's URI scheme from the enclosing textbuffer.
    ///
    /// The scheme's characters were scanned as plain text before the link
    /// was recognized, and have since been re-emitted as the link's first
    /// tokens; the stale copy must not be emitted too.
    fn remove_uri_scheme_from_textbuffer(&mut self, link: &[Token]) {
        let scheme_len = match link.first().and_then(Token::text) {
            Some(text) => text.find(':').unwrap_or(0),
            None => 0,
        };

        let buffer = &mut self.top_mut().textbuffer;
        let keep = buffer.len().saturating_sub(scheme_len);
        buffer.truncate(keep);
    }

    /// Parse an external link at the head of the wikitext.
    ///
    /// `brackets` distinguishes `[scheme://…]` from a bare `scheme://…`
    /// recognized at a `:` in running text.
    pub(crate) fn parse_external_link(&mut self, brackets: bool) -> ParseResult<()> {
        debug!("Parsing an external link (brackets {brackets})");

        let reset = self.head;

        if self.context().intersects(Context::NO_EXT_LINKS) || !self.can_recurse() {
            return self.not_a_link(brackets);
        }

        let mut extra = Textbuffer::new();
        self.head += 1;

        match self.really_parse_external_link(brackets, &mut extra) {
            Err(_) => {
                self.head = reset;
                self.not_a_link(brackets)
            }
            Ok(link) => {
                if !brackets {
                    self.remove_uri_scheme_from_textbuffer(&link);
                }

                self.emit(Token::ExternalLinkOpen { brackets });
                self.emit_all(link);
                self.emit(Token::ExternalLinkClose);

                if !extra.is_empty() {
                    self.emit_textbuffer(extra);
                }

                Ok(())
            }
        }
    }

    /// Give up on parsing a link here and emit the current character as
    /// whatever it would otherwise have been.
    fn not_a_link(&mut self, brackets: bool) -> ParseResult<()> {
        if !brackets && self.context().contains(Context::DL_TERM) {
            self.handle_dl_term();
        } else {
            let this = self.read(0);
            self.emit_char(this);
        }
        Ok(())
    }
}
