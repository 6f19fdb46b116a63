/*
 * tokenizing/scan/tag.rs
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

use super::{is_marker, Parsed};
use crate::definitions::{is_parsable, is_single_only};
use crate::tokenizing::prelude::*;
use unicase::UniCase;

/// Sanitize a tag name so it can be compared with others for equality:
/// trailing whitespace is ignored and the comparison is case-insensitive.
fn tag_name_key(name: &str) -> UniCase<&str> {
    UniCase::ascii(name.trim_end())
}

impl Tokenizer<'_> {
    /// Write a pending tag attribute from the scratch data to the stack.
    pub(crate) fn push_tag_buffer(&mut self, data: &mut TagData) {
        if data.context.contains(TagContext::QUOTED) {
            self.emit_first(Token::TagAttrQuote {
                quote: char::from(data.quoter),
            });

            let tokens = self.pop();
            self.emit_all(tokens);
        }

        self.emit_first(Token::TagAttrStart);

        let tokens = self.pop();
        self.emit_all(tokens);
        data.reset_buffers();
    }

    /// Handle whitespace inside of an HTML open tag.
    fn handle_tag_space(&mut self, data: &mut TagData, text: u8) {
        let context = data.context;
        let end_of_value = context.contains(TagContext::ATTR_VALUE)
            && !context.intersects(TagContext::QUOTED | TagContext::NOTE_QUOTE);

        if end_of_value
            || (context.contains(TagContext::QUOTED) && context.contains(TagContext::NOTE_SPACE))
        {
            self.push_tag_buffer(data);
            data.context = TagContext::ATTR_READY;
        } else if context.contains(TagContext::NOTE_SPACE) {
            data.context = TagContext::ATTR_READY;
        } else if context.contains(TagContext::ATTR_NAME) {
            data.context |= TagContext::NOTE_EQUALS;
            data.pad_before_eq.write(text);
        }

        if context.contains(TagContext::QUOTED) && !context.contains(TagContext::NOTE_SPACE) {
            self.emit_char(text);
        } else if data.context.contains(TagContext::ATTR_READY) {
            data.pad_first.write(text);
        } else if data.context.contains(TagContext::ATTR_VALUE) {
            data.pad_after_eq.write(text);
        }
    }

    /// Handle regular text inside of an HTML open tag.
    fn handle_tag_text(&mut self, text: u8) -> ParseResult<()> {
        let next = self.read(1);

        if !is_marker(text) || !self.can_recurse() {
            self.emit_char(text);
        } else if text == next && next == b'{' {
            self.parse_template_or_argument()?;
        } else if text == next && next == b'[' {
            self.parse_wikilink()?;
        } else if text == b'<' {
            self.parse_tag()?;
        } else {
            self.emit_char(text);
        }

        Ok(())
    }

    /// Handle one character of data inside of an HTML open tag.
    pub(crate) fn handle_tag_data(&mut self, data: &mut TagData, chunk: u8) -> ParseResult<()> {
        if data.context.contains(TagContext::NAME) {
            let first_time = !data.context.contains(TagContext::NOTE_SPACE);

            if is_marker(chunk) || (chunk.is_ascii_whitespace() && first_time) {
                // Tags must start with text, not spaces
                return Err(self.fail_route());
            }

            if first_time {
                data.context |= TagContext::NOTE_SPACE;
            } else if chunk.is_ascii_whitespace() {
                data.context = TagContext::ATTR_READY;
                self.handle_tag_space(data, chunk);
                return Ok(());
            }
        } else if chunk.is_ascii_whitespace() {
            self.handle_tag_space(data, chunk);
            return Ok(());
        } else if data.context.contains(TagContext::NOTE_SPACE) {
            if data.context.contains(TagContext::QUOTED) {
                // The quoted value never ended; back off and rescan it as
                // an unquoted one.
                data.context = TagContext::ATTR_VALUE;
                self.memoize_bad_route();
                self.pop();
                self.head = data.reset - 1; // auto-incremented by the caller
            } else {
                return Err(self.fail_route());
            }
            return Ok(());
        } else if data.context.contains(TagContext::ATTR_READY) {
            data.context = TagContext::ATTR_NAME;
            self.push(Context::TAG_ATTR);
        } else if data.context.contains(TagContext::ATTR_NAME) {
            if chunk == b'=' {
                data.context = TagContext::ATTR_VALUE | TagContext::NOTE_QUOTE;
                self.emit(Token::TagAttrEquals);
                return Ok(());
            }
            if data.context.contains(TagContext::NOTE_EQUALS) {
                self.push_tag_buffer(data);
                data.context = TagContext::ATTR_NAME;
                self.push(Context::TAG_ATTR);
            }
        } else {
            // data.context contains ATTR_VALUE
            let escaped =
                self.read_backwards(1) == b'\\' && self.read_backwards(2) != b'\\';

            if data.context.contains(TagContext::NOTE_QUOTE) {
                data.context -= TagContext::NOTE_QUOTE;

                if (chunk == b'"' || chunk == b'\'') && !escaped {
                    data.context |= TagContext::QUOTED;
                    data.quoter = chunk;
                    data.reset = self.head;

                    let context = self.context();
                    if self.check_route(context).is_err() {
                        data.context = TagContext::ATTR_VALUE;
                        self.head -= 1;
                    } else {
                        self.push(context);
                    }
                    return Ok(());
                }
            } else if data.context.contains(TagContext::QUOTED) {
                if chunk == data.quoter && !escaped {
                    data.context |= TagContext::NOTE_SPACE;
                    return Ok(());
                }
            }
        }

        self.handle_tag_text(chunk)
    }

    /// Handle the closing of an open tag (`<foo>`).
    fn handle_tag_close_open(&mut self, data: &mut TagData, token: Token) {
        if data
            .context
            .intersects(TagContext::ATTR_NAME | TagContext::ATTR_VALUE)
        {
            self.push_tag_buffer(data);
        }

        self.emit(token);
        self.head += 1;
    }

    /// Handle the opening of a closing tag (`</foo>`).
    pub(crate) fn handle_tag_open_close(&mut self) {
        self.emit(Token::TagOpenClose);
        self.push(Context::TAG_CLOSE);
        self.head += 1;
    }

    /// Handle the ending of a closing tag (`</foo>`).
    ///
    /// The closing name must be a single text span matching the opening
    /// name, or the whole tag route fails.
    pub(crate) fn handle_tag_close_close(&mut self) -> ParseResult<Parsed> {
        let closing = self.pop();

        let valid = closing.len() == 1
            && match (&closing[0], self.top().tokens.get(1)) {
                (Token::Text(close_name), Some(Token::Text(open_name))) => {
                    tag_name_key(close_name) == tag_name_key(open_name)
                }
                _ => false,
            };

        if !valid {
            return Err(self.fail_route());
        }

        self.emit_all(closing);
        self.emit(Token::TagCloseClose);
        Ok(Parsed::Tokens(self.pop()))
    }

    /// Handle the body of an HTML tag that is parser-blacklisted.
    ///
    /// Everything is literal except entities and the matching close tag.
    fn handle_blacklisted_tag(&mut self) -> ParseResult<TokenList> {
        trace!("Treating tag body as literal text");

        loop {
            let this = self.read(0);
            let next = self.read(1);

            if this == b'\0' {
                return Err(self.fail_route());
            } else if this == b'<' && next == b'/' {
                self.head += 2;
                let reset = self.head - 1;
                let mut buffer = Textbuffer::new();

                loop {
                    let this = self.read(0);

                    if this == b'>' {
                        let close_name = buffer.export();
                        let matches = match self.top().tokens.get(1) {
                            Some(Token::Text(open_name)) => {
                                tag_name_key(&close_name) == tag_name_key(open_name)
                            }
                            _ => false,
                        };

                        if matches {
                            self.emit(Token::TagOpenClose);
                            self.emit_textbuffer(buffer);
                            self.emit(Token::TagCloseClose);
                            return Ok(self.pop());
                        }

                        // No matching end; rescan the name as body text
                        self.head = reset;
                        self.emit_text("</");
                        break;
                    }

                    if this == b'\0' || this == b'\n' {
                        self.head = reset;
                        self.emit_text("</");
                        break;
                    }

                    buffer.write(this);
                    self.head += 1;
                }
            } else if this == b'&' {
                self.parse_entity()?;
            } else {
                self.emit_char(this);
            }

            self.head += 1;
        }
    }

    /// Handle the end of an implicitly closing single-only HTML tag.
    fn handle_single_only_tag_end(&mut self) -> ParseResult<TokenList> {
        let top = self.top_mut().tokens.pop();
        debug_assert!(
            matches!(top, Some(Token::TagCloseOpen)),
            "single-only tag did not end with TagCloseOpen",
        );

        self.emit(Token::TagCloseSelfclose { implicit: true });
        self.head -= 1; // offset displacement done by handle_tag_close_open
        Ok(self.pop())
    }

    /// Handle the stream end when inside a single-supporting HTML tag.
    ///
    /// The still-open tag is rewritten in place into a self-closing one.
    pub(crate) fn handle_single_tag_end(&mut self) -> ParseResult<TokenList> {
        let tokens = &mut self.top_mut().tokens;
        let mut depth = 1;
        let mut close_index = None;

        // Find the TagCloseOpen matching the TagOpenOpen at index 0
        for (index, token) in tokens.iter().enumerate().skip(2) {
            match token {
                Token::TagOpenOpen => depth += 1,
                Token::TagCloseOpen => {
                    depth -= 1;
                    if depth == 0 {
                        close_index = Some(index);
                        break;
                    }
                }
                Token::TagCloseSelfclose { .. } => {
                    depth -= 1;
                    debug_assert!(depth != 0, "self-close matched the open tag");
                }
                _ => (),
            }
        }

        debug_assert!(close_index.is_some(), "no closing token for single tag");
        if let Some(index) = close_index {
            tokens[index] = Token::TagCloseSelfclose { implicit: true };
        }

        Ok(self.pop())
    }

    /// Actually parse an HTML tag, starting with the open (`<foo>`).
    fn really_parse_tag(&mut self) -> ParseResult<TokenList> {
        let mut data = TagData::new();

        self.check_route(Context::TAG_OPEN)?;
        self.push(Context::TAG_OPEN);
        self.emit(Token::TagOpenOpen);

        loop {
            let this = self.read(0);
            let next = self.read(1);
            let can_exit = !data
                .context
                .intersects(TagContext::QUOTED | TagContext::NAME)
                || data.context.contains(TagContext::NOTE_SPACE);

            if this == b'\0' {
                if self.context().contains(Context::TAG_ATTR) {
                    if data.context.contains(TagContext::QUOTED) {
                        // Unclosed attribute quote: reset, don't die
                        data.context = TagContext::ATTR_VALUE;
                        self.memoize_bad_route();
                        self.pop();
                        self.head = data.reset;
                        continue;
                    }
                    self.pop();
                }
                return Err(self.fail_route());
            } else if this == b'>' && can_exit {
                self.handle_tag_close_open(&mut data, Token::TagCloseOpen);
                *self.context_mut() = Context::TAG_BODY;

                let name = match self.top().tokens.get(1) {
                    Some(Token::Text(name)) => name.clone(),
                    _ => {
                        debug_assert!(false, "open tag did not begin with a name");
                        return Err(self.fail_route());
                    }
                };

                if is_single_only(name.trim_end()) {
                    return self.handle_single_only_tag_end();
                }
                if is_parsable(name.trim_end()) {
                    return self.parse_tokens(Context::empty(), false);
                }
                return self.handle_blacklisted_tag();
            } else if this == b'/' && next == b'>' && can_exit {
                self.handle_tag_close_open(
                    &mut data,
                    Token::TagCloseSelfclose { implicit: false },
                );
                return Ok(self.pop());
            } else {
                self.handle_tag_data(&mut data, this)?;
            }

            self.head += 1;
        }
    }

    /// Handle the (possible) start of an implicitly closing single tag.
    ///
    /// `</br>` and friends are treated as if they were opening tags, since
    /// the closing form of a single-only tag cannot exist.
    pub(crate) fn handle_invalid_tag_start(&mut self) -> ParseResult<()> {
        debug!("Handling invalid tag start");

        let reset = self.head + 1;
        self.head += 2;

        let mut buffer = Textbuffer::new();
        let mut pos = 0;
        loop {
            let this = self.read(pos);
            if this.is_ascii_whitespace() || is_marker(this) {
                break;
            }
            buffer.write(this);
            pos += 1;
        }

        let result = if is_single_only(&buffer.export()) {
            self.really_parse_tag()
        } else {
            Err(BadRoute {
                context: Context::empty(),
            })
        };

        match result {
            Err(_) => {
                self.head = reset;
                self.emit_text("</");
            }
            Ok(tag) => self.emit_all(tag),
        }

        Ok(())
    }

    /// Parse an HTML tag at the head of the wikitext.
    pub(crate) fn parse_tag(&mut self) -> ParseResult<()> {
        debug!("Parsing an HTML tag");

        let reset = self.head;
        self.head += 1;

        match self.really_parse_tag() {
            Err(_) => {
                self.head = reset;
                self.emit_char(b'<');
            }
            Ok(tag) => self.emit_all(tag),
        }

        Ok(())
    }
}
