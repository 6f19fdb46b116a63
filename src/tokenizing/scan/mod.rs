/*
 * tokenizing/scan/mod.rs
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

//! The scanner: one dispatch loop over the head position, with a sub-parser
//! per construct. Sub-parsers push frames, emit tokens, and fail routes; the
//! loop glues them together and falls back to plain text whenever a route
//! dies.

mod comment;
mod entity;
mod heading;
mod line;
mod link;
mod style;
mod table;
mod tag;
mod template;

use crate::definitions::is_single;
use crate::tokenizing::prelude::*;

/// The most consecutive `{` that can open a template/argument run.
pub(crate) const MAX_BRACES: usize = 255;

/// The most significant characters an HTML entity may contain.
pub(crate) const MAX_ENTITY_SIZE: usize = 8;

/// Characters that can begin some structural construct.
///
/// Anything else accumulates into the current frame's textbuffer without
/// further inspection. The NUL sentinel is a marker so that end of input
/// always reaches the dispatcher.
const MARKERS: &[u8] = b"{}[]<>|=&'#*;:-!\n\0";

#[inline]
pub(crate) fn is_marker(byte: u8) -> bool {
    MARKERS.contains(&byte)
}

/// What a completed parse frame produced.
///
/// Almost every frame yields its token list; heading frames additionally
/// carry the level their closing run settled on.
#[derive(Debug)]
pub(crate) enum Parsed {
    Tokens(TokenList),
    Heading(HeadingData),
}

#[derive(Debug)]
pub(crate) struct HeadingData {
    pub title: TokenList,
    pub level: u8,
}

impl Tokenizer<'_> {
    /// Scan the wikitext, using the context to decide when to stop.
    ///
    /// With `push` set, a new frame is opened for the given context;
    /// otherwise scanning continues in the current frame and `context` is
    /// ignored.
    pub(crate) fn parse(&mut self, context: Context, push: bool) -> ParseResult<Parsed> {
        if push {
            self.check_route(context)?;
            self.push(context);
        }

        loop {
            let this = self.read(0);
            let this_context = self.context();

            if this_context.intersects(Context::UNSAFE)
                && !self.verify_safe(this_context, this)
            {
                if this_context.intersects(Context::DOUBLE) {
                    self.pop();
                }
                return Err(self.fail_route());
            }

            if !is_marker(this) {
                self.emit_char(this);
                self.head += 1;
                continue;
            }

            if this == b'\0' {
                return self.handle_end(this_context);
            }

            let next = self.read(1);
            let last = self.read_backwards(1);

            if this == b'{' && next == b'{' {
                if self.can_recurse() {
                    self.parse_template_or_argument()?;
                } else {
                    self.emit_char(this);
                }
            } else if this == b'|' && this_context.intersects(Context::TEMPLATE) {
                self.handle_template_param()?;
            } else if this == b'=' && this_context.contains(Context::TEMPLATE_PARAM_KEY) {
                if !self.global.contains(GlobalContext::HEADING)
                    && (last == b'\0' || last == b'\n')
                    && next == b'='
                {
                    self.parse_heading()?;
                } else {
                    self.handle_template_param_value();
                }
            } else if this == b'}' && next == b'}' && this_context.intersects(Context::TEMPLATE)
            {
                return self.handle_template_end();
            } else if this == b'|' && this_context.contains(Context::ARGUMENT_NAME) {
                self.handle_argument_separator();
            } else if this == b'}' && next == b'}' && this_context.intersects(Context::ARGUMENT)
            {
                if self.read(2) == b'}' {
                    return self.handle_argument_end();
                }
                self.emit_char(this);
            } else if this == b'[' && next == b'[' && self.can_recurse() {
                if !this_context.intersects(Context::NO_WIKILINKS) {
                    self.parse_wikilink()?;
                } else {
                    self.emit_char(this);
                }
            } else if this == b'|' && this_context.contains(Context::WIKILINK_TITLE) {
                self.handle_wikilink_separator();
            } else if this == b']' && next == b']' && this_context.intersects(Context::WIKILINK)
            {
                return self.handle_wikilink_end();
            } else if this == b'[' {
                self.parse_external_link(true)?;
            } else if this == b':' && !is_marker(last) {
                self.parse_external_link(false)?;
            } else if this == b']' && this_context.contains(Context::EXT_LINK_TITLE) {
                return Ok(Parsed::Tokens(self.pop()));
            } else if this == b'='
                && !self.global.contains(GlobalContext::HEADING)
                && !this_context.intersects(Context::TEMPLATE)
            {
                if last == b'\0' || last == b'\n' {
                    self.parse_heading()?;
                } else {
                    self.emit_char(this);
                }
            } else if this == b'=' && this_context.intersects(Context::HEADING) {
                return self.handle_heading_end().map(Parsed::Heading);
            } else if this == b'\n' && this_context.intersects(Context::HEADING) {
                return Err(self.fail_route());
            } else if this == b'&' {
                self.parse_entity()?;
            } else if this == b'<' && next == b'!' {
                if self.read(2) == b'-' && self.read(3) == b'-' {
                    self.parse_comment()?;
                } else {
                    self.emit_char(this);
                }
            } else if this == b'<' && next == b'/' && self.read(2) != b'\0' {
                if this_context.contains(Context::TAG_BODY) {
                    self.handle_tag_open_close();
                } else {
                    self.handle_invalid_tag_start()?;
                }
            } else if this == b'<' && !this_context.contains(Context::TAG_CLOSE) {
                if self.can_recurse() {
                    self.parse_tag()?;
                } else {
                    self.emit_char(this);
                }
            } else if this == b'>' && this_context.contains(Context::TAG_CLOSE) {
                return self.handle_tag_close_close();
            } else if this == next && next == b'\'' && !self.skip_style_tags {
                if let Some(stack) = self.parse_style()? {
                    return Ok(Parsed::Tokens(stack));
                }
            } else if (last == b'\0' || last == b'\n')
                && matches!(this, b'#' | b'*' | b';' | b':')
            {
                self.handle_list();
            } else if (last == b'\0' || last == b'\n')
                && this == b'-'
                && next == b'-'
                && self.read(2) == b'-'
                && self.read(3) == b'-'
            {
                self.handle_hr();
            } else if (this == b'\n' || this == b':')
                && this_context.contains(Context::DL_TERM)
            {
                self.handle_dl_term();

                // Kill potential table contexts
                if this == b'\n' {
                    *self.context_mut() &= !Context::TABLE_CELL_LINE_CONTEXTS;
                }
            } else if this == b'{' && next == b'|' && self.has_leading_whitespace() {
                if self.can_recurse() {
                    self.parse_table()?;
                } else {
                    self.emit_char(this);
                }
            } else if this_context.contains(Context::TABLE_OPEN) {
                if this == b'|' && next == b'|' && this_context.contains(Context::TABLE_TD_LINE)
                {
                    if this_context.contains(Context::TABLE_CELL_OPEN) {
                        return self.handle_table_cell_end(false);
                    }
                    self.handle_table_cell("||", "td", Context::TABLE_TD_LINE)?;
                } else if this == b'|'
                    && next == b'|'
                    && this_context.contains(Context::TABLE_TH_LINE)
                {
                    if this_context.contains(Context::TABLE_CELL_OPEN) {
                        return self.handle_table_cell_end(false);
                    }
                    self.handle_table_cell("||", "th", Context::TABLE_TH_LINE)?;
                } else if this == b'!'
                    && next == b'!'
                    && this_context.contains(Context::TABLE_TH_LINE)
                {
                    if this_context.contains(Context::TABLE_CELL_OPEN) {
                        return self.handle_table_cell_end(false);
                    }
                    self.handle_table_cell("!!", "th", Context::TABLE_TH_LINE)?;
                } else if this == b'|' && this_context.contains(Context::TABLE_CELL_STYLE) {
                    return self.handle_table_cell_end(true);
                } else if this == b'\n'
                    && this_context.intersects(Context::TABLE_CELL_LINE_CONTEXTS)
                {
                    // Clear out cell line contexts at each newline
                    *self.context_mut() &= !Context::TABLE_CELL_LINE_CONTEXTS;
                    self.emit_char(this);
                } else if self.has_leading_whitespace() {
                    if this == b'|' && next == b'}' {
                        if this_context.contains(Context::TABLE_CELL_OPEN) {
                            return self.handle_table_cell_end(false);
                        }
                        if this_context.contains(Context::TABLE_ROW_OPEN) {
                            return self.handle_table_row_end();
                        }
                        return self.handle_table_end();
                    } else if this == b'|' && next == b'-' {
                        if this_context.contains(Context::TABLE_CELL_OPEN) {
                            return self.handle_table_cell_end(false);
                        }
                        if this_context.contains(Context::TABLE_ROW_OPEN) {
                            return self.handle_table_row_end();
                        }
                        self.handle_table_row()?;
                    } else if this == b'|' {
                        if this_context.contains(Context::TABLE_CELL_OPEN) {
                            return self.handle_table_cell_end(false);
                        }
                        self.handle_table_cell("|", "td", Context::TABLE_TD_LINE)?;
                    } else if this == b'!' {
                        if this_context.contains(Context::TABLE_CELL_OPEN) {
                            return self.handle_table_cell_end(false);
                        }
                        self.handle_table_cell("!", "th", Context::TABLE_TH_LINE)?;
                    } else {
                        self.emit_char(this);
                    }
                } else {
                    self.emit_char(this);
                }
            } else {
                self.emit_char(this);
            }

            self.head += 1;
        }
    }

    /// Like [`parse`](Self::parse), for frames that cannot end as headings.
    pub(crate) fn parse_tokens(
        &mut self,
        context: Context,
        push: bool,
    ) -> ParseResult<TokenList> {
        match self.parse(context, push)? {
            Parsed::Tokens(tokens) => Ok(tokens),
            Parsed::Heading(_) => {
                debug_assert!(false, "heading data produced outside a heading frame");
                Err(BadRoute { context })
            }
        }
    }

    /// Vet the next character before it is consumed in a sensitive context.
    ///
    /// Returns whether scanning may proceed; side effects on the top frame's
    /// context record lookahead obligations (`FAIL_NEXT` and friends) which
    /// later characters either discharge or trip over.
    fn verify_safe(&mut self, context: Context, data: u8) -> bool {
        if context.contains(Context::FAIL_NEXT) {
            return false;
        }

        if context.contains(Context::WIKILINK_TITLE) {
            if data == b']' || data == b'{' {
                *self.context_mut() |= Context::FAIL_NEXT;
            } else if data == b'\n' || data == b'[' || data == b'}' || data == b'>' {
                return false;
            } else if data == b'<' {
                if self.read(1) == b'!' {
                    *self.context_mut() |= Context::FAIL_NEXT;
                } else {
                    return false;
                }
            }
            return true;
        }

        if context.contains(Context::EXT_LINK_TITLE) {
            return data != b'\n';
        }

        if context.contains(Context::TAG_CLOSE) {
            return data != b'<';
        }

        if context.contains(Context::TEMPLATE_NAME) {
            if data == b'{' {
                *self.context_mut() |= Context::HAS_TEMPLATE | Context::FAIL_NEXT;
                return true;
            }
            if data == b'}' || (data == b'<' && self.read(1) == b'!') {
                *self.context_mut() |= Context::FAIL_NEXT;
                return true;
            }
            if data == b'[' || data == b']' || data == b'<' || data == b'>' {
                return false;
            }
            if data == b'|' {
                return true;
            }

            if context.contains(Context::HAS_TEXT) {
                if context.contains(Context::FAIL_ON_TEXT) {
                    if !data.is_ascii_whitespace() {
                        return false;
                    }
                } else if data == b'\n' {
                    *self.context_mut() |= Context::FAIL_ON_TEXT;
                }
            } else if !data.is_ascii_whitespace() {
                *self.context_mut() |= Context::HAS_TEXT;
            }
        } else if context.contains(Context::FAIL_ON_EQUALS) {
            if data == b'=' {
                return false;
            }
        } else if context.contains(Context::FAIL_ON_LBRACE) {
            if data == b'{'
                || (self.read_backwards(1) == b'{' && self.read_backwards(2) == b'{')
            {
                if context.intersects(Context::TEMPLATE) {
                    *self.context_mut() |= Context::FAIL_ON_EQUALS;
                } else {
                    *self.context_mut() |= Context::FAIL_NEXT;
                }
                return true;
            }
            *self.context_mut() ^= Context::FAIL_ON_LBRACE;
        } else if context.contains(Context::FAIL_ON_RBRACE) {
            if data == b'}' {
                *self.context_mut() |= Context::FAIL_NEXT;
                return true;
            }
            *self.context_mut() ^= Context::FAIL_ON_RBRACE;
        } else if data == b'{' {
            *self.context_mut() |= Context::FAIL_ON_LBRACE;
        } else if data == b'}' {
            *self.context_mut() |= Context::FAIL_ON_RBRACE;
        }

        true
    }

    /// Handle the end of the input stream.
    fn handle_end(&mut self, context: Context) -> ParseResult<Parsed> {
        if context.intersects(Context::FAIL) {
            trace!("Reached end of input in a failing context ({context:?})");

            if context.contains(Context::TAG_BODY) {
                let single = matches!(
                    self.top().tokens.get(1),
                    Some(Token::Text(name)) if is_single(name.trim_end()),
                );
                if single {
                    return self.handle_single_tag_end().map(Parsed::Tokens);
                }
            }
            if context.contains(Context::TABLE_CELL_OPEN) {
                self.pop();
            }
            if self.context().intersects(Context::DOUBLE) {
                self.pop();
            }

            return Err(self.fail_route());
        }

        Ok(Parsed::Tokens(self.pop()))
    }

    /// Whether the current head follows only whitespace since the last
    /// newline (or the start of input).
    fn has_leading_whitespace(&self) -> bool {
        let mut offset = 1;

        loop {
            let byte = self.read_backwards(offset);
            if byte == b'\0' || byte == b'\n' {
                return true;
            }
            if !byte.is_ascii_whitespace() {
                return false;
            }
            offset += 1;
        }
    }
}

#[test]
fn markers() {
    for byte in *b"{}[]<>|=&'#*;:-!\n\0" {
        assert!(is_marker(byte));
    }

    for byte in *b"aZ09 _/\"\\()?.," {
        assert!(!is_marker(byte));
    }
}
