/*
 * tokenizing/scan/table.rs
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
use crate::tokenizing::prelude::*;

impl Tokenizer<'_> {
    /// Emit the token run for a table, row, or cell.
    ///
    /// Tables reuse the HTML tag tokens with the corresponding tag name
    /// (`table`, `tr`, `td`, `th`); the original wiki markup is a
    /// tree-builder concern.
    fn emit_table_tag(
        &mut self,
        tag: &str,
        style: Option<TokenList>,
        contents: Option<TokenList>,
    ) {
        self.emit(Token::TagOpenOpen);
        self.emit_text(tag);

        if let Some(style) = style {
            self.emit_all(style);
        }

        self.emit(Token::TagCloseOpen);

        if let Some(contents) = contents {
            self.emit_all(contents);
        }

        self.emit(Token::TagOpenClose);
        self.emit_text(tag);
        self.emit(Token::TagCloseClose);
    }

    /// Handle style attributes for a table until the ending token.
    ///
    /// Runs the open-tag attribute machinery over the style span; the
    /// collected attribute tokens stay on the current frame for the caller
    /// to pop.
    fn handle_table_style(&mut self, end_token: u8) -> ParseResult<()> {
        let mut data = TagData::new();
        data.context = TagContext::ATTR_READY;

        loop {
            let this = self.read(0);
            let can_exit = !data.context.contains(TagContext::QUOTED)
                || data.context.contains(TagContext::NOTE_SPACE);

            if this == end_token && can_exit {
                if data
                    .context
                    .intersects(TagContext::ATTR_NAME | TagContext::ATTR_VALUE)
                {
                    self.push_tag_buffer(&mut data);
                }
                return Ok(());
            } else if this == b'\0' || this == end_token {
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
            } else {
                self.handle_tag_data(&mut data, this)?;
            }

            self.head += 1;
        }
    }

    /// Parse a wikitext table by starting with the first line.
    pub(crate) fn parse_table(&mut self) -> ParseResult<()> {
        debug!("Parsing a table");

        let reset = self.head;
        self.head += 2;

        if self.check_route(Context::TABLE_OPEN).is_err() {
            self.head = reset;
            self.emit_char(b'{');
            return Ok(());
        }

        self.push(Context::TABLE_OPEN);

        if self.handle_table_style(b'\n').is_err() {
            self.head = reset;
            self.emit_char(b'{');
            return Ok(());
        }

        let style = self.pop();
        self.head += 1;

        let restore_point = self.current_ident();
        match self.parse_tokens(Context::TABLE_OPEN, true) {
            Err(_) => {
                // Unwind back to the table's own frame before giving up
                while self.current_ident() != restore_point {
                    self.memoize_bad_route();
                    self.pop();
                }
                self.head = reset;
                self.emit_char(b'{');
            }
            Ok(table) => {
                self.emit_table_tag("table", Some(style), Some(table));
                self.head -= 1; // offset displacement done by parse()
            }
        }

        Ok(())
    }

    /// Parse a table row (`|-`): style until end of line, then the body.
    pub(crate) fn handle_table_row(&mut self) -> ParseResult<()> {
        debug!("Parsing a table row");

        self.head += 2;

        if !self.can_recurse() {
            self.emit_text("|-");
            self.head -= 1;
            return Ok(());
        }

        self.check_route(Context::TABLE_OPEN | Context::TABLE_ROW_OPEN)?;
        self.push(Context::TABLE_OPEN | Context::TABLE_ROW_OPEN);

        self.handle_table_style(b'\n')?;
        let style = self.pop();

        // Don't parse the style separator
        self.head += 1;

        let row = self.parse_tokens(Context::TABLE_OPEN | Context::TABLE_ROW_OPEN, true)?;

        self.emit_table_tag("tr", Some(style), Some(row));
        self.head -= 1; // offset displacement done by parse()
        Ok(())
    }

    /// Parse a table cell (`|`, `||`, `!`, `!!`).
    ///
    /// The body is parsed once assuming no style prefix; if the cell turns
    /// out to carry one (the parse stopped at a lone `|` with
    /// `TABLE_CELL_STYLE` set), it is reparsed as style attributes followed
    /// by the real body.
    pub(crate) fn handle_table_cell(
        &mut self,
        markup: &str,
        tag: &str,
        line_context: Context,
    ) -> ParseResult<()> {
        debug!("Parsing a table cell ({markup})");

        let old_context = self.context();

        self.head += markup.len();
        let reset = self.head;

        if !self.can_recurse() {
            self.emit_text(markup);
            self.head -= 1;
            return Ok(());
        }

        let mut cell = self.parse_tokens(
            Context::TABLE_OPEN
                | Context::TABLE_CELL_OPEN
                | Context::TABLE_CELL_STYLE
                | line_context,
            true,
        )?;
        let mut cell_context = self.context();
        *self.context_mut() = old_context;

        let reset_for_style = cell_context.contains(Context::TABLE_CELL_STYLE);
        let mut style = None;

        if reset_for_style {
            self.head = reset;
            self.push(Context::TABLE_OPEN | Context::TABLE_CELL_OPEN | line_context);

            self.handle_table_style(b'|')?;
            style = Some(self.pop());

            // Don't parse the style separator
            self.head += 1;

            cell = self.parse_tokens(
                Context::TABLE_OPEN | Context::TABLE_CELL_OPEN | line_context,
                true,
            )?;
            cell_context = self.context();
            *self.context_mut() = old_context;
        }

        self.emit_table_tag(tag, style, Some(cell));

        // Keep header/cell line contexts
        *self.context_mut() |=
            cell_context & (Context::TABLE_TH_LINE | Context::TABLE_TD_LINE);

        self.head -= 1; // offset displacement done by parse()
        Ok(())
    }

    /// Close the current cell, recording whether it stopped at a style
    /// separator, and keep its line contexts alive in the frame below.
    pub(crate) fn handle_table_cell_end(
        &mut self,
        reset_for_style: bool,
    ) -> ParseResult<Parsed> {
        if reset_for_style {
            *self.context_mut() |= Context::TABLE_CELL_STYLE;
        } else {
            *self.context_mut() -= Context::TABLE_CELL_STYLE;
        }

        Ok(Parsed::Tokens(self.pop_keeping_context()))
    }

    /// Return the stack in order to handle the table row end.
    pub(crate) fn handle_table_row_end(&mut self) -> ParseResult<Parsed> {
        Ok(Parsed::Tokens(self.pop()))
    }

    /// Return the stack in order to handle the table end.
    pub(crate) fn handle_table_end(&mut self) -> ParseResult<Parsed> {
        self.head += 2;
        Ok(Parsed::Tokens(self.pop()))
    }
}
