/*
 * tokenizing/scan/heading.rs
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

use super::{HeadingData, Parsed};
use crate::tokenizing::prelude::*;

impl Tokenizer<'_> {
    /// Parse a section heading at the head of the wikitext.
    ///
    /// The `GL_HEADING` global stops nested heading attempts while one is
    /// already in flight; headings do not nest.
    pub(crate) fn parse_heading(&mut self) -> ParseResult<()> {
        debug!("Parsing a section heading");

        let reset = self.head;
        self.global |= GlobalContext::HEADING;
        self.head += 1;

        let mut best = 1;
        while self.read(0) == b'=' {
            best += 1;
            self.head += 1;
        }

        let context = Context::heading_context(if best > 5 { 6 } else { best as u8 });

        match self.parse(context, true) {
            Err(_) => {
                self.head = reset + best - 1;
                for _ in 0..best {
                    self.emit_char(b'=');
                }
                self.global -= GlobalContext::HEADING;
            }
            Ok(Parsed::Heading(HeadingData { title, level })) => {
                self.emit(Token::HeadingStart { level });

                if usize::from(level) < best {
                    for _ in 0..(best - usize::from(level)) {
                        self.emit_char(b'=');
                    }
                }

                self.emit_all(title);
                self.emit(Token::HeadingEnd);
                self.global -= GlobalContext::HEADING;
            }
            Ok(Parsed::Tokens(_)) => {
                debug_assert!(false, "heading frame did not produce heading data");
            }
        }

        Ok(())
    }

    /// Handle the closing run of `=` of a section heading.
    ///
    /// The heading's level is the smaller of the opening and closing runs,
    /// capped at six; surplus `=` stay literal text. A longer run later on
    /// the line supersedes this one, which is why the rest of the line is
    /// parsed before committing.
    pub(crate) fn handle_heading_end(&mut self) -> ParseResult<HeadingData> {
        let reset = self.head;
        self.head += 1;

        let mut best = 1;
        while self.read(0) == b'=' {
            best += 1;
            self.head += 1;
        }

        let current = usize::from(self.context().heading_level());
        let mut level = current.min(best).min(6);

        let context = self.context();
        match self.parse(context, true) {
            Err(_) => {
                if level < best {
                    for _ in 0..(best - level) {
                        self.emit_char(b'=');
                    }
                }
                self.head = reset + best - 1;
            }
            Ok(Parsed::Heading(after)) => {
                for _ in 0..best {
                    self.emit_char(b'=');
                }
                self.emit_all(after.title);
                level = usize::from(after.level);
            }
            Ok(Parsed::Tokens(_)) => {
                debug_assert!(false, "heading frame did not produce heading data");
            }
        }

        let title = self.pop();
        Ok(HeadingData {
            title,
            level: level as u8,
        })
    }
}
