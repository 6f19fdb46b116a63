/*
 * tokenizing/scan/style.rs
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

use crate::tokenizing::prelude::*;

impl Tokenizer<'_> {
    /// Parse wiki-style italics.
    ///
    /// If the route fails because a bold run inside wanted to be treated as
    /// a lone apostrophe plus italics (`STYLE_PASS_AGAIN`), the whole span
    /// is retried once with `STYLE_SECOND_PASS` set.
    fn parse_italics(&mut self) -> ParseResult<()> {
        debug!("Parsing italic text");

        let reset = self.head;

        let stack = match self.parse_tokens(Context::STYLE_ITALICS, true) {
            Ok(stack) => stack,
            Err(route) => {
                self.head = reset;

                if route.context.contains(Context::STYLE_PASS_AGAIN) {
                    let retry = Context::STYLE_ITALICS | Context::STYLE_SECOND_PASS;
                    match self.parse_tokens(retry, true) {
                        Ok(stack) => stack,
                        Err(_) => {
                            self.head = reset;
                            self.emit_text("''");
                            return Ok(());
                        }
                    }
                } else {
                    self.emit_text("''");
                    return Ok(());
                }
            }
        };

        self.emit(Token::ItalicOpen);
        self.emit_all(stack);
        self.emit(Token::ItalicClose);
        Ok(())
    }

    /// Parse wiki-style bold.
    ///
    /// Returns whether the caller should pop the current frame.
    fn parse_bold(&mut self) -> ParseResult<bool> {
        debug!("Parsing bold text");

        let reset = self.head;

        match self.parse_tokens(Context::STYLE_BOLD, true) {
            Err(_) => {
                self.head = reset;

                if self.context().contains(Context::STYLE_SECOND_PASS) {
                    self.emit_char(b'\'');
                    return Ok(true);
                }

                if self.context().contains(Context::STYLE_ITALICS) {
                    *self.context_mut() |= Context::STYLE_PASS_AGAIN;
                    self.emit_text("'''");
                } else {
                    self.emit_char(b'\'');
                    self.parse_italics()?;
                }

                Ok(false)
            }
            Ok(stack) => {
                self.emit(Token::BoldOpen);
                self.emit_all(stack);
                self.emit(Token::BoldClose);
                Ok(false)
            }
        }
    }

    /// Parse wiki-style italics and bold together (i.e., five ticks).
    fn parse_italics_and_bold(&mut self) -> ParseResult<()> {
        debug!("Parsing italic and bold text");

        let reset = self.head;

        match self.parse_tokens(Context::STYLE_BOLD, true) {
            Err(_) => {
                self.head = reset;

                let stack = match self.parse_tokens(Context::STYLE_ITALICS, true) {
                    Ok(stack) => stack,
                    Err(_) => {
                        self.head = reset;
                        self.emit_text("'''''");
                        return Ok(());
                    }
                };

                let reset = self.head;
                match self.parse_tokens(Context::STYLE_BOLD, true) {
                    Err(_) => {
                        self.head = reset;
                        self.emit_text("'''");
                        self.emit(Token::ItalicOpen);
                        self.emit_all(stack);
                        self.emit(Token::ItalicClose);
                    }
                    Ok(stack2) => {
                        self.push(Context::empty());
                        self.emit(Token::ItalicOpen);
                        self.emit_all(stack);
                        self.emit(Token::ItalicClose);
                        self.emit_all(stack2);

                        let inner = self.pop();
                        self.emit(Token::BoldOpen);
                        self.emit_all(inner);
                        self.emit(Token::BoldClose);
                    }
                }
            }
            Ok(stack) => {
                let reset = self.head;
                match self.parse_tokens(Context::STYLE_ITALICS, true) {
                    Err(_) => {
                        self.head = reset;
                        self.emit_text("''");
                        self.emit(Token::BoldOpen);
                        self.emit_all(stack);
                        self.emit(Token::BoldClose);
                    }
                    Ok(stack2) => {
                        self.push(Context::empty());
                        self.emit(Token::BoldOpen);
                        self.emit_all(stack);
                        self.emit(Token::BoldClose);
                        self.emit_all(stack2);

                        let inner = self.pop();
                        self.emit(Token::ItalicOpen);
                        self.emit_all(inner);
                        self.emit(Token::ItalicClose);
                    }
                }
            }
        }

        Ok(())
    }

    /// Parse wiki-style formatting (`''` and `'''`).
    ///
    /// Returns the popped frame when the tick run closes the style the
    /// current frame was opened for; the caller returns it as its own parse
    /// result.
    pub(crate) fn parse_style(&mut self) -> ParseResult<Option<TokenList>> {
        let context = self.context();

        self.head += 2;
        let mut ticks = 2;
        while self.read(0) == b'\'' {
            self.head += 1;
            ticks += 1;
        }

        if ticks > 5 {
            for _ in 0..(ticks - 5) {
                self.emit_char(b'\'');
            }
            ticks = 5;
        } else if ticks == 4 {
            self.emit_char(b'\'');
            ticks = 3;
        }

        if (context.contains(Context::STYLE_ITALICS) && (ticks == 2 || ticks == 5))
            || (context.contains(Context::STYLE_BOLD) && (ticks == 3 || ticks == 5))
        {
            if ticks == 5 {
                self.head -= if context.contains(Context::STYLE_ITALICS) {
                    3
                } else {
                    2
                };
            }
            return Ok(Some(self.pop()));
        }

        if !self.can_recurse() {
            if ticks == 3 {
                if context.contains(Context::STYLE_SECOND_PASS) {
                    self.emit_char(b'\'');
                    return Ok(Some(self.pop()));
                }
                if context.contains(Context::STYLE_ITALICS) {
                    *self.context_mut() |= Context::STYLE_PASS_AGAIN;
                }
            }
            for _ in 0..ticks {
                self.emit_char(b'\'');
            }
        } else if ticks == 2 {
            self.parse_italics()?;
        } else if ticks == 3 {
            if self.parse_bold()? {
                return Ok(Some(self.pop()));
            }
        } else {
            self.parse_italics_and_bold()?;
        }

        self.head -= 1;
        Ok(None)
    }
}
