/*
 * tokenizing/scan/entity.rs
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

use super::{is_marker, MAX_ENTITY_SIZE};
use crate::tokenizing::prelude::*;
use std::str;

impl Tokenizer<'_> {
    /// Actually parse an HTML entity and ensure that it is valid.
    ///
    /// Only the syntactic form is checked for named entities; numeric
    /// entities must also name a codepoint in `1..=0x10FFFF`. Leading zeros
    /// of a numeric entity do not count against the length limit but are
    /// preserved in the emitted text.
    fn really_parse_entity(&mut self) -> ParseResult<()> {
        self.emit(Token::HtmlEntityStart);
        self.head += 1;

        let mut numeric = false;
        let mut hexadecimal = false;

        let mut this = self.read(0);
        if this == b'\0' {
            return Err(self.fail_route());
        }

        if this == b'#' {
            numeric = true;
            self.emit(Token::HtmlEntityNumeric);
            self.head += 1;

            this = self.read(0);
            if this == b'\0' {
                return Err(self.fail_route());
            }

            if this == b'x' || this == b'X' {
                hexadecimal = true;
                self.emit(Token::HtmlEntityHex);
                self.head += 1;
            }
        }

        let valid: fn(u8) -> bool = if hexadecimal {
            |byte| byte.is_ascii_hexdigit()
        } else if numeric {
            |byte| byte.is_ascii_digit()
        } else {
            |byte| byte.is_ascii_alphanumeric()
        };

        let mut text = Vec::new();
        let mut zeroes = 0;

        loop {
            let this = self.read(0);

            if this == b';' {
                if text.is_empty() {
                    return Err(self.fail_route());
                }
                break;
            }
            if text.is_empty() && numeric && this == b'0' {
                zeroes += 1;
                self.head += 1;
                continue;
            }
            if text.len() >= MAX_ENTITY_SIZE || is_marker(this) || !valid(this) {
                return Err(self.fail_route());
            }

            text.push(this);
            self.head += 1;
        }

        if numeric {
            let digits = str::from_utf8(&text).expect("entity digits are ASCII");
            let radix = if hexadecimal { 16 } else { 10 };

            match u32::from_str_radix(digits, radix) {
                Ok(value) if (1..=0x10FFFF).contains(&value) => (),
                _ => return Err(self.fail_route()),
            }
        }

        let mut payload = "0".repeat(zeroes);
        payload.push_str(str::from_utf8(&text).expect("entity text is ASCII"));

        self.emit(Token::Text(payload));
        self.emit(Token::HtmlEntityEnd);
        Ok(())
    }

    /// Parse an HTML entity at the head of the wikitext.
    pub(crate) fn parse_entity(&mut self) -> ParseResult<()> {
        let reset = self.head;

        if self.check_route(Context::HTML_ENTITY).is_err() {
            self.head = reset;
            self.emit_char(b'&');
            return Ok(());
        }

        self.push(Context::HTML_ENTITY);

        match self.really_parse_entity() {
            Err(_) => {
                self.head = reset;
                self.emit_char(b'&');
                Ok(())
            }
            Ok(()) => {
                let tokens = self.pop();
                self.emit_all(tokens);
                Ok(())
            }
        }
    }
}
