/*
 * tokenizing/scan/comment.rs
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
    /// Parse an HTML comment at the head of the wikitext.
    ///
    /// A comment which never closes is not a comment at all; its `<!--` is
    /// emitted literally and scanning resumes after it.
    pub(crate) fn parse_comment(&mut self) -> ParseResult<()> {
        debug!("Parsing an HTML comment");

        let reset = self.head + 3;
        self.head += 4;
        self.push(Context::empty());

        loop {
            let this = self.read(0);

            if this == b'\0' {
                self.pop();
                self.head = reset;
                self.emit_text("<!--");
                return Ok(());
            }

            if this == b'-' && self.read(1) == b'-' && self.read(2) == b'>' {
                self.emit_first(Token::CommentStart);
                self.emit(Token::CommentEnd);

                let comment = self.pop();
                self.emit_all(comment);
                self.head += 2;

                if self.context().contains(Context::FAIL_NEXT) {
                    // verify_safe() sets this flag while parsing a template
                    // name or link title when it runs into what might be a
                    // comment; it was one, so the obligation is discharged.
                    *self.context_mut() -= Context::FAIL_NEXT;
                }

                return Ok(());
            }

            self.emit_char(this);
            self.head += 1;
        }
    }
}
