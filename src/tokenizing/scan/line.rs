/*
 * tokenizing/scan/line.rs
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
    /// Emit the token for a single list marker at the head.
    ///
    /// A `;` additionally arms `DL_TERM`, so that a later `:` or newline on
    /// the line is treated as the term/description split.
    pub(crate) fn handle_list_marker(&mut self) {
        let marker = self.read(0);

        if marker == b';' {
            *self.context_mut() |= Context::DL_TERM;
        }

        let token = match marker {
            b':' => Token::DescriptionItem,
            b';' => Token::DescriptionTerm,
            b'#' => Token::OrderedListItem,
            b'*' => Token::UnorderedListItem,
            _ => {
                debug_assert!(false, "unexpected list marker");
                return;
            }
        };

        self.emit(token);
    }

    /// Handle a wiki-style list prefix (`#`, `*`, `;`, `:`) at line start.
    pub(crate) fn handle_list(&mut self) {
        let mut marker = self.read(1);
        self.handle_list_marker();

        while matches!(marker, b'#' | b'*' | b';' | b':') {
            self.head += 1;
            self.handle_list_marker();
            marker = self.read(1);
        }
    }

    /// Handle a horizontal rule (`----`) at line start.
    ///
    /// All consecutive dashes belong to the one rule.
    pub(crate) fn handle_hr(&mut self) {
        self.head += 3;

        while self.read(1) == b'-' {
            self.head += 1;
        }

        self.emit(Token::HorizontalRule);
    }

    /// Handle the term in a description list (`foo` in `;foo:bar`).
    pub(crate) fn handle_dl_term(&mut self) {
        *self.context_mut() -= Context::DL_TERM;

        if self.read(0) == b':' {
            self.handle_list_marker();
        } else {
            self.emit_char(b'\n');
        }
    }
}
