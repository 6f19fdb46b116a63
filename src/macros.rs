/*
 * macros.rs
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

/// Alias for `Token::Text` from anything string-like.
macro_rules! text {
    ($value:expr $(,)?) => {{
        use crate::tokenizing::Token;
        Token::Text($value.into())
    }};
}

#[test]
fn macros() {
    use crate::tokenizing::Token;

    let text_token = text!("alpha");
    assert_eq!(text_token, Token::Text(String::from("alpha")));
}
