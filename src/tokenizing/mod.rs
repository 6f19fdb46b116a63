/*
 * tokenizing/mod.rs
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

mod buffer;
mod context;
mod route;
mod scan;
mod stack;
mod tag_data;
mod token;
mod tokenizer;

mod prelude {
    pub use super::buffer::Textbuffer;
    pub use super::context::{Context, GlobalContext};
    pub use super::tag_data::{TagContext, TagData};
    pub use super::token::{Token, TokenList};
    pub use super::tokenizer::{BadRoute, ParseResult, Tokenizer, MAX_DEPTH};
}

pub use self::token::{detokenize, Token, TokenList};

use self::context::Context;
use self::scan::Parsed;
use self::tokenizer::Tokenizer;

/// Tokenize the given wikitext into a flat list of tokens.
///
/// Any input produces a token stream. Constructs which fail to parse
/// degrade into plain text rather than producing an error; there is no
/// such thing as a syntax error at this layer.
///
/// With `skip_style_tags` set, `''` and `'''` are treated as ordinary
/// apostrophes instead of italic/bold markers.
///
/// The output is deterministic for a fixed input and flag.
pub fn tokenize(text: &str, skip_style_tags: bool) -> TokenList {
    info!(
        "Running tokenizer on {} bytes of wikitext (skip_style_tags {})",
        text.len(),
        skip_style_tags,
    );

    let mut tokenizer = Tokenizer::new(text, skip_style_tags);

    match tokenizer.parse(Context::empty(), true) {
        Ok(Parsed::Tokens(tokens)) => tokens,
        // The outermost frame carries no context that can fail, so neither
        // of these is reachable. Degrade into one raw text token and log it,
        // since losing structure beats losing input.
        Ok(Parsed::Heading(_)) | Err(_) => {
            error!("Tokenizer failed at the outermost frame, emitting input as raw text");
            debug_assert!(false, "outermost frame failed");

            if text.is_empty() {
                TokenList::new()
            } else {
                vec![Token::Text(text.to_owned())]
            }
        }
    }
}
