/*
 * lib.rs
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

#![deny(missing_debug_implementations)]

//! A library to tokenize MediaWiki wikitext.
//!
//! The tokenizer scans a wikitext source string and emits a flat, linear
//! sequence of typed tokens which a downstream layer can assemble into a
//! parse tree. Scanning is recursive and backtracking: each construct under
//! consideration gets its own parse frame, and routes which turn out to be
//! invalid are abandoned, their source emitted as plain text instead. Failed
//! routes are memoized so that pathological inputs (templates that look like
//! external links that look like wikilinks) stay tractable.
//!
//! No parsing issue is fatal. Whatever the input, [`tokenize`] produces a
//! token stream; malformed constructs merely degrade into coarser text
//! tokens.

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde;

#[macro_use]
mod macros;

pub mod definitions;

mod tokenizing;

#[cfg(test)]
mod test;

pub use self::tokenizing::{detokenize, tokenize, Token, TokenList};

pub mod prelude {
    pub use super::{definitions, detokenize, tokenize, Token, TokenList};
}
