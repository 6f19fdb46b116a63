/*
 * tokenizing/tag_data.rs
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

use super::buffer::Textbuffer;
use bitflags::bitflags;

bitflags! {
    /// Which part of an HTML open tag the scanner is currently in.
    ///
    /// Unlike [`Context`](super::context::Context), these states belong to
    /// the scratch [`TagData`] rather than to a parse frame; the tag scanner
    /// rewrites the whole word as it moves between states.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TagContext: u8 {
        const NAME        = 1 << 0;
        const ATTR_READY  = 1 << 1;
        const ATTR_NAME   = 1 << 2;
        const ATTR_VALUE  = 1 << 3;
        const QUOTED      = 1 << 4;
        const NOTE_SPACE  = 1 << 5;
        const NOTE_EQUALS = 1 << 6;
        const NOTE_QUOTE  = 1 << 7;
    }
}

/// Scratch state for an HTML open tag in progress.
#[derive(Debug)]
pub struct TagData {
    pub context: TagContext,

    // Whitespace captured around the current attribute. These paddings
    // belong to the tree-building layer; the tokenizer only collects them.
    pub pad_first: Textbuffer,
    pub pad_before_eq: Textbuffer,
    pub pad_after_eq: Textbuffer,

    /// The quote character opening the current attribute value, if any.
    pub quoter: u8,

    /// Head position to return to if a quoted value never closes.
    pub reset: usize,
}

impl TagData {
    pub fn new() -> Self {
        TagData {
            context: TagContext::NAME,
            pad_first: Textbuffer::new(),
            pad_before_eq: Textbuffer::new(),
            pad_after_eq: Textbuffer::new(),
            quoter: 0,
            reset: 0,
        }
    }

    pub fn reset_buffers(&mut self) {
        self.pad_first.reset();
        self.pad_before_eq.reset();
        self.pad_after_eq.reset();
    }
}

#[test]
fn reset_buffers() {
    let mut data = TagData::new();
    data.pad_first.write(b' ');
    data.pad_before_eq.write(b' ');
    data.pad_after_eq.write(b' ');

    data.reset_buffers();
    assert!(data.pad_first.is_empty());
    assert!(data.pad_before_eq.is_empty());
    assert!(data.pad_after_eq.is_empty());
}
