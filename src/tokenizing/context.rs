/*
 * tokenizing/context.rs
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

use bitflags::bitflags;

bitflags! {
    /// What the tokenizer is currently inside.
    ///
    /// Each parse frame carries one of these. The flags are not mutually
    /// exclusive within a group; several coexist routinely (for instance
    /// `TABLE_OPEN | TABLE_ROW_OPEN | TABLE_TD_LINE`), which is why this is
    /// one wide flag word rather than an enum.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Context: u64 {
        // Templates
        const TEMPLATE_NAME        = 1 << 0;
        const TEMPLATE_PARAM_KEY   = 1 << 1;
        const TEMPLATE_PARAM_VALUE = 1 << 2;

        // Template arguments
        const ARGUMENT_NAME    = 1 << 3;
        const ARGUMENT_DEFAULT = 1 << 4;

        // Wikilinks
        const WIKILINK_TITLE = 1 << 5;
        const WIKILINK_TEXT  = 1 << 6;

        // External links
        const EXT_LINK_URI   = 1 << 7;
        const EXT_LINK_TITLE = 1 << 8;

        // Headings
        const HEADING_LEVEL_1 = 1 << 9;
        const HEADING_LEVEL_2 = 1 << 10;
        const HEADING_LEVEL_3 = 1 << 11;
        const HEADING_LEVEL_4 = 1 << 12;
        const HEADING_LEVEL_5 = 1 << 13;
        const HEADING_LEVEL_6 = 1 << 14;

        // HTML tags
        const TAG_OPEN  = 1 << 15;
        const TAG_ATTR  = 1 << 16;
        const TAG_BODY  = 1 << 17;
        const TAG_CLOSE = 1 << 18;

        // Bold and italics
        const STYLE_ITALICS     = 1 << 19;
        const STYLE_BOLD        = 1 << 20;
        const STYLE_PASS_AGAIN  = 1 << 21;
        const STYLE_SECOND_PASS = 1 << 22;

        // Description lists
        const DL_TERM = 1 << 23;

        // Safety check bookkeeping
        const HAS_TEXT       = 1 << 24;
        const FAIL_ON_TEXT   = 1 << 25;
        const FAIL_NEXT      = 1 << 26;
        const FAIL_ON_LBRACE = 1 << 27;
        const FAIL_ON_RBRACE = 1 << 28;
        const FAIL_ON_EQUALS = 1 << 29;
        const HAS_TEMPLATE   = 1 << 30;

        // Tables
        const TABLE_OPEN       = 1 << 31;
        const TABLE_CELL_OPEN  = 1 << 32;
        const TABLE_CELL_STYLE = 1 << 33;
        const TABLE_ROW_OPEN   = 1 << 34;
        const TABLE_TD_LINE    = 1 << 35;
        const TABLE_TH_LINE    = 1 << 36;

        // HTML entities
        const HTML_ENTITY = 1 << 37;

        // Aggregates

        const TEMPLATE = Self::TEMPLATE_NAME.bits()
            | Self::TEMPLATE_PARAM_KEY.bits()
            | Self::TEMPLATE_PARAM_VALUE.bits();

        const ARGUMENT = Self::ARGUMENT_NAME.bits() | Self::ARGUMENT_DEFAULT.bits();

        const WIKILINK = Self::WIKILINK_TITLE.bits() | Self::WIKILINK_TEXT.bits();

        const EXT_LINK = Self::EXT_LINK_URI.bits() | Self::EXT_LINK_TITLE.bits();

        const HEADING = Self::HEADING_LEVEL_1.bits()
            | Self::HEADING_LEVEL_2.bits()
            | Self::HEADING_LEVEL_3.bits()
            | Self::HEADING_LEVEL_4.bits()
            | Self::HEADING_LEVEL_5.bits()
            | Self::HEADING_LEVEL_6.bits();

        const TAG = Self::TAG_OPEN.bits()
            | Self::TAG_ATTR.bits()
            | Self::TAG_BODY.bits()
            | Self::TAG_CLOSE.bits();

        const STYLE = Self::STYLE_ITALICS.bits()
            | Self::STYLE_BOLD.bits()
            | Self::STYLE_PASS_AGAIN.bits()
            | Self::STYLE_SECOND_PASS.bits();

        const TABLE = Self::TABLE_OPEN.bits()
            | Self::TABLE_CELL_OPEN.bits()
            | Self::TABLE_CELL_STYLE.bits()
            | Self::TABLE_ROW_OPEN.bits()
            | Self::TABLE_TD_LINE.bits()
            | Self::TABLE_TH_LINE.bits();

        const TABLE_CELL_LINE_CONTEXTS = Self::TABLE_TD_LINE.bits()
            | Self::TABLE_TH_LINE.bits()
            | Self::TABLE_CELL_STYLE.bits();

        /// Contexts in which `verify_safe` must vet every character.
        const UNSAFE = Self::TEMPLATE_NAME.bits()
            | Self::WIKILINK_TITLE.bits()
            | Self::EXT_LINK_TITLE.bits()
            | Self::TEMPLATE_PARAM_KEY.bits()
            | Self::ARGUMENT_NAME.bits()
            | Self::TAG_CLOSE.bits();

        /// Contexts which require a double pop when their route fails.
        const DOUBLE = Self::TEMPLATE_PARAM_KEY.bits()
            | Self::TAG_CLOSE.bits()
            | Self::TABLE_CELL_OPEN.bits();

        /// Contexts for which an unterminated end of input means failure.
        const FAIL = Self::TEMPLATE.bits()
            | Self::ARGUMENT.bits()
            | Self::WIKILINK.bits()
            | Self::EXT_LINK_TITLE.bits()
            | Self::HEADING.bits()
            | Self::TAG.bits()
            | Self::STYLE.bits()
            | Self::TABLE_OPEN.bits();

        const NO_WIKILINKS = Self::TEMPLATE_NAME.bits()
            | Self::ARGUMENT_NAME.bits()
            | Self::WIKILINK_TITLE.bits()
            | Self::EXT_LINK_URI.bits();

        const NO_EXT_LINKS = Self::TEMPLATE_NAME.bits()
            | Self::ARGUMENT_NAME.bits()
            | Self::WIKILINK_TITLE.bits()
            | Self::EXT_LINK.bits();
    }
}

bitflags! {
    /// Flags global to the whole tokenization, independent of frames.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GlobalContext: u32 {
        const HEADING = 1 << 0;
    }
}

impl Context {
    /// Return the heading level encoded within this context.
    pub fn heading_level(self) -> u8 {
        let mut bits =
            (self & Context::HEADING).bits() / Context::HEADING_LEVEL_1.bits();
        let mut level = 1;

        while bits > 1 {
            level += 1;
            bits >>= 1;
        }

        level
    }

    /// Return the context for a heading of the given level.
    pub fn heading_context(level: u8) -> Context {
        debug_assert!((1..=6).contains(&level));
        Context::from_bits_retain(Context::HEADING_LEVEL_1.bits() << (level - 1))
    }
}

#[test]
fn aggregates() {
    assert!(Context::TEMPLATE.contains(Context::TEMPLATE_PARAM_VALUE));
    assert!(Context::FAIL.contains(Context::HEADING_LEVEL_4));
    assert!(Context::FAIL.contains(Context::TABLE_OPEN));
    assert!(!Context::FAIL.contains(Context::TABLE_TD_LINE));
    assert!(Context::UNSAFE.contains(Context::TAG_CLOSE));
    assert!(!Context::UNSAFE.contains(Context::TAG_BODY));
    assert!(Context::NO_EXT_LINKS.contains(Context::EXT_LINK_URI));
    assert!(!Context::NO_WIKILINKS.contains(Context::EXT_LINK_TITLE));
}

#[test]
fn heading_levels() {
    for level in 1..=6 {
        let context = Context::heading_context(level);
        assert!(Context::HEADING.contains(context));
        assert_eq!(context.heading_level(), level);
    }

    // Other flags do not disturb the level
    let context = Context::heading_context(3) | Context::HAS_TEXT;
    assert_eq!(context.heading_level(), 3);
}
