/*
 * tokenizing/buffer.rs
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

use std::str;

const INITIAL_CAPACITY: usize = 32;

/// Growable byte buffer holding text which has not yet been emitted.
///
/// Each parse frame owns one. Bytes are accumulated as they are scanned and
/// flushed into a single `Token::Text` when a structural token needs to be
/// emitted. All structural markers are ASCII, so the buffer always holds
/// complete UTF-8 sequences.
#[derive(Debug, Default)]
pub struct Textbuffer {
    data: Vec<u8>,
}

impl Textbuffer {
    pub fn new() -> Self {
        Textbuffer {
            data: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a single byte to the end of the buffer.
    #[inline]
    pub fn write(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Read the byte at the given index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn read(&self, index: usize) -> u8 {
        self.data[index]
    }

    /// Append the contents of another buffer onto the end of this one.
    pub fn concat(&mut self, other: &Textbuffer) {
        self.data.extend_from_slice(&other.data);
    }

    /// Clear the buffer's contents. Its capacity is retained.
    #[inline]
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Drop all but the first `len` bytes of the buffer.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Reverse the codepoints of the buffer in place.
    pub fn reverse(&mut self) {
        let text = str::from_utf8(&self.data).expect("textbuffer holds invalid UTF-8");
        let reversed: String = text.chars().rev().collect();
        self.data = reversed.into_bytes();
    }

    /// Copy the buffer's contents out as an owned string.
    pub fn export(&self) -> String {
        str::from_utf8(&self.data)
            .expect("textbuffer holds invalid UTF-8")
            .to_owned()
    }
}

#[test]
fn write_and_export() {
    let mut buffer = Textbuffer::new();
    assert!(buffer.is_empty());

    for byte in b"apple" {
        buffer.write(*byte);
    }

    assert_eq!(buffer.len(), 5);
    assert_eq!(buffer.read(0), b'a');
    assert_eq!(buffer.read(4), b'e');
    assert_eq!(buffer.export(), "apple");

    buffer.reset();
    assert!(buffer.is_empty());
    assert_eq!(buffer.export(), "");
}

#[test]
fn concat() {
    let mut first = Textbuffer::new();
    let mut second = Textbuffer::new();

    for byte in b"banana" {
        first.write(*byte);
    }
    for byte in b" cherry" {
        second.write(*byte);
    }

    first.concat(&second);
    assert_eq!(first.export(), "banana cherry");
    assert_eq!(second.export(), " cherry");
}

#[test]
fn truncate() {
    let mut buffer = Textbuffer::new();
    for byte in b"durian" {
        buffer.write(*byte);
    }

    buffer.truncate(2);
    assert_eq!(buffer.export(), "du");

    buffer.truncate(10);
    assert_eq!(buffer.export(), "du");
}

#[test]
fn reverse() {
    let mut buffer = Textbuffer::new();
    for byte in b"https" {
        buffer.write(*byte);
    }

    buffer.reverse();
    assert_eq!(buffer.export(), "sptth");

    // Codepoints are reversed, not bytes
    let mut buffer = Textbuffer::new();
    for byte in "aé!".as_bytes() {
        buffer.write(*byte);
    }

    buffer.reverse();
    assert_eq!(buffer.export(), "!éa");
}
