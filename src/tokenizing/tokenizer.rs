/*
 * tokenizing/tokenizer.rs
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
use super::context::{Context, GlobalContext};
use super::route::{RouteCache, StackIdent};
use super::stack::Stack;
use super::token::{Token, TokenList};

/// How deep the frame stack may grow before the scanner stops recursing
/// and emits characters literally instead.
pub const MAX_DEPTH: usize = 100;

/// A parse route that has failed.
///
/// Raised by `fail_route()` and propagated with `?` until some caller knows
/// how to fall back, usually by resetting the head and emitting the
/// construct's opening markers as plain text. It never escapes the driver.
#[derive(Debug)]
pub struct BadRoute {
    /// The context of the frame that failed.
    pub context: Context,
}

pub type ParseResult<T> = Result<T, BadRoute>;

/// All state for one tokenization of one input.
#[derive(Debug)]
pub struct Tokenizer<'t> {
    /// The wikitext being tokenized.
    pub(super) text: &'t [u8],

    /// The frame stack. Never empty while scanning.
    pub(super) stacks: Vec<Stack>,

    /// Current byte offset into the text.
    pub(super) head: usize,

    /// Flags global to the whole parse.
    pub(super) global: GlobalContext,

    /// Frame identities known to fail.
    pub(super) bad_routes: RouteCache,

    /// Whether `''` and `'''` should be treated as plain text.
    pub(super) skip_style_tags: bool,
}

impl<'t> Tokenizer<'t> {
    pub fn new(text: &'t str, skip_style_tags: bool) -> Self {
        Tokenizer {
            text: text.as_bytes(),
            stacks: Vec::new(),
            head: 0,
            global: GlobalContext::empty(),
            bad_routes: RouteCache::new(),
            skip_style_tags,
        }
    }

    // Frame accessors

    #[inline]
    pub(super) fn top(&self) -> &Stack {
        self.stacks.last().expect("frame stack is empty")
    }

    #[inline]
    pub(super) fn top_mut(&mut self) -> &mut Stack {
        self.stacks.last_mut().expect("frame stack is empty")
    }

    /// The context of the topmost frame.
    #[inline]
    pub(super) fn context(&self) -> Context {
        self.top().context
    }

    #[inline]
    pub(super) fn context_mut(&mut self) -> &mut Context {
        &mut self.top_mut().context
    }

    #[inline]
    pub(super) fn current_ident(&self) -> StackIdent {
        self.top().ident
    }

    #[inline]
    pub(super) fn depth(&self) -> usize {
        self.stacks.len()
    }

    #[inline]
    pub(super) fn can_recurse(&self) -> bool {
        self.depth() < MAX_DEPTH
    }

    // Stack manipulation

    /// Add a new frame with the given context to the stack.
    pub(super) fn push(&mut self, context: Context) {
        trace!(
            "Pushing new frame (head {}, context {:?}, depth {})",
            self.head,
            context,
            self.depth() + 1,
        );

        self.stacks.push(Stack::new(self.head, context));
    }

    /// Flush the current textbuffer as a `Text` token, if it has content.
    pub(super) fn push_textbuffer(&mut self) {
        let top = self.top_mut();
        if top.textbuffer.is_empty() {
            return;
        }

        let text = top.textbuffer.export();
        top.tokens.push(Token::Text(text));
        top.textbuffer.reset();
    }

    /// Pop the current frame, returning its token list.
    pub(super) fn pop(&mut self) -> TokenList {
        self.push_textbuffer();
        let stack = self.stacks.pop().expect("frame stack is empty");

        trace!(
            "Popped frame with {} tokens (depth {})",
            stack.tokens.len(),
            self.depth(),
        );

        stack.tokens
    }

    /// Pop the current frame, copying its context into the frame below.
    ///
    /// Used after table cell style separators, where the popped cell's line
    /// contexts must survive into the enclosing frame.
    pub(super) fn pop_keeping_context(&mut self) -> TokenList {
        self.push_textbuffer();
        let stack = self.stacks.pop().expect("frame stack is empty");
        self.top_mut().context = stack.context;
        stack.tokens
    }

    /// Remember that the current frame's route is invalid.
    ///
    /// Future attempts to parse from the same position with the same context
    /// will be failed immediately by `check_route()`.
    pub(super) fn memoize_bad_route(&mut self) {
        self.bad_routes.insert(self.top().ident);
    }

    /// Fail the current route.
    ///
    /// Memoizes the frame's identity, discards the frame wholesale, and
    /// returns the `BadRoute` for the caller to propagate.
    pub(super) fn fail_route(&mut self) -> BadRoute {
        let context = self.context();

        debug!(
            "Failing route (head {}, context {:?})",
            self.head, context,
        );

        self.memoize_bad_route();
        self.pop();
        BadRoute { context }
    }

    /// Check whether pushing a route here with the given context would
    /// definitely fail, based on a previously memoized failure.
    ///
    /// Nothing is pushed or popped either way; on a known-bad route the
    /// caller receives the error directly.
    pub(super) fn check_route(&mut self, context: Context) -> ParseResult<()> {
        let ident = StackIdent {
            head: self.head,
            context,
        };

        if self.bad_routes.contains(ident) {
            trace!(
                "Route memoized as bad, failing early (head {}, context {:?})",
                ident.head,
                ident.context,
            );
            return Err(BadRoute { context });
        }

        Ok(())
    }

    // Emission

    /// Write a token to the current frame.
    pub(super) fn emit(&mut self, token: Token) {
        self.push_textbuffer();
        self.top_mut().tokens.push(token);
    }

    /// Write a token to the *beginning* of the current frame.
    pub(super) fn emit_first(&mut self, token: Token) {
        self.push_textbuffer();
        self.top_mut().tokens.insert(0, token);
    }

    /// Write a byte of text to the current textbuffer.
    #[inline]
    pub(super) fn emit_char(&mut self, byte: u8) {
        self.top_mut().textbuffer.write(byte);
    }

    /// Write a string of text to the current textbuffer.
    pub(super) fn emit_text(&mut self, text: &str) {
        for &byte in text.as_bytes() {
            self.emit_char(byte);
        }
    }

    /// Write the contents of another textbuffer to the current textbuffer.
    pub(super) fn emit_textbuffer(&mut self, buffer: Textbuffer) {
        self.top_mut().textbuffer.concat(&buffer);
    }

    /// Write a series of tokens to the current frame at once.
    ///
    /// If the incoming list leads with a `Text` token, its payload is merged
    /// into the current textbuffer instead, so that adjacent text stays
    /// merged across a pop boundary.
    pub(super) fn emit_all(&mut self, mut tokens: TokenList) {
        if let Some(Token::Text(_)) = tokens.first() {
            if let Token::Text(text) = tokens.remove(0) {
                self.emit_text(&text);
            }
        }

        self.push_textbuffer();
        self.top_mut().tokens.append(&mut tokens);
    }

    /// Pop the current frame, emit the given text in the parent, then emit
    /// the popped tokens after it.
    ///
    /// The head decrement compensates for the scan loop's unconditional
    /// post-increment.
    pub(super) fn emit_text_then_stack(&mut self, text: &str) {
        let tokens = self.pop();
        self.emit_text(text);

        if !tokens.is_empty() {
            self.emit_all(tokens);
        }

        self.head -= 1;
    }

    /// Flush a pending tail buffer into the current textbuffer.
    ///
    /// Free external links accumulate trailing punctuation here until it is
    /// known whether the link continues past it.
    pub(super) fn flush_tail(&mut self, tail: &mut Textbuffer) {
        if !tail.is_empty() {
            self.top_mut().textbuffer.concat(tail);
            tail.reset();
        }
    }

    // Reading

    /// Read the byte at a relative point ahead of the head.
    ///
    /// The NUL byte stands in for the end of input.
    #[inline]
    pub(super) fn read(&self, delta: usize) -> u8 {
        let index = self.head + delta;

        if index >= self.text.len() {
            return b'\0';
        }

        self.text[index]
    }

    /// Read the byte at a relative point behind the head.
    #[inline]
    pub(super) fn read_backwards(&self, delta: usize) -> u8 {
        if delta > self.head {
            return b'\0';
        }

        self.text[self.head - delta]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokenizer(text: &'static str) -> Tokenizer<'static> {
        let mut tokenizer = Tokenizer::new(text, false);
        tokenizer.push(Context::empty());
        tokenizer
    }

    #[test]
    fn read() {
        let mut tok = tokenizer("ab");
        assert_eq!(tok.read(0), b'a');
        assert_eq!(tok.read(1), b'b');
        assert_eq!(tok.read(2), b'\0');
        assert_eq!(tok.read(100), b'\0');

        assert_eq!(tok.read_backwards(0), b'a');
        assert_eq!(tok.read_backwards(1), b'\0');

        tok.head = 1;
        assert_eq!(tok.read(0), b'b');
        assert_eq!(tok.read_backwards(1), b'a');
        assert_eq!(tok.read_backwards(2), b'\0');
    }

    #[test]
    fn emit_merges_text() {
        let mut tok = tokenizer("");
        tok.emit_text("ab");
        tok.emit_text("cd");
        tok.emit(Token::TemplateOpen);
        tok.emit_text("ef");

        let tokens = tok.pop();
        assert_eq!(
            tokens,
            vec![text!("abcd"), Token::TemplateOpen, text!("ef")],
        );
    }

    #[test]
    fn emit_first() {
        let mut tok = tokenizer("");
        tok.emit_text("inner");
        tok.emit_first(Token::CommentStart);
        tok.emit(Token::CommentEnd);

        let tokens = tok.pop();
        assert_eq!(
            tokens,
            vec![Token::CommentStart, text!("inner"), Token::CommentEnd],
        );
    }

    #[test]
    fn emit_all_merges_leading_text() {
        let mut tok = tokenizer("");
        tok.emit_text("outer ");

        let child = vec![text!("inner"), Token::TemplateOpen];
        tok.emit_all(child);

        let tokens = tok.pop();
        assert_eq!(tokens, vec![text!("outer inner"), Token::TemplateOpen]);
    }

    #[test]
    fn fail_route_memoizes() {
        let mut tok = tokenizer("abc");
        tok.head = 1;
        assert!(tok.check_route(Context::TEMPLATE_NAME).is_ok());

        tok.push(Context::TEMPLATE_NAME);
        let route = tok.fail_route();
        assert_eq!(route.context, Context::TEMPLATE_NAME);
        assert_eq!(tok.depth(), 1);

        assert!(tok.check_route(Context::TEMPLATE_NAME).is_err());
        assert!(tok.check_route(Context::ARGUMENT_NAME).is_ok());

        tok.head = 2;
        assert!(tok.check_route(Context::TEMPLATE_NAME).is_ok());
    }

    #[test]
    fn pop_keeping_context() {
        let mut tok = tokenizer("");
        tok.push(Context::TABLE_OPEN | Context::TABLE_TD_LINE);
        tok.pop_keeping_context();

        assert_eq!(
            tok.context(),
            Context::TABLE_OPEN | Context::TABLE_TD_LINE,
        );
    }

    #[test]
    fn textbuffer_flushes_on_pop() {
        let mut tok = tokenizer("");
        tok.emit_text("pending");

        let tokens = tok.pop();
        assert_eq!(tokens, vec![text!("pending")]);
    }
}
