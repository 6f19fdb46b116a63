/*
 * tokenizing/scan/template.rs
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

use super::{Parsed, MAX_BRACES};
use crate::tokenizing::prelude::*;

impl Tokenizer<'_> {
    /// Parse a template at the head of the wikitext.
    fn parse_template(&mut self, has_content: bool) -> ParseResult<()> {
        let reset = self.head;
        let mut context = Context::TEMPLATE_NAME;

        if has_content {
            context |= Context::HAS_TEMPLATE;
        }

        let template = match self.parse_tokens(context, true) {
            Ok(template) => template,
            Err(route) => {
                self.head = reset;
                return Err(route);
            }
        };

        self.emit_first(Token::TemplateOpen);
        self.emit_all(template);
        self.emit(Token::TemplateClose);
        Ok(())
    }

    /// Parse a template argument (`{{{…}}}`) at the head of the wikitext.
    fn parse_argument(&mut self) -> ParseResult<()> {
        let reset = self.head;

        let argument = match self.parse_tokens(Context::ARGUMENT_NAME, true) {
            Ok(argument) => argument,
            Err(route) => {
                self.head = reset;
                return Err(route);
            }
        };

        self.emit_first(Token::ArgumentOpen);
        self.emit_all(argument);
        self.emit(Token::ArgumentClose);
        Ok(())
    }

    /// Parse a run of braces as some combination of templates and arguments.
    ///
    /// Each argument consumes three braces and each template two, working
    /// inward from the outside; whatever cannot be matched is emitted as
    /// literal braces.
    pub(crate) fn parse_template_or_argument(&mut self) -> ParseResult<()> {
        debug!("Parsing a brace run as templates or arguments");

        self.head += 2;
        let mut braces = 2;
        let mut has_content = false;

        while self.read(0) == b'{' && braces < MAX_BRACES {
            self.head += 1;
            braces += 1;
        }

        self.push(Context::empty());

        while braces > 0 {
            if braces == 1 {
                self.emit_text_then_stack("{");
                return Ok(());
            }

            if braces == 2 {
                if self.parse_template(has_content).is_err() {
                    self.emit_text_then_stack("{{");
                    return Ok(());
                }
                break;
            }

            if self.parse_argument().is_ok() {
                braces -= 3;
            } else if self.parse_template(has_content).is_ok() {
                braces -= 2;
            } else {
                let text = "{".repeat(braces);
                self.emit_text_then_stack(&text);
                return Ok(());
            }

            if braces > 0 {
                has_content = true;
                self.head += 1;
            }
        }

        let tokens = self.pop();
        self.emit_all(tokens);

        if self.context().contains(Context::FAIL_NEXT) {
            *self.context_mut() -= Context::FAIL_NEXT;
        }

        Ok(())
    }

    /// Handle a template parameter separator (`|`) at the head.
    pub(crate) fn handle_template_param(&mut self) -> ParseResult<()> {
        if self.context().contains(Context::TEMPLATE_NAME) {
            if !self
                .context()
                .intersects(Context::HAS_TEXT | Context::HAS_TEMPLATE)
            {
                return Err(self.fail_route());
            }
            *self.context_mut() -= Context::TEMPLATE_NAME;
        } else if self.context().contains(Context::TEMPLATE_PARAM_VALUE) {
            *self.context_mut() -= Context::TEMPLATE_PARAM_VALUE;
        }

        if self.context().contains(Context::TEMPLATE_PARAM_KEY) {
            let stack = self.pop();
            self.emit_all(stack);
        } else {
            *self.context_mut() |= Context::TEMPLATE_PARAM_KEY;
        }

        self.emit(Token::TemplateParamSeparator);
        let context = self.context();
        self.push(context);
        Ok(())
    }

    /// Handle a template parameter's value (`=`) at the head.
    pub(crate) fn handle_template_param_value(&mut self) {
        let stack = self.pop();
        self.emit_all(stack);

        *self.context_mut() -= Context::TEMPLATE_PARAM_KEY;
        *self.context_mut() |= Context::TEMPLATE_PARAM_VALUE;
        self.emit(Token::TemplateParamEquals);
    }

    /// Handle the end of a template (`}}`) at the head.
    pub(crate) fn handle_template_end(&mut self) -> ParseResult<Parsed> {
        if self.context().contains(Context::TEMPLATE_NAME) {
            if !self
                .context()
                .intersects(Context::HAS_TEXT | Context::HAS_TEMPLATE)
            {
                return Err(self.fail_route());
            }
        } else if self.context().contains(Context::TEMPLATE_PARAM_KEY) {
            let stack = self.pop();
            self.emit_all(stack);
        }

        self.head += 1;
        Ok(Parsed::Tokens(self.pop()))
    }

    /// Handle the separator between an argument's name and default (`|`).
    pub(crate) fn handle_argument_separator(&mut self) {
        *self.context_mut() -= Context::ARGUMENT_NAME;
        *self.context_mut() |= Context::ARGUMENT_DEFAULT;
        self.emit(Token::ArgumentSeparator);
    }

    /// Handle the end of an argument (`}}}`) at the head.
    pub(crate) fn handle_argument_end(&mut self) -> ParseResult<Parsed> {
        let stack = self.pop();
        self.head += 2;
        Ok(Parsed::Tokens(stack))
    }
}
