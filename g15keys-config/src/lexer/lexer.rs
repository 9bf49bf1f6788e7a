use logos::{Lexer as LogosLexer, Logos};

use super::Token;
use crate::error::DescriptorError;

/// Wraps the logos lexer and reports failures with their column
pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token>,
    pub input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: Token::lexer(input),
            input,
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, DescriptorError> {
        match self.inner.next() {
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(())) => {
                let span = self.inner.span();
                Err(DescriptorError::UnexpectedText {
                    column: span.start + 1,
                    text: self.input[span.start..span.end].to_string(),
                })
            }
            None => Ok(None),
        }
    }

    /// 1-based column of the token returned last
    pub fn column(&self) -> usize {
        self.inner.span().start + 1
    }

    pub fn collect_all(mut self) -> Result<Vec<(usize, Token)>, DescriptorError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push((self.column(), token));
        }
        Ok(tokens)
    }
}
