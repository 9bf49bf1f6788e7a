//! Parses one action descriptor string into its actions.
//!
//! ```text
//! record                      start macro recording
//! switch-profile <name>       switch the active profile
//! set-leds m1,m3              light the listed M-key LEDs
//! emit k+133,k+10,k-10,k-133  synthesize input, in order
//! k+38,k-38                   same as emit
//! /usr/bin/xterm -e top       anything else runs a program
//! ```

use std::path::PathBuf;

use g15keys_core::{ActionSpec, InputToken, LedMask};

use crate::error::DescriptorError;
use crate::lexer::{Lexer, Token};

const RECORD: &str = "record";
const SWITCH_PROFILE: &str = "switch-profile";
const SET_LEDS: &str = "set-leds";
const EMIT: &str = "emit";

pub fn parse_descriptor(text: &str) -> Result<Vec<ActionSpec>, DescriptorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DescriptorError::Empty);
    }

    if text == RECORD {
        return Ok(vec![ActionSpec::StartRecording]);
    }

    if let Some(rest) = strip_keyword(text, SWITCH_PROFILE) {
        let target = rest.trim();
        if target.is_empty() {
            return Err(DescriptorError::MissingOperand {
                keyword: SWITCH_PROFILE,
                what: "a profile name",
            });
        }
        return Ok(vec![ActionSpec::switch_mode(target)]);
    }

    if let Some(rest) = strip_keyword(text, SET_LEDS) {
        return Ok(vec![ActionSpec::SetLeds(parse_leds(rest)?)]);
    }

    if let Some(rest) = strip_keyword(text, EMIT) {
        if rest.trim().is_empty() {
            return Err(DescriptorError::MissingOperand {
                keyword: EMIT,
                what: "at least one input token",
            });
        }
        return Ok(emit_all(parse_tokens(rest)?));
    }

    if looks_like_token_list(text) {
        return Ok(emit_all(parse_tokens(text)?));
    }

    parse_command(text)
}

/// Parse a comma-separated list such as `k+133,k-133,m+1`
pub fn parse_tokens(text: &str) -> Result<Vec<InputToken>, DescriptorError> {
    let items = split_list(text)?;
    items
        .into_iter()
        .map(|(column, token)| to_input(column, token))
        .collect()
}

fn parse_leds(text: &str) -> Result<LedMask, DescriptorError> {
    let mut mask = LedMask::empty();
    for (column, token) in split_list(text)? {
        mask |= match token {
            Token::Led(1) => LedMask::M1,
            Token::Led(2) => LedMask::M2,
            Token::Led(3) => LedMask::M3,
            Token::LedRecord => LedMask::MR,
            _ => {
                return Err(DescriptorError::Expected {
                    column,
                    expected: "an LED name (m1, m2, m3, mr)",
                })
            }
        };
    }
    Ok(mask)
}

/// Items of a comma-separated token list, with their columns
fn split_list(text: &str) -> Result<Vec<(usize, Token)>, DescriptorError> {
    let tokens = Lexer::new(text).collect_all()?;
    let mut items = Vec::new();
    let mut expect_item = true;

    for (column, token) in tokens {
        match (expect_item, token) {
            (true, Token::Comma) => {
                return Err(DescriptorError::Expected {
                    column,
                    expected: "a list item",
                })
            }
            (true, token) => {
                items.push((column, token));
                expect_item = false;
            }
            (false, Token::Comma) => expect_item = true,
            (false, _) => {
                return Err(DescriptorError::Expected {
                    column,
                    expected: "','",
                })
            }
        }
    }

    if expect_item && !items.is_empty() {
        return Err(DescriptorError::Expected {
            column: text.len() + 1,
            expected: "a list item after ','",
        });
    }
    Ok(items)
}

fn to_input(column: usize, token: Token) -> Result<InputToken, DescriptorError> {
    let input = match token {
        Token::KeyPress(code) => InputToken::KeyPress(code),
        Token::KeyRelease(code) => InputToken::KeyRelease(code),
        Token::ButtonPress(code) => InputToken::ButtonPress(code),
        Token::ButtonRelease(code) => InputToken::ButtonRelease(code),
        _ => {
            return Err(DescriptorError::Expected {
                column,
                expected: "an input token (k+N, k-N, m+N, m-N)",
            })
        }
    };

    let (kind, range) = if input.is_button() {
        ("button", InputToken::BUTTON_CODES)
    } else {
        ("key", InputToken::KEY_CODES)
    };
    if !range.contains(&input.code()) {
        return Err(DescriptorError::CodeOutOfRange {
            kind,
            code: input.code(),
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(input)
}

fn emit_all(tokens: Vec<InputToken>) -> Vec<ActionSpec> {
    tokens.into_iter().map(ActionSpec::EmitInput).collect()
}

fn parse_command(text: &str) -> Result<Vec<ActionSpec>, DescriptorError> {
    let words = shell_words::split(text).map_err(|err| DescriptorError::Quoting(err.to_string()))?;
    let mut words = words.into_iter();
    let program = words.next().unwrap_or_default();

    // Relative and empty paths are rejected when the configuration is built
    Ok(vec![ActionSpec::RunProgram {
        path: PathBuf::from(program),
        args: words.collect(),
    }])
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn looks_like_token_list(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 3
        && matches!(bytes[0], b'k' | b'm')
        && matches!(bytes[1], b'+' | b'-')
        && bytes[2].is_ascii_digit()
}
