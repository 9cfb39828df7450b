// crates/cameo-logic/src/dsl.rs
// ============================================================================
// Module: Condition DSL Parser
// Description: Author-facing expression syntax for rule conditions.
// Purpose: Turn table-file expressions into validated `Condition<P>` trees.
// Dependencies: crate::condition, crate::validate
// ============================================================================

//! ## Overview
//!
//! Coding tables are maintained by hand, so rule guards are written as short
//! expressions rather than nested TOML. The DSL supports boolean composition
//! (`all`, `any`, `not`, `&&`, `||`, `!`), `at_least(n, ...)`, and predicate
//! calls with string arguments that a [`PredicateResolver`] turns into the
//! domain predicate type.
//!
//! ### Grammar (informal)
//! - **Predicates**: `self_identifies`, `parent("Protestant")`,
//!   `attribute("region", "Levant")`
//! - **Boolean operators**: `a && b`, `a || b`, `!a`, `all(a, b)`, `any(a, b)`,
//!   `not(a)`
//! - **Groups**: `at_least(2, a, b, c)`
//! - **Strings**: double-quoted, `\"` and `\\` escapes
//!
//! ### Example
//!
//! ```
//! use cameo_logic::Condition;
//! use cameo_logic::dsl::parse_condition;
//!
//! let resolver = |name: &str, args: &[String]| match (name, args) {
//!     ("parent", [value]) => Some(format!("parent={value}")),
//!     ("self_identifies", []) => Some("self".to_string()),
//!     _ => None,
//! };
//! let condition: Condition<String> =
//!     parse_condition(r#"parent("Protestant") && !self_identifies"#, &resolver).unwrap();
//! assert_eq!(condition.specificity(), 2);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use crate::condition::Condition;
use crate::validate::ConditionValidator;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed DSL input size in bytes.
const MAX_DSL_INPUT_BYTES: usize = 64 * 1024;
/// Maximum supported nesting depth for DSL expressions.
const MAX_DSL_NESTING: usize = 32;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Errors that can occur while parsing or validating a DSL expression.
///
/// # Invariants
/// - None. Variants capture structured parse and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslError {
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded the size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the nesting limit.
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Depth when the error occurred.
        actual_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// String literal was not closed before end of input.
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },
    /// Predicate name or arity was not recognized by the resolver.
    UnknownPredicate {
        /// The unresolved predicate name.
        name: String,
        /// Number of arguments supplied.
        arity: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Numeric literal failed to parse or overflowed.
    InvalidNumber {
        /// The raw numeric text.
        raw: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Structural validation failed after parsing.
    Validation(String),
    /// Unexpected trailing input after a complete expression.
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "condition is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "condition exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestingTooDeep {
                max_depth,
                actual_depth,
                position,
            } => write!(
                f,
                "condition nesting exceeds limit: depth {actual_depth} (max {max_depth}) at \
                 {position}"
            ),
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => write!(f, "unexpected token `{found}` at {position}, expected {expected}"),
            Self::UnterminatedString {
                position,
            } => write!(f, "unterminated string starting at {position}"),
            Self::UnknownPredicate {
                name,
                arity,
                position,
            } => write!(f, "unknown predicate `{name}` with {arity} argument(s) at {position}"),
            Self::InvalidNumber {
                raw,
                position,
            } => write!(f, "invalid number `{raw}` at {position}"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::TrailingInput {
                position,
            } => write!(f, "unexpected trailing input at {position}"),
        }
    }
}

impl std::error::Error for DslError {}

/// Resolves predicate calls to the domain predicate type `P`.
pub trait PredicateResolver<P> {
    /// Returns the predicate for `name(args...)`, or `None` if unknown.
    fn resolve(&self, name: &str, args: &[String]) -> Option<P>;
}

impl<P: Clone, S: BuildHasher> PredicateResolver<P> for HashMap<String, P, S> {
    fn resolve(&self, name: &str, args: &[String]) -> Option<P> {
        if args.is_empty() { self.get(name).cloned() } else { None }
    }
}

impl<P, F> PredicateResolver<P> for F
where
    F: Fn(&str, &[String]) -> Option<P>,
{
    fn resolve(&self, name: &str, args: &[String]) -> Option<P> {
        (self)(name, args)
    }
}

/// Parses a DSL expression into a condition validated with default limits.
///
/// # Errors
/// Returns [`DslError`] for syntax issues, unknown predicates, invalid numbers,
/// trailing input, or post-parse validation failures.
pub fn parse_condition<P, R>(input: &str, resolver: &R) -> Result<Condition<P>, DslError>
where
    R: PredicateResolver<P>,
{
    parse_condition_with(input, resolver, &ConditionValidator::default())
}

/// Parses a DSL expression and validates it with the given validator.
///
/// # Errors
/// Returns [`DslError`] for syntax issues, unknown predicates, invalid numbers,
/// trailing input, or post-parse validation failures.
pub fn parse_condition_with<P, R>(
    input: &str,
    resolver: &R,
    validator: &ConditionValidator,
) -> Result<Condition<P>, DslError>
where
    R: PredicateResolver<P>,
{
    if input.len() > MAX_DSL_INPUT_BYTES {
        return Err(DslError::InputTooLarge {
            max_bytes: MAX_DSL_INPUT_BYTES,
            actual_bytes: input.len(),
        });
    }
    let mut lexer = Lexer::new(input);
    let tokens = lexer.lex()?;

    let mut parser = Parser::new(tokens, resolver);
    let condition = parser.parse_expression()?;
    parser.expect_eof()?;

    validator.validate(&condition).map_err(|err| DslError::Validation(err.to_string()))?;
    Ok(condition)
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token produced from the DSL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Identifier token.
    Ident(&'a str),
    /// Numeric literal token.
    Number(&'a str),
    /// String literal body (escapes still encoded).
    Str(&'a str),
    /// Logical AND operator.
    And,
    /// Logical OR operator.
    Or,
    /// Logical NOT operator.
    Not,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// Comma separator.
    Comma,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone, Copy)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for the condition DSL.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, DslError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while self.offset < bytes.len() {
            let ch = bytes[self.offset];
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                }
                b'(' => {
                    tokens.push(self.simple(Token::LParen));
                    self.offset += 1;
                }
                b')' => {
                    tokens.push(self.simple(Token::RParen));
                    self.offset += 1;
                }
                b',' => {
                    tokens.push(self.simple(Token::Comma));
                    self.offset += 1;
                }
                b'!' => {
                    tokens.push(self.simple(Token::Not));
                    self.offset += 1;
                }
                b'&' => {
                    if bytes.get(self.offset + 1) == Some(&b'&') {
                        tokens.push(self.simple(Token::And));
                        self.offset += 2;
                    } else {
                        return Err(DslError::UnexpectedToken {
                            expected: "&&",
                            found: "&".to_string(),
                            position: self.offset,
                        });
                    }
                }
                b'|' => {
                    if bytes.get(self.offset + 1) == Some(&b'|') {
                        tokens.push(self.simple(Token::Or));
                        self.offset += 2;
                    } else {
                        return Err(DslError::UnexpectedToken {
                            expected: "||",
                            found: "|".to_string(),
                            position: self.offset,
                        });
                    }
                }
                b'"' => tokens.push(self.lex_string(bytes)?),
                b'0' ..= b'9' => {
                    let start = self.offset;
                    self.consume_while(bytes, |b| b.is_ascii_digit());
                    tokens.push(SpannedToken {
                        token: Token::Number(&self.input[start .. self.offset]),
                        position: start,
                    });
                }
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    let start = self.offset;
                    self.consume_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'_');
                    tokens.push(SpannedToken {
                        token: Self::keyword_or_ident(&self.input[start .. self.offset]),
                        position: start,
                    });
                }
                _ => {
                    let found = self.input[self.offset ..].chars().next().unwrap_or('?');
                    return Err(DslError::UnexpectedToken {
                        expected: "identifier, string, number, or operator",
                        found: found.to_string(),
                        position: self.offset,
                    });
                }
            }
        }

        if tokens.is_empty() {
            return Err(DslError::EmptyInput);
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Lexes a double-quoted string starting at the current offset.
    fn lex_string(&mut self, bytes: &[u8]) -> Result<SpannedToken<'a>, DslError> {
        let open = self.offset;
        self.offset += 1;
        let body_start = self.offset;
        while let Some(&b) = bytes.get(self.offset) {
            match b {
                b'\\' => self.offset += 2,
                b'"' => {
                    let body = &self.input[body_start .. self.offset];
                    self.offset += 1;
                    return Ok(SpannedToken {
                        token: Token::Str(body),
                        position: open,
                    });
                }
                _ => self.offset += 1,
            }
        }
        Err(DslError::UnterminatedString {
            position: open,
        })
    }

    /// Builds a token at the current offset.
    const fn simple(&self, token: Token<'a>) -> SpannedToken<'a> {
        SpannedToken {
            token,
            position: self.offset,
        }
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Maps a slice to a keyword token or identifier token.
    fn keyword_or_ident(slice: &'a str) -> Token<'a> {
        match slice {
            "and" => Token::And,
            "or" => Token::Or,
            _ => Token::Ident(slice),
        }
    }
}

/// Decodes `\"` and `\\` escapes in a string literal body.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser for the condition DSL.
struct Parser<'input, 'resolver, P, R> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'input>>,
    /// Current token index.
    index: usize,
    /// Predicate resolver for leaves.
    resolver: &'resolver R,
    /// Current nesting depth for bracketed or function expressions.
    nesting: usize,
    /// Marker for the predicate type.
    _marker: std::marker::PhantomData<P>,
}

impl<'input, 'resolver, P, R> Parser<'input, 'resolver, P, R>
where
    R: PredicateResolver<P>,
{
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'input>>, resolver: &'resolver R) -> Self {
        Self {
            tokens,
            index: 0,
            resolver,
            nesting: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Condition<P>, DslError> {
        self.parse_or()
    }

    /// Parses OR expressions.
    fn parse_or(&mut self) -> Result<Condition<P>, DslError> {
        let mut parts = vec![self.parse_and()?];
        while self.matches(Token::Or) {
            parts.push(self.parse_and()?);
        }
        if parts.len() == 1 { Ok(parts.remove(0)) } else { Ok(Condition::any(parts)) }
    }

    /// Parses AND expressions.
    fn parse_and(&mut self) -> Result<Condition<P>, DslError> {
        let mut parts = vec![self.parse_unary()?];
        while self.matches(Token::And) {
            parts.push(self.parse_unary()?);
        }
        if parts.len() == 1 { Ok(parts.remove(0)) } else { Ok(Condition::all(parts)) }
    }

    /// Parses unary expressions, including NOT.
    fn parse_unary(&mut self) -> Result<Condition<P>, DslError> {
        if self.matches(Token::Not) {
            let position = self.current().position;
            return self.with_nesting(position, |parser| {
                let inner = parser.parse_unary()?;
                Ok(Condition::negate(inner))
            });
        }
        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Condition<P>, DslError> {
        let SpannedToken {
            token,
            position,
        } = *self.current();
        match token {
            Token::Ident(name) => {
                self.advance();
                if self.matches(Token::LParen) {
                    self.parse_call(name, position)
                } else {
                    self.resolve_predicate(name, &[], position)
                }
            }
            Token::LParen => {
                self.advance();
                self.with_nesting(position, |parser| {
                    let expr = parser.parse_expression()?;
                    parser.expect(Token::RParen, "`)`")?;
                    Ok(expr)
                })
            }
            Token::Number(_)
            | Token::Str(_)
            | Token::RParen
            | Token::Comma
            | Token::And
            | Token::Or
            | Token::Not
            | Token::Eof => Err(DslError::UnexpectedToken {
                expected: "predicate or expression",
                found: self.describe_current(),
                position,
            }),
        }
    }

    /// Parses a call: either a combinator or a predicate with arguments.
    fn parse_call(&mut self, name: &'input str, name_pos: usize) -> Result<Condition<P>, DslError> {
        self.with_nesting(name_pos, |parser| match name {
            "at_least" => parser.parse_group(),
            "all" => Ok(Condition::all(parser.parse_argument_list()?)),
            "any" => Ok(Condition::any(parser.parse_argument_list()?)),
            "not" => {
                let mut args = parser.parse_argument_list()?;
                if args.len() != 1 {
                    return Err(DslError::UnexpectedToken {
                        expected: "exactly one argument to `not(...)`",
                        found: format!("{} arguments", args.len()),
                        position: name_pos,
                    });
                }
                Ok(Condition::negate(args.remove(0)))
            }
            _ => {
                let args = parser.parse_literal_arguments()?;
                parser.resolve_predicate(name, &args, name_pos)
            }
        })
    }

    /// Parses `at_least(n, ...)` after the opening parenthesis.
    fn parse_group(&mut self) -> Result<Condition<P>, DslError> {
        let (min, min_pos) = self.parse_number_literal()?;
        if !self.matches(Token::Comma) {
            return Err(DslError::UnexpectedToken {
                expected: "`,` and at least one condition after the count",
                found: self.describe_current(),
                position: min_pos,
            });
        }
        let members = self.parse_argument_list()?;
        Ok(Condition::at_least(min, members))
    }

    /// Parses a numeric literal for group counts.
    fn parse_number_literal(&mut self) -> Result<(u8, usize), DslError> {
        let SpannedToken {
            token,
            position,
        } = *self.current();
        match token {
            Token::Number(raw) => {
                self.advance();
                let value: u8 = raw.parse().map_err(|_| DslError::InvalidNumber {
                    raw: raw.to_string(),
                    position,
                })?;
                Ok((value, position))
            }
            _ => Err(DslError::UnexpectedToken {
                expected: "numeric literal",
                found: self.describe_current(),
                position,
            }),
        }
    }

    /// Parses a comma-separated list of sub-expressions up to `)`.
    fn parse_argument_list(&mut self) -> Result<Vec<Condition<P>>, DslError> {
        let mut args = Vec::new();
        if self.matches(Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.matches(Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, "`)` after arguments")?;
            break;
        }
        Ok(args)
    }

    /// Parses string or number literal arguments of a predicate call up to `)`.
    fn parse_literal_arguments(&mut self) -> Result<Vec<String>, DslError> {
        let mut args = Vec::new();
        if self.matches(Token::RParen) {
            return Ok(args);
        }
        loop {
            let SpannedToken {
                token,
                position,
            } = *self.current();
            match token {
                Token::Str(raw) => args.push(unescape(raw)),
                Token::Number(raw) => args.push(raw.to_string()),
                _ => {
                    return Err(DslError::UnexpectedToken {
                        expected: "string literal argument",
                        found: self.describe_current(),
                        position,
                    });
                }
            }
            self.advance();
            if self.matches(Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, "`)` after arguments")?;
            break;
        }
        Ok(args)
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, DslError>,
    ) -> Result<T, DslError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_DSL_NESTING {
            return Err(DslError::NestingTooDeep {
                max_depth: MAX_DSL_NESTING,
                actual_depth: next_depth,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Resolves a predicate call using the resolver.
    fn resolve_predicate(
        &self,
        name: &str,
        args: &[String],
        position: usize,
    ) -> Result<Condition<P>, DslError> {
        self.resolver.resolve(name, args).map(Condition::predicate).ok_or_else(|| {
            DslError::UnknownPredicate {
                name: name.to_string(),
                arity: args.len(),
                position,
            }
        })
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: Token<'_>, expected: &'static str) -> Result<(), DslError> {
        if self.matches(token) {
            Ok(())
        } else {
            Err(DslError::UnexpectedToken {
                expected,
                found: self.describe_current(),
                position: self.current().position,
            })
        }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), DslError> {
        if matches!(self.current().token, Token::Eof) {
            Ok(())
        } else {
            Err(DslError::TrailingInput {
                position: self.current().position,
            })
        }
    }

    /// Consumes the token if it matches the expected kind.
    fn matches(&mut self, kind: Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token; the stream always ends with `Eof`.
    fn current(&self) -> &SpannedToken<'input> {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    /// Advances to the next token, stopping at `Eof`.
    fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match &self.current().token {
            Token::Ident(name) => (*name).to_string(),
            Token::Number(raw) => (*raw).to_string(),
            Token::Str(raw) => format!("\"{raw}\""),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Not => "!".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
