// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record tokenizer using nom combinators
//!
//! Parses `#id=TYPE(args);` records and header records into tokens.

use ifc_step_model::encoding::decode_string;
use ifc_step_model::{AttributeValue, EntityId, Result, StepError};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from a STEP record (before conversion to AttributeValue)
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String value ('text'), still escaped
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Real value
    Real(f64),
    /// Enumeration or logical (.VALUE.)
    Enum(&'a str),
    /// Binary value ("0FF")
    Binary(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl Token<'_> {
    /// Convert token to an owned AttributeValue, decoding string escapes
    pub fn to_attribute_value(&self) -> Result<AttributeValue> {
        Ok(match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(decode_string(s)?),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Real(f) => AttributeValue::Real(*f),
            Token::Enum(s) => AttributeValue::Enum((*s).to_string()),
            Token::Binary(s) => AttributeValue::Binary((*s).to_string()),
            Token::List(items) => AttributeValue::List(
                items
                    .iter()
                    .map(|t| t.to_attribute_value())
                    .collect::<Result<_>>()?,
            ),
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                name.to_ascii_uppercase(),
                args.iter()
                    .map(|t| t.to_attribute_value())
                    .collect::<Result<_>>()?,
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        })
    }
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Skip a /* ... */ comment
fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
}

/// Parse whitespace (including comments)
fn ws(input: &str) -> IResult<&str, ()> {
    let (mut input, _) = multispace0(input)?;
    while let Ok((rest, _)) = comment(input) {
        let (rest, _) = multispace0(rest)?;
        input = rest;
    }
    Ok((input, ()))
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('#')(input)?;
    let (input, id) = map_res(take_while1(|c: char| c.is_ascii_digit()), |digits: &str| {
        digits.parse::<u32>()
    })
    .parse(input)?;
    Ok((input, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('\'')(input)?;

    // Find the end of the string, handling escaped quotes ('')
    let bytes = input.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if end + 1 < bytes.len() && bytes[end + 1] == b'\'' {
                end += 2;
                continue;
            }
            return Ok((&input[end + 1..], Token::String(&input[..end])));
        }
        end += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a binary value ("0FF")
fn binary(input: &str) -> IResult<&str, Token<'_>> {
    let (input, bits) = delimited(
        char('"'),
        take_while(|c: char| c.is_ascii_hexdigit()),
        char('"'),
    )
    .parse(input)?;
    Ok((input, Token::Binary(bits)))
}

/// Parse a number (integer or real)
fn number(input: &str) -> IResult<&str, Token<'_>> {
    let (input, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let digits = num_str.strip_prefix('+').unwrap_or(num_str);
    let failure = || nom::Err::Error(nom::error::Error::new(num_str, nom::error::ErrorKind::Float));

    // lexical-core for fast parsing
    if digits.contains(['.', 'e', 'E']) {
        let f: f64 = lexical_core::parse(digits.as_bytes()).map_err(|_| failure())?;
        Ok((input, Token::Real(f)))
    } else {
        let i: i64 = lexical_core::parse(digits.as_bytes()).map_err(|_| failure())?;
        Ok((input, Token::Integer(i)))
    }
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, Token::Enum(name)))
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parse a parenthesized, comma separated token list
fn token_list(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token<'_>> {
    let (input, items) = token_list(input)?;
    Ok((input, Token::List(items)))
}

/// Parse a keyword (type name)
fn keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = token_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        binary,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

// ============================================================================
// Record Parsing
// ============================================================================

/// Tokens of one `#id=TYPE(args);` record
#[derive(Clone, Debug, PartialEq)]
pub struct RecordTokens<'a> {
    pub id: EntityId,
    pub type_name: &'a str,
    pub arguments: Vec<Token<'a>>,
}

impl RecordTokens<'_> {
    /// Convert every argument token into an attribute value
    pub fn argument_values(&self) -> Result<Vec<AttributeValue>> {
        self.arguments
            .iter()
            .map(|t| {
                t.to_attribute_value()
                    .map_err(|e| StepError::entity_parse(self.id, e.to_string()))
            })
            .collect()
    }
}

/// Parse a complete entity record
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<RecordTokens<'_>> {
    let (input, _) = ws(input).map_err(|_| StepError::format("Invalid leading comment"))?;

    let (input, id) = entity_ref(input)
        .map(|(rest, token)| match token {
            Token::EntityRef(id) => (rest, EntityId(id)),
            _ => (rest, EntityId::UNASSIGNED),
        })
        .map_err(|_| StepError::format("Expected #id at start of entity"))?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            StepError::entity_parse(id, "Expected = after entity id")
        })?;

    if input.starts_with('(') {
        return Err(StepError::entity_parse(
            id,
            "Complex entity instances are not supported",
        ));
    }

    let (input, type_name) =
        keyword(input).map_err(|_| StepError::entity_parse(id, "Expected type name"))?;
    let (input, _) = ws(input).map_err(|_| StepError::entity_parse(id, "Invalid comment"))?;

    let (input, arguments) = token_list(input).map_err(|e| {
        StepError::entity_parse(id, format!("Failed to parse attributes: {}", describe(&e)))
    })?;

    let (input, _) = ws(input).map_err(|_| StepError::entity_parse(id, "Invalid comment"))?;
    if !(input.is_empty() || input.starts_with(';')) {
        return Err(StepError::entity_parse(
            id,
            format!("Unexpected content after attributes: {}", preview(input)),
        ));
    }

    Ok(RecordTokens {
        id,
        type_name,
        arguments,
    })
}

/// Parse a header record like `FILE_NAME('a.ifc',...)`, returning name and arguments
pub fn parse_header_record(input: &str) -> Result<(&str, Vec<Token<'_>>)> {
    let (input, _) = ws(input).map_err(|_| StepError::InvalidHeader("invalid comment".into()))?;
    let (input, name) = keyword(input)
        .map_err(|_| StepError::InvalidHeader(format!("expected keyword at {}", preview(input))))?;
    let (input, _) = ws(input).map_err(|_| StepError::InvalidHeader("invalid comment".into()))?;
    let (_, arguments) = token_list(input).map_err(|e| {
        StepError::InvalidHeader(format!("{}: failed to parse arguments: {}", name, describe(&e)))
    })?;
    Ok((name, arguments))
}

fn describe(err: &nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            format!("{:?} at {}", e.code, preview(e.input))
        }
    }
}

fn preview(input: &str) -> String {
    input.chars().take(24).collect()
}
