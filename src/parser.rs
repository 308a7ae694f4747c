/**
 * In addition to the terms of the AGPL, this file is governed by the
 * terms of the MIT license, from the original axfive-matrix-dicebot
 * project.
 */
use crate::dice::{Dice, Element, Formula, Keep, Subcommand};
use crate::error::DiceParsingError;
use crate::help::HELP_TRIGGER;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::one_of,
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};
use std::borrow::Cow;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Sign {
    Plus,
    Minus,
}

/// What the caller asked for, after normalization and validation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Input {
    Help,

    /// A formula that passed the grammar. `text` is the
    /// whitespace-stripped input, used to head the report.
    Formula { text: String, formula: Formula },
}

//******************************
// Normalizer and tokenizer
//******************************

/// Remove every whitespace character, wherever it appears.
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split off the repeat count before the first '#'. Without a '#' the
/// repeat count is "1" and the whole input is the command.
pub fn split_repeat(formula: &str) -> (&str, &str) {
    match formula.find('#') {
        Some(index) => (&formula[..index], &formula[index + 1..]),
        None => ("1", formula),
    }
}

/// The first term is positive unless it says otherwise.
pub fn normalize_sign(command: &str) -> Cow<'_, str> {
    if command.starts_with(|c: char| c == '+' || c == '-') {
        Cow::Borrowed(command)
    } else {
        Cow::Owned(format!("+{}", command))
    }
}

/// Split a signed command right before every '+' or '-' other than
/// the first character. Every piece keeps its sign, so a dangling sign
/// survives as its own (invalid) piece instead of vanishing.
pub fn split_subcommands(command: &str) -> Vec<&str> {
    let mut subcommands = Vec::new();
    let mut start = 0;

    for (index, c) in command.char_indices().skip(1) {
        if c == '+' || c == '-' {
            subcommands.push(&command[start..index]);
            start = index;
        }
    }

    if !command.is_empty() {
        subcommands.push(&command[start..]);
    }

    subcommands
}

//******************************
// Grammar
//******************************

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Parse a number of at most `max_digits` digits with no leading zero.
fn parse_bounded(input: &str, max_digits: usize) -> IResult<&str, u32> {
    map_res(
        recognize(pair(
            one_of("123456789"),
            take_while_m_n(0, max_digits - 1, is_digit),
        )),
        |digits: &str| digits.parse::<u32>(),
    )(input)
}

/// 1 to 99.
fn parse_two_digits(input: &str) -> IResult<&str, u32> {
    parse_bounded(input, 2)
}

/// 1 to 9999.
fn parse_four_digits(input: &str) -> IResult<&str, u32> {
    parse_bounded(input, 4)
}

fn parse_sign(input: &str) -> IResult<&str, Sign> {
    alt((
        map(tag("+"), |_| Sign::Plus),
        map(tag("-"), |_| Sign::Minus),
    ))(input)
}

/// Parse a keep modifier: 'h' or 'l' followed by a count.
fn parse_keep(input: &str) -> IResult<&str, Keep> {
    let (input, kind) = one_of("hl")(input)?;
    let (input, count) = parse_two_digits(input)?;

    let keep = match kind {
        'h' => Keep::Highest(count),
        _ => Keep::Lowest(count),
    };

    Ok((input, keep))
}

/// Parse a dice expression such as 3d6 or 3d6h2. Does not accept a sign.
fn parse_dice(input: &str) -> IResult<&str, Dice> {
    let (input, (count, _, sides, keep)) =
        tuple((parse_two_digits, tag("d"), parse_four_digits, opt(parse_keep)))(input)?;

    Ok((input, Dice::new(count, sides, keep)))
}

fn parse_element(input: &str) -> IResult<&str, Element> {
    alt((
        map(parse_dice, Element::Dice),
        map(parse_four_digits, Element::Flat),
    ))(input)
}

fn parse_subcommand(input: &str) -> IResult<&str, Subcommand> {
    let (input, sign) = parse_sign(input)?;
    let (input, element) = parse_element(input)?;

    let subcommand = match sign {
        Sign::Plus => Subcommand::Positive(element),
        Sign::Minus => Subcommand::Negative(element),
    };

    Ok((input, subcommand))
}

//******************************
// Validator
//******************************

/// The repeat count must be the whole text: 1 to 99, no leading zero.
pub fn validate_repeat(text: &str) -> Result<u32, DiceParsingError> {
    all_consuming(parse_two_digits)(text)
        .map(|(_, repeat)| repeat)
        .map_err(|_| DiceParsingError::InvalidRepeat(text.to_owned()))
}

/// A subcommand must be exactly one signed flat number or dice term.
pub fn validate_subcommand(text: &str) -> Result<Subcommand, DiceParsingError> {
    all_consuming(parse_subcommand)(text)
        .map(|(_, subcommand)| subcommand)
        .map_err(|_| DiceParsingError::InvalidSubcommand(text.to_owned()))
}

/// Build a formula from whitespace-free text. The repeat count and
/// every subcommand are validated before the formula exists.
pub fn parse_formula(text: &str) -> Result<Formula, DiceParsingError> {
    let (repeat, command) = split_repeat(text);
    let command = normalize_sign(command);

    let repeat = validate_repeat(repeat)?;
    let subcommands = split_subcommands(&command)
        .into_iter()
        .map(validate_subcommand)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Formula::new(repeat, subcommands))
}

/// Normalize raw caller input and classify it as a help request or a
/// validated formula.
pub fn parse_input(raw: &str) -> Result<Input, DiceParsingError> {
    let text = strip_whitespace(raw);

    if text == HELP_TRIGGER {
        return Ok(Input::Help);
    }

    let formula = parse_formula(&text)?;
    Ok(Input::Formula { text, formula })
}
