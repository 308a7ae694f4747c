use crate::error::DiceParsingError;
use crate::help::{HELP_MESSAGE, INVALID_MESSAGE};
use crate::parser::{parse_input, Input};
use crate::roll::{Report, Roll, Roller};
use log::{debug, info};

/// Result of a formula that made it through the grammar.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Evaluation {
    Help,
    Report(Report),
}

/// Parse and validate the formula, then roll it. Nothing is rolled
/// unless the repeat count and every subcommand are valid.
pub fn roll_formula<R: Roller + ?Sized>(
    formula: &str,
    roller: &mut R,
) -> Result<Evaluation, DiceParsingError> {
    match parse_input(formula)? {
        Input::Help => Ok(Evaluation::Help),
        Input::Formula { text, formula } => {
            let passes = formula.roll(roller);
            Ok(Evaluation::Report(Report::new(text, passes)))
        }
    }
}

/// Evaluate a formula with the given roller and produce the text to
/// show the user. Never fails: bad input yields the invalid-command
/// message.
pub fn evaluate_with<R: Roller + ?Sized>(formula: &str, roller: &mut R) -> String {
    match roll_formula(formula, roller) {
        Ok(Evaluation::Help) => HELP_MESSAGE.to_owned(),
        Ok(Evaluation::Report(report)) => {
            let report = report.to_string();
            info!("{}", report);
            report
        }
        Err(e) => {
            debug!("Rejected formula {:?}: {}", formula, e);
            INVALID_MESSAGE.to_owned()
        }
    }
}

/// Evaluate a formula using the thread-local random number generator.
pub fn evaluate(formula: &str) -> String {
    evaluate_with(formula, &mut rand::thread_rng())
}
