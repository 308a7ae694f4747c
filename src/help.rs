use indoc::indoc;

/// Input that asks for usage instead of a roll, once whitespace is
/// removed.
pub const HELP_TRIGGER: &str = "help";

pub const HELP_MESSAGE: &str = indoc! {"
    here is some help:
    !3d6 -> roll three six-sided die
    !3d6h2 -> roll three six-sided die and keep the two highest
    !3d6l2 -> roll three six-sided die and keep the two lowest
    !2#3d6 -> roll three six-sided die two times"};

/// Answer for anything that does not match the dice grammar.
pub const INVALID_MESSAGE: &str = "this command is invalid";
