/**
 * In addition to the terms of the AGPL, this file is governed by the
 * terms of the MIT license, from the original axfive-matrix-dicebot
 * project.
 */
use crate::dice::{self, Keep};
use itertools::Itertools;
use rand::Rng;
use std::fmt;
use std::ops::{Deref, Range};

/// Source of individual die faces.
pub trait Roller {
    /// A uniform value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> Roller for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

pub trait Roll {
    type Output;

    fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> Self::Output;
}

pub trait Rolled {
    fn rolled_value(&self) -> i64;
}

/// Index range of the dice that count toward the total, given the
/// rolls are sorted ascending. The keep count is clamped to the number
/// of dice rolled.
fn kept_range(keep: Option<Keep>, len: usize) -> Range<usize> {
    match keep {
        Some(Keep::Highest(n)) => len - (n as usize).min(len)..len,
        Some(Keep::Lowest(n)) => 0..(n as usize).min(len),
        None => 0..len,
    }
}

/// The dice that were rolled, their results in ascending order, and
/// which of them are kept.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DiceRoll {
    dice: dice::Dice,
    rolls: Vec<u32>,
    kept: Range<usize>,
}

impl DiceRoll {
    /// Sorts the rolls and works out the kept range for the dice's
    /// keep modifier.
    pub fn new(dice: dice::Dice, mut rolls: Vec<u32>) -> DiceRoll {
        rolls.sort_unstable();
        let kept = kept_range(dice.keep(), rolls.len());
        DiceRoll { dice, rolls, kept }
    }

    pub fn dice(&self) -> &dice::Dice {
        &self.dice
    }

    /// All rolls, ascending.
    pub fn rolls(&self) -> &[u32] {
        &self.rolls
    }

    pub fn kept(&self) -> &[u32] {
        &self.rolls[self.kept.clone()]
    }

    // only count kept dice in total
    pub fn total(&self) -> u32 {
        self.kept().iter().sum()
    }
}

impl Rolled for DiceRoll {
    fn rolled_value(&self) -> i64 {
        i64::from(self.total())
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.dice, self.rolls.iter().join(","))
    }
}

impl Roll for dice::Dice {
    type Output = DiceRoll;

    fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> DiceRoll {
        let rolls = (0..self.count)
            .map(|_| roller.roll_die(self.sides))
            .collect();

        DiceRoll::new(*self, rolls)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ElementRoll {
    Dice(DiceRoll),
    Flat(u32),
}

impl ElementRoll {
    /// The dice trace of this element. Flat numbers have none.
    pub fn trace(&self) -> Option<String> {
        match self {
            ElementRoll::Dice(d) => Some(d.to_string()),
            ElementRoll::Flat(_) => None,
        }
    }
}

impl Rolled for ElementRoll {
    fn rolled_value(&self) -> i64 {
        match self {
            ElementRoll::Dice(d) => d.rolled_value(),
            ElementRoll::Flat(n) => i64::from(*n),
        }
    }
}

impl Roll for dice::Element {
    type Output = ElementRoll;

    fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> ElementRoll {
        match self {
            dice::Element::Dice(d) => ElementRoll::Dice(d.roll(roller)),
            dice::Element::Flat(n) => ElementRoll::Flat(*n),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SubcommandRoll {
    Positive(ElementRoll),
    Negative(ElementRoll),
}

impl SubcommandRoll {
    pub fn element(&self) -> &ElementRoll {
        match self {
            SubcommandRoll::Positive(e) | SubcommandRoll::Negative(e) => e,
        }
    }
}

impl Rolled for SubcommandRoll {
    fn rolled_value(&self) -> i64 {
        match self {
            SubcommandRoll::Positive(e) => e.rolled_value(),
            SubcommandRoll::Negative(e) => -e.rolled_value(),
        }
    }
}

impl Roll for dice::Subcommand {
    type Output = SubcommandRoll;

    fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> SubcommandRoll {
        match self {
            dice::Subcommand::Positive(e) => SubcommandRoll::Positive(e.roll(roller)),
            dice::Subcommand::Negative(e) => SubcommandRoll::Negative(e.roll(roller)),
        }
    }
}

/// One evaluation of every subcommand of a formula, in order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PassRoll(Vec<SubcommandRoll>);

impl PassRoll {
    pub fn new(rolls: Vec<SubcommandRoll>) -> PassRoll {
        PassRoll(rolls)
    }
}

impl Deref for PassRoll {
    type Target = Vec<SubcommandRoll>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Rolled for PassRoll {
    fn rolled_value(&self) -> i64 {
        self.iter().map(Rolled::rolled_value).sum()
    }
}

impl fmt::Display for PassRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let traces = self.iter().filter_map(|roll| roll.element().trace()).join("; ");

        if traces.is_empty() {
            write!(f, "[{}]", self.rolled_value())
        } else {
            write!(f, "[{} {}]", self.rolled_value(), traces)
        }
    }
}

impl Roll for dice::Formula {
    type Output = Vec<PassRoll>;

    /// Every pass rolls fresh dice for every subcommand.
    fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> Vec<PassRoll> {
        (0..self.repeat())
            .map(|_| PassRoll::new(self.iter().map(|sub| sub.roll(roller)).collect()))
            .collect()
    }
}

/// The final answer for a formula: the formula text followed by one
/// bracketed group per pass.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Report {
    text: String,
    passes: Vec<PassRoll>,
}

impl Report {
    pub fn new(text: String, passes: Vec<PassRoll>) -> Report {
        Report { text, passes }
    }

    pub fn passes(&self) -> &[PassRoll] {
        &self.passes
    }

    /// Signed total of each pass, in order.
    pub fn totals(&self) -> Vec<i64> {
        self.passes.iter().map(Rolled::rolled_value).collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.text, self.passes.iter().join(" "))
    }
}

#[cfg(test)]
pub(crate) use fixed::FixedRoller;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{Dice, Element, Formula, Subcommand};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dice_roll(count: u32, sides: u32, keep: Option<Keep>, rolls: &[u32]) -> DiceRoll {
        DiceRoll::new(Dice::new(count, sides, keep), rolls.to_vec())
    }

    #[test]
    fn dice_roll_sorts_rolls_test() {
        let roll = dice_roll(3, 6, None, &[5, 2, 4]);
        assert_eq!(&[2, 4, 5], roll.rolls());
        assert_eq!(11, roll.total());
    }

    #[test]
    fn keep_highest_test() {
        let roll = dice_roll(3, 6, Some(Keep::Highest(2)), &[5, 2, 4]);
        assert_eq!(&[4, 5], roll.kept());
        assert_eq!(9, roll.total());
        assert_eq!("3d6h2=2,4,5", roll.to_string());
    }

    #[test]
    fn keep_lowest_test() {
        let roll = dice_roll(4, 10, Some(Keep::Lowest(1)), &[7, 3, 9, 3]);
        assert_eq!(&[3], roll.kept());
        assert_eq!(3, roll.total());
        assert_eq!("4d10l1=3,3,7,9", roll.to_string());
    }

    #[test]
    fn keep_more_than_rolled_keeps_everything_test() {
        let highest = dice_roll(2, 6, Some(Keep::Highest(5)), &[1, 6]);
        let lowest = dice_roll(2, 6, Some(Keep::Lowest(99)), &[1, 6]);
        assert_eq!(7, highest.total());
        assert_eq!(7, lowest.total());
    }

    #[test]
    fn single_sided_die_test() {
        let mut rng = StdRng::seed_from_u64(7);
        let roll = Dice::new(1, 1, None).roll(&mut rng);
        assert_eq!(&[1], roll.rolls());
        assert_eq!("1d1=1", roll.to_string());
    }

    #[test]
    fn sign_applies_to_kept_total_test() {
        let mut roller = FixedRoller::new(&[6, 1, 3]);
        let sub = Subcommand::Negative(Element::Dice(Dice::new(3, 6, Some(Keep::Highest(2)))));
        let roll = sub.roll(&mut roller);
        assert_eq!(-9, roll.rolled_value());
    }

    #[test]
    fn flat_has_no_trace_test() {
        assert_eq!(None, ElementRoll::Flat(5).trace());
        assert_eq!(-5, SubcommandRoll::Negative(ElementRoll::Flat(5)).rolled_value());
    }

    #[test]
    fn pass_display_test() {
        let pass = PassRoll::new(vec![
            SubcommandRoll::Positive(ElementRoll::Dice(dice_roll(3, 6, None, &[1, 3, 4]))),
            SubcommandRoll::Negative(ElementRoll::Dice(dice_roll(2, 4, None, &[2, 1]))),
            SubcommandRoll::Positive(ElementRoll::Flat(4)),
            SubcommandRoll::Negative(ElementRoll::Flat(7)),
        ]);

        assert_eq!(2, pass.rolled_value());
        assert_eq!("[2 3d6=1,3,4; 2d4=1,2]", pass.to_string());
    }

    #[test]
    fn flat_only_pass_display_test() {
        let pass = PassRoll::new(vec![SubcommandRoll::Negative(ElementRoll::Flat(5))]);
        assert_eq!("[-5]", pass.to_string());
    }

    #[test]
    fn formula_rolls_fresh_dice_each_pass_test() {
        let formula = Formula::new(
            2,
            vec![Subcommand::Positive(Element::Dice(Dice::new(2, 6, None)))],
        );
        let mut roller = FixedRoller::new(&[1, 2, 5, 6]);
        let passes = formula.roll(&mut roller);

        assert_eq!(0, roller.remaining());
        assert_eq!(2, passes.len());
        assert_eq!("[3 2d6=1,2]", passes[0].to_string());
        assert_eq!("[11 2d6=5,6]", passes[1].to_string());
    }

    #[test]
    fn report_display_test() {
        let passes = vec![
            PassRoll::new(vec![SubcommandRoll::Positive(ElementRoll::Dice(dice_roll(
                1,
                1,
                None,
                &[1],
            )))]),
            PassRoll::new(vec![SubcommandRoll::Positive(ElementRoll::Dice(dice_roll(
                1,
                1,
                None,
                &[1],
            )))]),
        ];

        let report = Report::new("2#1d1".to_owned(), passes);
        assert_eq!(vec![1, 1], report.totals());
        assert_eq!("2#1d1: [1 1d1=1] [1 1d1=1]", report.to_string());
    }

    proptest! {
        #[test]
        fn rolls_stay_in_range(count in 1..=99u32, sides in 1..=9999u32, seed: u64) {
            let mut rng = StdRng::seed_from_u64(seed);
            let roll = Dice::new(count, sides, None).roll(&mut rng);

            prop_assert_eq!(roll.rolls().len(), count as usize);
            for &face in roll.rolls() {
                prop_assert!(face >= 1 && face <= sides);
            }
        }

        #[test]
        fn keep_highest_takes_largest_regardless_of_order(
            mut faces in prop::collection::vec(1..=20u32, 1..20),
            n in 1..=25u32
        ) {
            let count = faces.len() as u32;
            let forward = DiceRoll::new(Dice::new(count, 20, Some(Keep::Highest(n))), faces.clone());
            faces.reverse();
            let backward = DiceRoll::new(Dice::new(count, 20, Some(Keep::Highest(n))), faces.clone());

            faces.sort_unstable_by(|a, b| b.cmp(a));
            let expected: u32 = faces.iter().take(n as usize).sum();

            prop_assert_eq!(forward.total(), expected);
            prop_assert_eq!(backward.total(), expected);
        }

        #[test]
        fn clamped_keep_equals_plain_sum(
            faces in prop::collection::vec(1..=12u32, 1..=10),
            extra in 0..=89u32,
            highest: bool
        ) {
            let count = faces.len() as u32;
            let n = count + extra;
            let keep = if highest { Keep::Highest(n) } else { Keep::Lowest(n) };
            let kept = DiceRoll::new(Dice::new(count, 12, Some(keep)), faces.clone());
            let plain = DiceRoll::new(Dice::new(count, 12, None), faces.clone());

            prop_assert_eq!(kept.total(), plain.total());
            prop_assert_eq!(kept.total(), faces.iter().sum::<u32>());
        }
    }
}
