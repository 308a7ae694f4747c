/**
 * In addition to the terms of the AGPL, this file is governed by the
 * terms of the MIT license, from the original axfive-matrix-dicebot
 * project.
 */
use std::fmt;
use std::ops::Deref;

/// Which end of the sorted rolls survives a keep modifier, and how
/// many dice to keep from it. The count is clamped to the number of
/// dice actually rolled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keep {
    /// Keep the N largest dice.
    Highest(u32),

    /// Keep the N smallest dice.
    Lowest(u32),
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keep::Highest(n) => write!(f, "h{}", n),
            Keep::Lowest(n) => write!(f, "l{}", n),
        }
    }
}

/// A dice roll in XdY notation, like "3d6", with an optional keep
/// modifier ("3d6h2", "4d10l1").
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Dice {
    pub(crate) count: u32,
    pub(crate) sides: u32,
    pub(crate) keep: Option<Keep>,
}

impl Dice {
    pub fn new(count: u32, sides: u32, keep: Option<Keep>) -> Dice {
        Dice { count, sides, keep }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn keep(&self) -> Option<Keep> {
        self.keep
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if let Some(keep) = self.keep {
            write!(f, "{}", keep)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Element {
    Dice(Dice),
    Flat(u32),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Dice(d) => write!(f, "{}", d),
            Element::Flat(n) => write!(f, "{}", n),
        }
    }
}

/// One signed term of a formula. The sign applies to the element's
/// aggregated value, never to individual dice.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Subcommand {
    Positive(Element),
    Negative(Element),
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subcommand::Positive(e) => write!(f, "+{}", e),
            Subcommand::Negative(e) => write!(f, "-{}", e),
        }
    }
}

/// A fully validated formula: how many passes to run, and the ordered
/// subcommands evaluated in each pass.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Formula {
    repeat: u32,
    subcommands: Vec<Subcommand>,
}

impl Formula {
    pub(crate) fn new(repeat: u32, subcommands: Vec<Subcommand>) -> Formula {
        Formula {
            repeat,
            subcommands,
        }
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }
}

impl Deref for Formula {
    type Target = Vec<Subcommand>;

    fn deref(&self) -> &Self::Target {
        &self.subcommands
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeat != 1 {
            write!(f, "{}#", self.repeat)?;
        }

        for subcommand in &self.subcommands {
            write!(f, "{}", subcommand)?;
        }

        Ok(())
    }
}
