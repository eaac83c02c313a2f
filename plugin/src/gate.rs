//! Decides whether a reply gets voiced.

use std::fmt;

/// Why a reply was not voiced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Probability is 0.
    Disabled,
    /// No text-bearing component, or only whitespace.
    NoText,
    TooLong { len: usize, max: usize },
    /// Lost the roll.
    NotSelected { roll: u32, probability: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "disabled"),
            SkipReason::NoText => write!(f, "no text"),
            SkipReason::TooLong { len, max } => write!(f, "too long ({len} > {max})"),
            SkipReason::NotSelected { roll, probability } => {
                write!(f, "not selected (roll {roll} > {probability})")
            }
        }
    }
}

/// Outcome of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Voice this trimmed text.
    Speak(String),
    Skip(SkipReason),
}

/// Applies the gates in order: disabled, empty, length, roll.
///
/// `roll` yields a value in 1..=100 and is only consulted when every
/// deterministic gate has passed and `probability` is below 100.
pub fn decide(
    text: Option<&str>,
    probability: u32,
    max_length: usize,
    roll: impl FnOnce() -> u32,
) -> Gate {
    if probability == 0 {
        return Gate::Skip(SkipReason::Disabled);
    }

    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Gate::Skip(SkipReason::NoText),
    };

    let len = text.chars().count();
    if len > max_length {
        return Gate::Skip(SkipReason::TooLong {
            len,
            max: max_length,
        });
    }

    if probability < 100 {
        let roll = roll();
        if roll > probability {
            return Gate::Skip(SkipReason::NotSelected { roll, probability });
        }
    }

    Gate::Speak(text.to_string())
}
