//! Advisory check of the model's slot list.
//!
//! The answer is always displayed as returned. This only tells the caller
//! whether it followed the requested `NN, NN, ...` / `NONE` format.

use crate::prompts::ALL_FILLED_MARKER;
use thiserror::Error;

pub const SLOT_COUNT: u8 = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotList {
    AllFilled,
    Empty(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotFormatError {
    #[error("answer is blank")]
    Blank,
    #[error("'{0}' is not a slot number")]
    NotANumber(String),
    #[error("slot {0} is outside 01-48")]
    OutOfRange(u32),
    #[error("slot {0:02} is listed more than once")]
    Duplicate(u8),
}

pub fn parse_empty_slots(text: &str) -> Result<SlotList, SlotFormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SlotFormatError::Blank);
    }
    if text.eq_ignore_ascii_case(ALL_FILLED_MARKER) {
        return Ok(SlotList::AllFilled);
    }

    let mut slots = Vec::new();
    for token in text.split(',').map(str::trim) {
        let number: u32 = token
            .parse()
            .map_err(|_| SlotFormatError::NotANumber(token.to_string()))?;
        if number == 0 || number > u32::from(SLOT_COUNT) {
            return Err(SlotFormatError::OutOfRange(number));
        }
        let slot = number as u8;
        if slots.contains(&slot) {
            return Err(SlotFormatError::Duplicate(slot));
        }
        slots.push(slot);
    }

    Ok(SlotList::Empty(slots))
}
