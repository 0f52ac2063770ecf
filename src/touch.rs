//! Finger position data

use crate::registers::MAX_FINGERS;

/// Assemble a 16 bit register pair from its low and high bytes
pub fn u16_from_halves(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}

/// Split a 16 bit value into `(low, high)` bytes
pub fn u16_into_halves(value: u16) -> (u8, u8) {
    let [low, high] = value.to_le_bytes();
    (low, high)
}

/// Data for a single finger slot
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FingerRecord {
    /// Movement since the previous cycle; only reported for slot 0
    pub rel_x: i16,
    pub rel_y: i16,
    pub abs_x: u16,
    pub abs_y: u16,
    pub strength: u16,
    pub area: u8,
}

/// Touch data for one read cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TouchSample {
    /// Number of fingers the device reports as touching
    pub num_fingers: u8,
    /// Only slot 0 is populated by the read cycle
    pub fingers: [FingerRecord; MAX_FINGERS],
}

impl TouchSample {
    pub fn primary(&self) -> &FingerRecord {
        &self.fingers[0]
    }
}
