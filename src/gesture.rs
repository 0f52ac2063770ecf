//! Gesture flag decoding

use bondrewd::Bitfields;

use crate::Error;

/// Contents of the single finger gesture register (`GESTURE_ADDR0`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Bitfields)]
#[bondrewd(default_endianness = "le")]
pub struct SingleFingerGestures {
    #[bondrewd(bit_length = 2)]
    padding0: u8,
    #[bondrewd(bit_length = 1)]
    pub swipe_pos_y: bool,
    #[bondrewd(bit_length = 1)]
    pub swipe_neg_y: bool,
    #[bondrewd(bit_length = 1)]
    pub swipe_pos_x: bool,
    #[bondrewd(bit_length = 1)]
    pub swipe_neg_x: bool,
    /// May be raised together with any other flag in this register
    #[bondrewd(bit_length = 1)]
    pub press_and_hold: bool,
    #[bondrewd(bit_length = 1)]
    pub single_tap: bool,
}

/// Contents of the multi finger gesture register (`GESTURE_ADDR1`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Bitfields)]
#[bondrewd(default_endianness = "le")]
pub struct MultiFingerGestures {
    #[bondrewd(bit_length = 5)]
    padding0: u8,
    #[bondrewd(bit_length = 1)]
    pub zoom: bool,
    #[bondrewd(bit_length = 1)]
    pub scroll: bool,
    #[bondrewd(bit_length = 1)]
    pub two_finger_tap: bool,
}

/// A single finger gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleGesture {
    /// Bit 0
    Tap,
    /// Bit 2, swipe along negative X
    SwipeDown,
    /// Bit 3, swipe along positive X
    SwipeUp,
    /// Bit 4, swipe along negative Y
    SwipeRight,
    /// Bit 5, swipe along positive Y
    SwipeLeft,
}

impl SingleGesture {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tap => "tapped",
            Self::SwipeDown => "swipe down",
            Self::SwipeUp => "swiped up",
            Self::SwipeRight => "swiped right",
            Self::SwipeLeft => "swiped left",
        }
    }
}

/// A two finger gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiGesture {
    TwoFingerTap,
    Scroll,
    Zoom,
}

impl MultiGesture {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TwoFingerTap => "2 finger tapped",
            Self::Scroll => "scroll",
            Self::Zoom => "zoom",
        }
    }
}

const PRESS_AND_HOLD: u8 = 1 << 1;

/// Evaluated in order, the first matching mask wins. Press and hold is not
/// part of this list.
pub const SINGLE_GESTURE_PRIORITY: [(u8, SingleGesture); 5] = [
    (1 << 0, SingleGesture::Tap),
    (1 << 2, SingleGesture::SwipeDown),
    (1 << 3, SingleGesture::SwipeUp),
    (1 << 4, SingleGesture::SwipeRight),
    (1 << 5, SingleGesture::SwipeLeft),
];

/// Evaluated in order, the first matching mask wins
pub const MULTI_GESTURE_PRIORITY: [(u8, MultiGesture); 3] = [
    (1 << 0, MultiGesture::TwoFingerTap),
    (1 << 1, MultiGesture::Scroll),
    (1 << 2, MultiGesture::Zoom),
];

/// Both gesture registers as read during one cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GestureFrame {
    pub single: SingleFingerGestures,
    pub multi: MultiFingerGestures,
}

impl GestureFrame {
    pub fn new(events0: u8, events1: u8) -> Self {
        Self {
            single: SingleFingerGestures::from_bytes([events0]),
            multi: MultiFingerGestures::from_bytes([events1]),
        }
    }

    /// Decode a frame from the two gesture registers, in address order
    pub fn from_slice<E>(bytes: &[u8]) -> Result<Self, Error<E>> {
        match bytes {
            [events0, events1] => Ok(Self::new(*events0, *events1)),
            _ => Err(Error::MalformedFrame(bytes.len())),
        }
    }

    /// Raw register values, `(GESTURE_ADDR0, GESTURE_ADDR1)`
    pub fn raw(&self) -> (u8, u8) {
        (self.single.into_bytes()[0], self.multi.into_bytes()[0])
    }

    pub fn press_and_hold(&self) -> bool {
        self.raw().0 & PRESS_AND_HOLD != 0
    }

    pub fn single_gesture(&self) -> Option<SingleGesture> {
        first_match(&SINGLE_GESTURE_PRIORITY, self.raw().0)
    }

    pub fn multi_gesture(&self) -> Option<MultiGesture> {
        first_match(&MULTI_GESTURE_PRIORITY, self.raw().1)
    }
}

fn first_match<T: Copy>(priority: &[(u8, T)], value: u8) -> Option<T> {
    priority
        .iter()
        .find(|(mask, _)| value & mask != 0)
        .map(|(_, gesture)| *gesture)
}
