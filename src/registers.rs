//! IQS5xx register map
//!
//! Addresses are 16 bits wide on the wire and are always sent big-endian, so
//! every register in the `0x0000..=0x00FF` range is selected with a leading
//! `0x00` byte.

pub const PROD_NUM_ADDR0: u16 = 0x0000;
pub const PROD_NUM_ADDR1: u16 = 0x0001;
pub const PROJECT_NUM_ADDR0: u16 = 0x0002;
pub const PROJECT_NUM_ADDR1: u16 = 0x0003;
pub const MAJ_VER_ADDR: u16 = 0x0004;
pub const MIN_VER_ADDR: u16 = 0x0005;
pub const BOOTLOADER_ADDR: u16 = 0x0006;

/// Bits[3..0] hold the row, bits[7..4] the column of the strongest touch
pub const MAX_TOUCH_ADDR: u16 = 0x000B;
pub const PREV_CYCLE_TIME_ADDR: u16 = 0x000C;

/// Single finger gestures
pub const GESTURE_ADDR0: u16 = 0x000D;
/// Multi finger gestures
pub const GESTURE_ADDR1: u16 = 0x000E;

pub const SYSTEM_INFO_ADDR0: u16 = 0x000F;
pub const SYSTEM_INFO_ADDR1: u16 = 0x0010;
pub const NUM_OF_FINGERS_ADDR: u16 = 0x0011;

// Relative movement is only reported for the first finger
pub const FINGER0_REL_X_ADDR0: u16 = 0x0012;
pub const FINGER0_REL_X_ADDR1: u16 = 0x0013;
pub const FINGER0_REL_Y_ADDR0: u16 = 0x0014;
pub const FINGER0_REL_Y_ADDR1: u16 = 0x0015;

pub const FINGER0_ABS_X_ADDR0: u16 = 0x0016;
pub const FINGER0_ABS_X_ADDR1: u16 = 0x0017;
pub const FINGER0_ABS_Y_ADDR0: u16 = 0x0018;
pub const FINGER0_ABS_Y_ADDR1: u16 = 0x0019;
pub const FINGER0_TOUCH_STRENGTH_ADDR0: u16 = 0x001A;
pub const FINGER0_TOUCH_STRENGTH_ADDR1: u16 = 0x001B;
pub const FINGER0_TOUCH_AREA_SIZE_ADDR: u16 = 0x001C;

pub const FINGER1_ABS_X_ADDR0: u16 = 0x001D;
pub const FINGER1_ABS_X_ADDR1: u16 = 0x001E;
pub const FINGER1_ABS_Y_ADDR0: u16 = 0x001F;
pub const FINGER1_ABS_Y_ADDR1: u16 = 0x0020;
pub const FINGER1_TOUCH_STRENGTH_ADDR0: u16 = 0x0021;
pub const FINGER1_TOUCH_STRENGTH_ADDR1: u16 = 0x0022;
pub const FINGER1_TOUCH_AREA_SIZE_ADDR: u16 = 0x0023;

pub const FINGER2_ABS_X_ADDR0: u16 = 0x0024;
pub const FINGER2_ABS_X_ADDR1: u16 = 0x0025;
pub const FINGER2_ABS_Y_ADDR0: u16 = 0x0026;
pub const FINGER2_ABS_Y_ADDR1: u16 = 0x0027;
pub const FINGER2_TOUCH_STRENGTH_ADDR0: u16 = 0x0028;
pub const FINGER2_TOUCH_STRENGTH_ADDR1: u16 = 0x0029;
pub const FINGER2_TOUCH_AREA_SIZE_ADDR: u16 = 0x002A;

pub const FINGER3_ABS_X_ADDR0: u16 = 0x002B;
pub const FINGER3_ABS_X_ADDR1: u16 = 0x002C;
pub const FINGER3_ABS_Y_ADDR0: u16 = 0x002D;
pub const FINGER3_ABS_Y_ADDR1: u16 = 0x002E;
pub const FINGER3_TOUCH_STRENGTH_ADDR0: u16 = 0x002F;
pub const FINGER3_TOUCH_STRENGTH_ADDR1: u16 = 0x0030;
pub const FINGER3_TOUCH_AREA_SIZE_ADDR: u16 = 0x0031;

pub const FINGER4_ABS_X_ADDR0: u16 = 0x0032;
pub const FINGER4_ABS_X_ADDR1: u16 = 0x0033;
pub const FINGER4_ABS_Y_ADDR0: u16 = 0x0034;
pub const FINGER4_ABS_Y_ADDR1: u16 = 0x0035;
pub const FINGER4_TOUCH_STRENGTH_ADDR0: u16 = 0x0036;
pub const FINGER4_TOUCH_STRENGTH_ADDR1: u16 = 0x0037;
pub const FINGER4_TOUCH_AREA_SIZE_ADDR: u16 = 0x0038;

/// Written twice to close the communication window
pub const END_COMM_ADDR: u8 = 0xEE;

/// Number of finger slots reported by the device
pub const MAX_FINGERS: usize = 5;

/// Absolute position registers of a single finger slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerRegisters {
    pub abs_x: (u16, u16),
    pub abs_y: (u16, u16),
    pub strength: (u16, u16),
    pub area: u16,
}

/// Register addresses of every finger slot, indexed by slot
pub const FINGERS: [FingerRegisters; MAX_FINGERS] = [
    FingerRegisters {
        abs_x: (FINGER0_ABS_X_ADDR0, FINGER0_ABS_X_ADDR1),
        abs_y: (FINGER0_ABS_Y_ADDR0, FINGER0_ABS_Y_ADDR1),
        strength: (FINGER0_TOUCH_STRENGTH_ADDR0, FINGER0_TOUCH_STRENGTH_ADDR1),
        area: FINGER0_TOUCH_AREA_SIZE_ADDR,
    },
    FingerRegisters {
        abs_x: (FINGER1_ABS_X_ADDR0, FINGER1_ABS_X_ADDR1),
        abs_y: (FINGER1_ABS_Y_ADDR0, FINGER1_ABS_Y_ADDR1),
        strength: (FINGER1_TOUCH_STRENGTH_ADDR0, FINGER1_TOUCH_STRENGTH_ADDR1),
        area: FINGER1_TOUCH_AREA_SIZE_ADDR,
    },
    FingerRegisters {
        abs_x: (FINGER2_ABS_X_ADDR0, FINGER2_ABS_X_ADDR1),
        abs_y: (FINGER2_ABS_Y_ADDR0, FINGER2_ABS_Y_ADDR1),
        strength: (FINGER2_TOUCH_STRENGTH_ADDR0, FINGER2_TOUCH_STRENGTH_ADDR1),
        area: FINGER2_TOUCH_AREA_SIZE_ADDR,
    },
    FingerRegisters {
        abs_x: (FINGER3_ABS_X_ADDR0, FINGER3_ABS_X_ADDR1),
        abs_y: (FINGER3_ABS_Y_ADDR0, FINGER3_ABS_Y_ADDR1),
        strength: (FINGER3_TOUCH_STRENGTH_ADDR0, FINGER3_TOUCH_STRENGTH_ADDR1),
        area: FINGER3_TOUCH_AREA_SIZE_ADDR,
    },
    FingerRegisters {
        abs_x: (FINGER4_ABS_X_ADDR0, FINGER4_ABS_X_ADDR1),
        abs_y: (FINGER4_ABS_Y_ADDR0, FINGER4_ABS_Y_ADDR1),
        strength: (FINGER4_TOUCH_STRENGTH_ADDR0, FINGER4_TOUCH_STRENGTH_ADDR1),
        area: FINGER4_TOUCH_AREA_SIZE_ADDR,
    },
];
