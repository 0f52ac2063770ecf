//! IQS5xx Capacitive Trackpad Controller
//!
//! The device is polled: wait for the RDY pin, read the gesture, system and
//! finger registers one at a time, then close the communication window so
//! the device can resume sensing.

#![cfg_attr(not(test), no_std)]

use core::{convert::Infallible, fmt::Debug};

use embedded_hal::{
    blocking::{
        delay::DelayMs,
        i2c::{Read, Write, WriteRead},
    },
    digital::v2::InputPin,
};
use log::{debug, info, warn};

pub mod gesture;
pub mod registers;
pub mod touch;

pub use gesture::{GestureFrame, MultiGesture, SingleGesture};
pub use touch::{FingerRecord, TouchSample};

use registers::{
    END_COMM_ADDR,
    FINGER0_REL_X_ADDR0,
    FINGER0_REL_X_ADDR1,
    FINGER0_REL_Y_ADDR0,
    FINGER0_REL_Y_ADDR1,
    FINGERS,
    GESTURE_ADDR0,
    GESTURE_ADDR1,
    NUM_OF_FINGERS_ADDR,
    PROD_NUM_ADDR0,
    SYSTEM_INFO_ADDR0,
    SYSTEM_INFO_ADDR1,
};
use touch::u16_from_halves;

/// Default I²C address for the IQS5xx
pub const DEFAULT_I2C_ADDR: u8 = 0x74;

const PROD_IQS550_VAL: u16 = 40;
const PROD_IQS572_VAL: u16 = 58;
const PROD_IQS525_VAL: u16 = 52;

const BOOTLOADER_IS_AVAIL_VAL: u8 = 0xA5;
const NO_BOOTLOADER_VAL: u8 = 0xEE;

/// Any type of error which may occur while interacting with the device
#[derive(Debug)]
pub enum Error<E> {
    /// Some error originating from the communication bus
    BusError(E),
    /// Reading a GPIO pin resulted in an error
    IOError,
    /// The RDY pin never signalled that data is available
    DeviceNotReady,
    /// A buffer handed to a decoder had the wrong length
    MalformedFrame(usize),
}

/// What to do when a transaction fails part way through a read cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure, decode the field as zero and keep reading
    Continue,
    /// Stop reading, close the communication window, return the error
    AbortCycle,
    /// Return the error immediately; the device stays in its communication
    /// window until the next write
    AbortSkipTermination,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::Continue
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit I²C address of the device
    pub address: u8,
    /// Sleep between RDY pin polls
    pub ready_poll_ms: u32,
    /// Give up after this many RDY polls; `None` waits forever
    pub ready_timeout: Option<u32>,
    /// Sleep after each read cycle
    pub cycle_interval_ms: u32,
    pub error_policy: ErrorPolicy,
    /// Skip the finger 0 reads when the device reports no fingers
    pub skip_idle_fingers: bool,
    /// Select `FINGER0_REL_X_ADDR1` in place of the absolute X high byte, as
    /// the legacy firmware read sequence does
    pub legacy_abs_x_high: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_I2C_ADDR,
            ready_poll_ms: 1_000,
            ready_timeout: None,
            cycle_interval_ms: 30,
            error_policy: ErrorPolicy::default(),
            skip_idle_fingers: false,
            legacy_abs_x_high: false,
        }
    }
}

impl Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_ready_poll_ms(mut self, ms: u32) -> Self {
        self.ready_poll_ms = ms;
        self
    }

    pub fn with_ready_timeout(mut self, polls: u32) -> Self {
        self.ready_timeout = Some(polls);
        self
    }

    pub fn with_cycle_interval_ms(mut self, ms: u32) -> Self {
        self.cycle_interval_ms = ms;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_skip_idle_fingers(mut self, skip: bool) -> Self {
        self.skip_idle_fingers = skip;
        self
    }

    pub fn with_legacy_abs_x_high(mut self, legacy: bool) -> Self {
        self.legacy_abs_x_high = legacy;
        self
    }
}

/// Everything read from the device during one cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub gestures: GestureFrame,
    pub sys_info0: u8,
    pub sys_info1: u8,
    pub touch: TouchSample,
    /// Failed transactions tolerated under [ErrorPolicy::Continue]; fields
    /// they would have filled read as zero
    pub bus_errors: u8,
}

/// Product variant, from the product number register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    Iqs550,
    Iqs572,
    Iqs525,
    Unknown(u16),
}

impl From<u16> for Product {
    fn from(value: u16) -> Self {
        match value {
            PROD_IQS550_VAL => Self::Iqs550,
            PROD_IQS572_VAL => Self::Iqs572,
            PROD_IQS525_VAL => Self::Iqs525,
            n => Self::Unknown(n),
        }
    }
}

/// Bootloader status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootloader {
    Available,
    NotAvailable,
    Unknown(u8),
}

impl From<u8> for Bootloader {
    fn from(value: u8) -> Self {
        match value {
            BOOTLOADER_IS_AVAIL_VAL => Self::Available,
            NO_BOOTLOADER_VAL => Self::NotAvailable,
            n => Self::Unknown(n),
        }
    }
}

/// Product and version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub product: Product,
    pub project_number: u16,
    pub major_version: u8,
    pub minor_version: u8,
    pub bootloader: Bootloader,
}

impl DeviceInfo {
    /// Length of the identification block starting at `PROD_NUM_ADDR0`
    pub const LEN: usize = 7;

    pub fn from_slice<E>(bytes: &[u8]) -> Result<Self, Error<E>> {
        if bytes.len() != Self::LEN {
            return Err(Error::MalformedFrame(bytes.len()));
        }

        // Identification registers are big-endian, unlike the finger data
        let product = u16::from_be_bytes([bytes[0], bytes[1]]);
        let project_number = u16::from_be_bytes([bytes[2], bytes[3]]);

        Ok(Self {
            product: Product::from(product),
            project_number,
            major_version: bytes[4],
            minor_version: bytes[5],
            bootloader: Bootloader::from(bytes[6]),
        })
    }
}

/// IQS5xx driver
pub struct Iqs5xx<I2C, RDY> {
    /// Underlying I²C peripheral
    i2c: I2C,
    /// Ready pin; high while the device is busy
    rdy: RDY,
    config: Config,
}

impl<I2C, RDY> Iqs5xx<I2C, RDY> {
    /// Create a new instance of the driver. The device is not touched until
    /// [Iqs5xx::wait_ready] or [Iqs5xx::init] is called.
    pub fn new(i2c: I2C, rdy: RDY, config: Config) -> Self {
        Self { i2c, rdy, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the bus and pin
    pub fn release(self) -> (I2C, RDY) {
        (self.i2c, self.rdy)
    }
}

impl<I2C, RDY, E> Iqs5xx<I2C, RDY>
where
    I2C: Write<Error = E> + WriteRead<Error = E> + Read<Error = E>,
    RDY: InputPin,
    E: Debug,
{
    /// Is there data available to read from the device?
    pub fn data_available(&self) -> Result<bool, Error<E>> {
        self.rdy.is_low().map_err(|_| Error::IOError)
    }

    /// Block until the device signals that data is available
    pub fn wait_ready<D>(&mut self, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayMs<u32>,
    {
        let mut polls = 0;
        while !self.data_available()? {
            if let Some(limit) = self.config.ready_timeout {
                if polls >= limit {
                    warn!("device not ready after {} polls", polls);
                    return Err(Error::DeviceNotReady);
                }
            }

            info!("waiting for ready");
            delay.delay_ms(self.config.ready_poll_ms);
            polls += 1;
        }

        info!("ready");
        Ok(())
    }

    /// Perform the start up handshake and return 16 bytes of diagnostic data.
    ///
    /// Unlike every other register access, `GESTURE_ADDR0` is selected here
    /// with a single byte and the data is read in a separate transaction, so
    /// the returned bytes are not guaranteed to start at that register.
    ///
    /// Failed transactions follow [Config::error_policy]; under
    /// [ErrorPolicy::Continue] the remaining steps are still sent and a failed
    /// read yields zeros.
    pub fn init(&mut self) -> Result<[u8; 16], Error<E>> {
        let reset = self.transact(&[0x00], &mut []);
        self.tolerate("reset", reset)?;

        let select = self.transact(&[GESTURE_ADDR0 as u8], &mut []);
        self.tolerate("select", select)?;

        debug!("reading initial data");
        let mut data = [0u8; 16];
        let drain = self.transact(&[], &mut data);
        if drain.is_err() {
            data = [0u8; 16];
        }
        self.tolerate("initial read", drain)?;
        debug!("initial data: {:02x?}", data);

        Ok(data)
    }

    /// Run one read cycle, including the end of communication handshake.
    ///
    /// How failed transactions are handled depends on
    /// [Config::error_policy].
    pub fn cycle(&mut self) -> Result<Report, Error<E>> {
        let mut report = Report::default();
        let policy = self.config.error_policy;

        match (self.read_report(&mut report), policy) {
            (Err(e), ErrorPolicy::AbortSkipTermination) => Err(e),
            (Err(e), _) => {
                // The read error takes precedence; termination failures are logged
                let _ = self.end_communication();
                Err(e)
            }
            (Ok(()), _) => match self.end_communication() {
                Ok(()) => Ok(report),
                Err(_) if policy == ErrorPolicy::Continue => {
                    report.bus_errors = report.bus_errors.saturating_add(1);
                    Ok(report)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Run one read cycle and sleep for [Config::cycle_interval_ms]
    pub fn step<D>(&mut self, delay: &mut D) -> Result<Report, Error<E>>
    where
        D: DelayMs<u32>,
    {
        let report = self.cycle();
        delay.delay_ms(self.config.cycle_interval_ms);

        report
    }

    /// Wait for the device, initialize it and poll it forever, handing each
    /// report to `on_report`.
    ///
    /// Only returns if the device never becomes ready, or if initialization
    /// fails under an aborting [ErrorPolicy].
    pub fn run<D, F>(&mut self, delay: &mut D, mut on_report: F) -> Result<Infallible, Error<E>>
    where
        D: DelayMs<u32>,
        F: FnMut(&Report),
    {
        self.wait_ready(delay)?;

        if let Err(e) = self.init() {
            warn!("initialization failed: {:?}", e);
            if self.config.error_policy != ErrorPolicy::Continue {
                return Err(e);
            }
        }

        loop {
            match self.step(delay) {
                Ok(report) => on_report(&report),
                Err(e) => warn!("read cycle failed: {:?}", e),
            }
        }
    }

    /// Read the product and version registers
    pub fn device_info(&mut self) -> Result<DeviceInfo, Error<E>> {
        let mut buffer = [0u8; DeviceInfo::LEN];
        let read = self.transact(&PROD_NUM_ADDR0.to_be_bytes(), &mut buffer);
        let end = self.end_communication();
        read?;
        end?;

        DeviceInfo::from_slice(&buffer)
    }

    /// Close the communication window so the device resumes processing.
    ///
    /// Both writes are always attempted; the first error is returned.
    pub fn end_communication(&mut self) -> Result<(), Error<E>> {
        let marker = self.transact(&[END_COMM_ADDR, END_COMM_ADDR], &mut []);
        let resume = self.transact(&[0x00], &mut []);

        let result = marker.and(resume);
        if let Err(e) = &result {
            warn!("failed to end communication window: {:?}", e);
        }

        result
    }

    // -----------------------------------------------------------------------
    // PRIVATE

    fn read_report(&mut self, report: &mut Report) -> Result<(), Error<E>> {
        let faults = &mut report.bus_errors;

        let events0 = self.read_reg(GESTURE_ADDR0, faults)?;
        let events1 = self.read_reg(GESTURE_ADDR1, faults)?;
        report.gestures = GestureFrame::new(events0, events1);
        log_gestures(&report.gestures);

        report.sys_info0 = self.read_reg(SYSTEM_INFO_ADDR0, faults)?;
        report.sys_info1 = self.read_reg(SYSTEM_INFO_ADDR1, faults)?;
        report.touch.num_fingers = self.read_reg(NUM_OF_FINGERS_ADDR, faults)?;

        if self.config.skip_idle_fingers && report.touch.num_fingers == 0 {
            return Ok(());
        }

        let regs = FINGERS[0];
        let abs_x_high = if self.config.legacy_abs_x_high {
            FINGER0_REL_X_ADDR1
        } else {
            regs.abs_x.1
        };

        let rel_x = self.read_pair((FINGER0_REL_X_ADDR0, FINGER0_REL_X_ADDR1), faults)?;
        let rel_y = self.read_pair((FINGER0_REL_Y_ADDR0, FINGER0_REL_Y_ADDR1), faults)?;
        let abs_x = self.read_pair((regs.abs_x.0, abs_x_high), faults)?;
        let abs_y = self.read_pair(regs.abs_y, faults)?;
        let strength = self.read_pair(regs.strength, faults)?;
        let area = self.read_reg(regs.area, faults)?;

        let finger = FingerRecord {
            rel_x: rel_x as i16,
            rel_y: rel_y as i16,
            abs_x,
            abs_y,
            strength,
            area,
        };
        debug!(
            "fingers: {}, finger 0: {:?}",
            report.touch.num_fingers, finger
        );
        report.touch.fingers[0] = finger;

        Ok(())
    }

    fn tolerate(&self, step: &str, result: Result<(), Error<E>>) -> Result<(), Error<E>> {
        match result {
            Err(e) if self.config.error_policy == ErrorPolicy::Continue => {
                warn!("{} failed: {:?}", step, e);
                Ok(())
            }
            other => other,
        }
    }

    fn read_pair(&mut self, (low, high): (u16, u16), faults: &mut u8) -> Result<u16, Error<E>> {
        let low = self.read_reg(low, faults)?;
        let high = self.read_reg(high, faults)?;

        Ok(u16_from_halves(low, high))
    }

    fn read_reg(&mut self, reg: u16, faults: &mut u8) -> Result<u8, Error<E>> {
        let mut buffer = [0u8; 1];

        match self.transact(&reg.to_be_bytes(), &mut buffer) {
            Ok(()) => Ok(buffer[0]),
            Err(e) => {
                warn!("failed to read register {:#06x}: {:?}", reg, e);
                *faults = faults.saturating_add(1);

                match self.config.error_policy {
                    ErrorPolicy::Continue => Ok(0),
                    _ => Err(e),
                }
            }
        }
    }

    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Error<E>> {
        let address = self.config.address;

        let result = match (write.is_empty(), read.is_empty()) {
            (false, false) => self.i2c.write_read(address, write, read),
            (false, true) => self.i2c.write(address, write),
            (true, false) => self.i2c.read(address, read),
            (true, true) => Ok(()),
        };

        result.map_err(|e| Error::BusError(e))
    }
}

fn log_gestures(gestures: &GestureFrame) {
    if gestures.press_and_hold() {
        info!("press and hold");
    }
    if let Some(gesture) = gestures.single_gesture() {
        info!("{}", gesture.name());
    }
    if let Some(gesture) = gestures.multi_gesture() {
        info!("{}", gesture.name());
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use embedded_hal_mock::{
        i2c::{Mock as I2cMock, Transaction as I2cTransaction},
        pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        MockError,
    };

    use super::*;
    use crate::registers::*;

    const ADDR: u8 = DEFAULT_I2C_ADDR;

    #[derive(Default)]
    struct RecordingDelay {
        calls: Vec<u32>,
    }

    impl DelayMs<u32> for RecordingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.calls.push(ms);
        }
    }

    fn bus_error() -> MockError {
        MockError::Io(ErrorKind::Other)
    }

    fn select(reg: u16, value: u8) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, reg.to_be_bytes().to_vec(), vec![value])
    }

    fn failed(reg: u16) -> I2cTransaction {
        select(reg, 0).with_error(bus_error())
    }

    fn termination() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDR, vec![0xEE, 0xEE]),
            I2cTransaction::write(ADDR, vec![0x00]),
        ]
    }

    fn status(events0: u8, events1: u8, fingers: u8) -> Vec<I2cTransaction> {
        vec![
            select(GESTURE_ADDR0, events0),
            select(GESTURE_ADDR1, events1),
            select(SYSTEM_INFO_ADDR0, 0x00),
            select(SYSTEM_INFO_ADDR1, 0x01),
            select(NUM_OF_FINGERS_ADDR, fingers),
        ]
    }

    // rel x = -5, rel y = 10, abs x = 800, abs y = 600, strength = 1000, area = 7
    const FINGER0_BYTES: [u8; 11] = [
        0xFB, 0xFF, 0x0A, 0x00, 0x20, 0x03, 0x58, 0x02, 0xE8, 0x03, 0x07,
    ];

    fn finger0(abs_x_high: u16) -> Vec<I2cTransaction> {
        let regs = [
            FINGER0_REL_X_ADDR0,
            FINGER0_REL_X_ADDR1,
            FINGER0_REL_Y_ADDR0,
            FINGER0_REL_Y_ADDR1,
            FINGER0_ABS_X_ADDR0,
            abs_x_high,
            FINGER0_ABS_Y_ADDR0,
            FINGER0_ABS_Y_ADDR1,
            FINGER0_TOUCH_STRENGTH_ADDR0,
            FINGER0_TOUCH_STRENGTH_ADDR1,
            FINGER0_TOUCH_AREA_SIZE_ADDR,
        ];

        regs.iter()
            .zip(FINGER0_BYTES.iter())
            .map(|(reg, value)| select(*reg, *value))
            .collect()
    }

    fn idle_pin() -> PinMock {
        PinMock::new(&[] as &[PinTransaction])
    }

    fn driver(
        expectations: &[I2cTransaction],
        config: Config,
    ) -> (Iqs5xx<I2cMock, PinMock>, I2cMock) {
        let i2c = I2cMock::new(expectations);
        let i2c_clone = i2c.clone();

        (Iqs5xx::new(i2c, idle_pin(), config), i2c_clone)
    }

    #[test]
    fn init_drains_sixteen_bytes() {
        let dump: Vec<u8> = (0..16).collect();
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x0D]),
            I2cTransaction::read(ADDR, dump.clone()),
        ];
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let data = iqs.init().unwrap();
        assert_eq!(data.to_vec(), dump);

        i2c.done();
    }

    #[test]
    fn cycle_reads_every_field_then_terminates() {
        let mut expectations = status(0b0000_0011, 0b0000_0010, 1);
        expectations.extend(finger0(FINGER0_ABS_X_ADDR1));
        expectations.extend(termination());
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let report = iqs.cycle().unwrap();

        assert_eq!(report.gestures.single_gesture(), Some(SingleGesture::Tap));
        assert!(report.gestures.press_and_hold());
        assert_eq!(report.gestures.multi_gesture(), Some(MultiGesture::Scroll));
        assert_eq!(report.sys_info0, 0x00);
        assert_eq!(report.sys_info1, 0x01);
        assert_eq!(report.touch.num_fingers, 1);
        assert_eq!(
            *report.touch.primary(),
            FingerRecord {
                rel_x: -5,
                rel_y: 10,
                abs_x: 800,
                abs_y: 600,
                strength: 1000,
                area: 7,
            }
        );
        assert_eq!(report.touch.fingers[1], FingerRecord::default());
        assert_eq!(report.bus_errors, 0);

        i2c.done();
    }

    #[test]
    fn legacy_sequence_rereads_relative_x_high() {
        let mut expectations = status(0, 0, 1);
        expectations.extend(finger0(FINGER0_REL_X_ADDR1));
        expectations.extend(termination());
        let config = Config::default().with_legacy_abs_x_high(true);
        let (mut iqs, mut i2c) = driver(&expectations, config);

        let report = iqs.cycle().unwrap();
        assert_eq!(report.touch.primary().abs_x, 800);

        i2c.done();
    }

    #[test]
    fn zero_fingers_still_reads_finger_data_by_default() {
        let mut expectations = status(0, 0, 0);
        expectations.extend(finger0(FINGER0_ABS_X_ADDR1));
        expectations.extend(termination());
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let report = iqs.cycle().unwrap();
        assert_eq!(report.touch.num_fingers, 0);
        assert_eq!(report.touch.primary().area, 7);

        i2c.done();
    }

    #[test]
    fn zero_fingers_skips_finger_data_when_configured() {
        let mut expectations = status(0, 0, 0);
        expectations.extend(termination());
        let config = Config::default().with_skip_idle_fingers(true);
        let (mut iqs, mut i2c) = driver(&expectations, config);

        let report = iqs.cycle().unwrap();
        assert_eq!(*report.touch.primary(), FingerRecord::default());

        i2c.done();
    }

    #[test]
    fn continue_policy_reads_past_failures() {
        let mut expectations = vec![
            select(GESTURE_ADDR0, 0b0000_0001),
            select(GESTURE_ADDR1, 0),
            select(SYSTEM_INFO_ADDR0, 0x04),
            failed(SYSTEM_INFO_ADDR1),
            select(NUM_OF_FINGERS_ADDR, 1),
        ];
        expectations.extend(finger0(FINGER0_ABS_X_ADDR1));
        expectations.extend(termination());
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let report = iqs.cycle().unwrap();
        assert_eq!(report.sys_info0, 0x04);
        assert_eq!(report.sys_info1, 0);
        assert_eq!(report.touch.num_fingers, 1);
        assert_eq!(report.bus_errors, 1);

        i2c.done();
    }

    #[test]
    fn continue_policy_counts_failed_termination() {
        let mut expectations = status(0, 0, 1);
        expectations.extend(finger0(FINGER0_ABS_X_ADDR1));
        expectations.push(I2cTransaction::write(ADDR, vec![0xEE, 0xEE]).with_error(bus_error()));
        expectations.push(I2cTransaction::write(ADDR, vec![0x00]));
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let report = iqs.cycle().unwrap();
        assert_eq!(report.bus_errors, 1);

        i2c.done();
    }

    #[test]
    fn abort_cycle_still_terminates() {
        let mut expectations = vec![select(GESTURE_ADDR0, 0), failed(GESTURE_ADDR1)];
        expectations.extend(termination());
        let config = Config::default().with_error_policy(ErrorPolicy::AbortCycle);
        let (mut iqs, mut i2c) = driver(&expectations, config);

        assert!(matches!(iqs.cycle(), Err(Error::BusError(_))));

        i2c.done();
    }

    #[test]
    fn abort_skip_termination_returns_immediately() {
        let expectations = [select(GESTURE_ADDR0, 0), failed(GESTURE_ADDR1)];
        let config = Config::default().with_error_policy(ErrorPolicy::AbortSkipTermination);
        let (mut iqs, mut i2c) = driver(&expectations, config);

        assert!(matches!(iqs.cycle(), Err(Error::BusError(_))));

        i2c.done();
    }

    #[test]
    fn end_communication_attempts_both_writes() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![0xEE, 0xEE]).with_error(bus_error()),
            I2cTransaction::write(ADDR, vec![0x00]),
        ];
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        assert!(matches!(iqs.end_communication(), Err(Error::BusError(_))));

        i2c.done();
    }

    #[test]
    fn step_sleeps_after_the_cycle() {
        let mut expectations = status(0, 0b0000_0100, 1);
        expectations.extend(finger0(FINGER0_ABS_X_ADDR1));
        expectations.extend(termination());
        let config = Config::default().with_cycle_interval_ms(15);
        let (mut iqs, mut i2c) = driver(&expectations, config);
        let mut delay = RecordingDelay::default();

        let report = iqs.step(&mut delay).unwrap();
        assert_eq!(report.gestures.multi_gesture(), Some(MultiGesture::Zoom));
        assert_eq!(delay.calls, vec![15]);

        i2c.done();
    }

    #[test]
    fn wait_ready_polls_until_pin_goes_low() {
        let pin_expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ];
        let rdy = PinMock::new(&pin_expectations);
        let mut rdy_clone = rdy.clone();
        let mut iqs = Iqs5xx::new(I2cMock::new(&[] as &[I2cTransaction]), rdy, Config::default());
        let mut delay = RecordingDelay::default();

        iqs.wait_ready(&mut delay).unwrap();
        assert_eq!(delay.calls, vec![1_000, 1_000]);

        rdy_clone.done();
    }

    #[test]
    fn wait_ready_gives_up_after_timeout() {
        let pin_expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
        ];
        let rdy = PinMock::new(&pin_expectations);
        let mut rdy_clone = rdy.clone();
        let config = Config::default().with_ready_timeout(2).with_ready_poll_ms(5);
        let mut iqs = Iqs5xx::new(I2cMock::new(&[] as &[I2cTransaction]), rdy, config);
        let mut delay = RecordingDelay::default();

        assert!(matches!(
            iqs.wait_ready(&mut delay),
            Err(Error::DeviceNotReady)
        ));
        assert_eq!(delay.calls, vec![5, 5]);

        rdy_clone.done();
    }

    #[test]
    fn init_continues_past_failed_reset() {
        let dump: Vec<u8> = (0x10..0x20).collect();
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x00]).with_error(bus_error()),
            I2cTransaction::write(ADDR, vec![0x0D]),
            I2cTransaction::read(ADDR, dump.clone()),
        ];
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let data = iqs.init().unwrap();
        assert_eq!(data.to_vec(), dump);

        i2c.done();
    }

    #[test]
    fn init_aborts_on_failed_reset() {
        let expectations = [I2cTransaction::write(ADDR, vec![0x00]).with_error(bus_error())];
        let config = Config::default().with_error_policy(ErrorPolicy::AbortCycle);
        let (mut iqs, mut i2c) = driver(&expectations, config);

        assert!(matches!(iqs.init(), Err(Error::BusError(_))));

        i2c.done();
    }

    #[test]
    fn run_returns_when_device_never_ready() {
        let pin_expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
        ];
        let rdy = PinMock::new(&pin_expectations);
        let mut rdy_clone = rdy.clone();
        let i2c = I2cMock::new(&[] as &[I2cTransaction]);
        let mut i2c_clone = i2c.clone();
        let config = Config::default().with_ready_timeout(1);
        let mut iqs = Iqs5xx::new(i2c, rdy, config);
        let mut delay = RecordingDelay::default();

        let result = iqs.run(&mut delay, |_| panic!("no report expected"));
        assert!(matches!(result, Err(Error::DeviceNotReady)));
        assert_eq!(delay.calls, vec![1_000]);

        rdy_clone.done();
        i2c_clone.done();
    }

    #[test]
    fn run_returns_when_init_fails_under_abort_policy() {
        let rdy = PinMock::new(&[PinTransaction::get(PinState::Low)]);
        let mut rdy_clone = rdy.clone();
        let i2c = I2cMock::new(&[I2cTransaction::write(ADDR, vec![0x00]).with_error(bus_error())]);
        let mut i2c_clone = i2c.clone();
        let config = Config::default().with_error_policy(ErrorPolicy::AbortCycle);
        let mut iqs = Iqs5xx::new(i2c, rdy, config);
        let mut delay = RecordingDelay::default();

        let result = iqs.run(&mut delay, |_| panic!("no report expected"));
        assert!(matches!(result, Err(Error::BusError(_))));
        assert!(delay.calls.is_empty());

        rdy_clone.done();
        i2c_clone.done();
    }

    #[test]
    fn device_info_decodes_identification_block() {
        let mut expectations = vec![I2cTransaction::write_read(
            ADDR,
            vec![0x00, 0x00],
            vec![0x00, 40, 0x00, 0x0F, 2, 1, 0xA5],
        )];
        expectations.extend(termination());
        let (mut iqs, mut i2c) = driver(&expectations, Config::default());

        let info = iqs.device_info().unwrap();
        assert_eq!(
            info,
            DeviceInfo {
                product: Product::Iqs550,
                project_number: 15,
                major_version: 2,
                minor_version: 1,
                bootloader: Bootloader::Available,
            }
        );

        i2c.done();
    }

    #[test]
    fn device_info_rejects_short_block() {
        assert!(matches!(
            DeviceInfo::from_slice::<()>(&[0x00, 58, 0x00]),
            Err(Error::MalformedFrame(3))
        ));

        let info = DeviceInfo::from_slice::<()>(&[0x00, 58, 0x00, 0x01, 1, 0, 0x12]).unwrap();
        assert_eq!(info.product, Product::Iqs572);
        assert_eq!(info.bootloader, Bootloader::Unknown(0x12));
    }

    #[test]
    fn custom_address_is_used_on_the_bus() {
        let expectations = [
            I2cTransaction::write(0x75, vec![0xEE, 0xEE]),
            I2cTransaction::write(0x75, vec![0x00]),
        ];
        let (mut iqs, mut i2c) = driver(&expectations, Config::default().with_address(0x75));

        iqs.end_communication().unwrap();

        i2c.done();
    }
}
