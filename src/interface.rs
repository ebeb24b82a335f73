//! Bus transports. A `DisplayInterface` moves opaque command and data bytes to the controller and
//! knows nothing about drawing. Each call is one synchronous, blocking bus transaction; timeouts
//! are whatever the underlying HAL implementation enforces. Failures are returned as-is and never
//! retried here.

pub trait DisplayInterface {
    type Error;

    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

/// A failed transaction: either the bus itself reported an error (timeout, NACK, absent device),
/// or a control line could not be driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportError<B, P> {
    Bus(B),
    Pin(P),
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the controller, where a dedicated D/C
    //! GPIO is held low while a command byte is clocked out and high for data. No prefix byte is
    //! sent in-band. Chip select is left to the SPI device implementation.

    use super::{DisplayInterface, TransportError};

    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the controller.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the controller.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
    {
        /// Create a new SPI interface to communicate with the display controller. `spi` is the
        /// SPI master device, and `dc` is the GPIO output pin connected to the D/C pin.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }

        /// Give back the SPI device and D/C pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
    {
        type Error = TransportError<SPI::Error, DC::Error>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(TransportError::Pin)?;
            self.spi.write(&[cmd]).map_err(TransportError::Bus)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            if buf.is_empty() {
                return Ok(());
            }
            self.dc.set_high().map_err(TransportError::Pin)?;
            self.spi.write(buf).map_err(TransportError::Bus)
        }
    }
}

pub mod i2c {
    //! The I2C interface frames every transaction with a leading control byte: `0x80` marks a
    //! single command byte, `0x40` marks a run of display data. Long data runs are split into
    //! several transactions, each carrying its own control byte.

    use core::convert::Infallible;

    use super::{DisplayInterface, TransportError};

    /// The usual 7-bit address of an SSD1306 module with SA0 tied low.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;

    const CONTROL_COMMAND: u8 = 0x80;
    const CONTROL_DATA: u8 = 0x40;

    /// Maximum display data bytes per I2C transaction.
    const DATA_CHUNK: usize = 32;

    pub struct I2cInterface<I2C> {
        i2c: I2C,
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        /// Create a new I2C interface talking to the controller at 7-bit `address`.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Give back the I2C bus.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        type Error = TransportError<I2C::Error, Infallible>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.i2c
                .write(self.address, &[CONTROL_COMMAND, cmd])
                .map_err(TransportError::Bus)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            let mut frame = [0u8; DATA_CHUNK + 1];
            frame[0] = CONTROL_DATA;
            for chunk in buf.chunks(DATA_CHUNK) {
                frame[1..=chunk.len()].copy_from_slice(chunk);
                self.i2c
                    .write(self.address, &frame[..=chunk.len()])
                    .map_err(TransportError::Bus)?;
            }
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::i2c::I2cInterface;
    use super::spi::SpiInterface;
    use super::{DisplayInterface, TransportError};

    #[derive(Debug, PartialEq)]
    enum Wire {
        Dc(bool),
        Spi(Vec<u8>),
        I2c(u8, Vec<u8>),
    }

    type Log = Rc<RefCell<Vec<Wire>>>;

    struct Bus(Log, bool);
    struct Pin(Log);

    impl hal::blocking::spi::Write<u8> for Bus {
        type Error = &'static str;
        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            if self.1 {
                return Err("timeout");
            }
            self.0.borrow_mut().push(Wire::Spi(words.to_vec()));
            Ok(())
        }
    }

    impl hal::blocking::i2c::Write for Bus {
        type Error = &'static str;
        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.1 {
                return Err("nack");
            }
            self.0.borrow_mut().push(Wire::I2c(address, bytes.to_vec()));
            Ok(())
        }
    }

    impl hal::digital::v2::OutputPin for Pin {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Wire::Dc(false));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Wire::Dc(true));
            Ok(())
        }
    }

    #[test]
    fn spi_dc_line_framing() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut iface = SpiInterface::new(Bus(log.clone(), false), Pin(log.clone()));
        iface.send_command(0x2A).unwrap();
        iface.send_data(&[0x00, 0x7F]).unwrap();
        assert_eq!(
            &log.borrow()[..],
            &[
                Wire::Dc(false),
                Wire::Spi(vec![0x2A]),
                Wire::Dc(true),
                Wire::Spi(vec![0x00, 0x7F]),
            ]
        );
    }

    #[test]
    fn spi_empty_data_is_not_a_transaction() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut iface = SpiInterface::new(Bus(log.clone(), false), Pin(log.clone()));
        iface.send_data(&[]).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn spi_bus_failure_is_reported() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut iface = SpiInterface::new(Bus(log.clone(), true), Pin(log.clone()));
        assert_eq!(iface.send_command(0x01), Err(TransportError::Bus("timeout")));
    }

    #[test]
    fn i2c_control_byte_framing() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut iface = I2cInterface::new(Bus(log.clone(), false), 0x3C);
        iface.send_command(0xAF).unwrap();
        iface.send_data(&[0xDE, 0xAD]).unwrap();
        assert_eq!(
            &log.borrow()[..],
            &[
                Wire::I2c(0x3C, vec![0x80, 0xAF]),
                Wire::I2c(0x3C, vec![0x40, 0xDE, 0xAD]),
            ]
        );
    }

    #[test]
    fn i2c_long_data_is_chunked() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut iface = I2cInterface::new(Bus(log.clone(), false), 0x3D);
        let data = (0..70u8).collect::<Vec<_>>();
        iface.send_data(&data).unwrap();
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        let mut reassembled = Vec::new();
        for w in log.iter() {
            match w {
                Wire::I2c(0x3D, bytes) => {
                    assert_eq!(bytes[0], 0x40);
                    assert!(bytes.len() <= 33);
                    reassembled.extend_from_slice(&bytes[1..]);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(reassembled, data);
    }

    #[test]
    fn i2c_nack_is_reported() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut iface = I2cInterface::new(Bus(log.clone(), true), 0x3C);
        assert_eq!(iface.send_data(&[1]), Err(TransportError::Bus("nack")));
    }
}
