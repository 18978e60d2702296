use core::fmt;

use embedded_hal::serial::Write;

/// Blocking text output over a UART transmitter.
pub struct SerialConsole<TX> {
    tx: TX,
}

impl<TX> SerialConsole<TX> {
    pub fn new(tx: TX) -> Self {
        Self { tx }
    }

    pub fn release(self) -> TX {
        self.tx
    }
}

impl<TX> fmt::Write for SerialConsole<TX>
where
    TX: Write<u8>,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                nb::block!(self.tx.write(b'\r')).map_err(|_| fmt::Error)?;
            }
            nb::block!(self.tx.write(b)).map_err(|_| fmt::Error)?;
        }
        nb::block!(self.tx.flush()).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::Write as _;

    use super::*;

    #[derive(Default)]
    struct Wire {
        sent: heapless::Vec<u8, 64>,
        busy: bool,
    }

    impl Write<u8> for Wire {
        type Error = ();

        fn write(&mut self, word: u8) -> nb::Result<(), ()> {
            // every other call reports a full transmit register
            self.busy = !self.busy;
            if self.busy {
                return Err(nb::Error::WouldBlock);
            }
            self.sent.push(word).map_err(|_| nb::Error::Other(()))
        }

        fn flush(&mut self) -> nb::Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn newlines_get_carriage_returns() {
        let mut console = SerialConsole::new(Wire::default());
        write!(console, "a\nb").unwrap();
        assert_eq!(&console.release().sent[..], b"a\r\nb");
    }

    #[test]
    fn transmit_errors_surface() {
        let mut console = SerialConsole::new(Wire::default());
        let long = [b'x'; 65];
        let text = core::str::from_utf8(&long).unwrap();
        assert!(console.write_str(text).is_err());
    }
}
