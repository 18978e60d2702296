use core::cell::RefCell;
use core::fmt::{self, Write};

use critical_section::Mutex;
use log::{LevelFilter, Log, Metadata, Record};

const LINE_CAPACITY: usize = 128;

/// `log` backend printing to a text console installed after the logger itself
/// has been registered.
///
/// Lines are rendered outside the critical section and truncated at
/// `LINE_CAPACITY` bytes; only the transmit holds interrupts off.
pub struct ConsoleLogger<W> {
    console: Mutex<RefCell<Option<W>>>,
    level: LevelFilter,
}

impl<W: Write + Send> ConsoleLogger<W> {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            console: Mutex::new(RefCell::new(None)),
            level,
        }
    }

    pub fn attach(&self, console: W) {
        critical_section::with(|cs| self.console.borrow_ref_mut(cs).replace(console));
    }

    pub fn detach(&self) -> Option<W> {
        critical_section::with(|cs| self.console.borrow_ref_mut(cs).take())
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Unformatted text straight to the console, bypassing level filtering.
    pub fn print(&self, args: fmt::Arguments<'_>) -> fmt::Result {
        critical_section::with(|cs| match self.console.borrow_ref_mut(cs).as_mut() {
            Some(console) => console.write_fmt(args),
            None => Ok(()),
        })
    }
}

impl<W: Write + Send> Log for ConsoleLogger<W> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut line = heapless::String::<LINE_CAPACITY>::new();
        // overflow only truncates the line
        let _ = writeln!(line, "[{}] {}", record.level(), record.args());

        critical_section::with(|cs| {
            if let Some(console) = self.console.borrow_ref_mut(cs).as_mut() {
                let _ = console.write_str(&line);
            }
        });
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    #[derive(Default)]
    struct Capture(heapless::String<256>);

    impl Write for Capture {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.0.push_str(s).map_err(|_| fmt::Error)
        }
    }

    fn emit(logger: &ConsoleLogger<Capture>, level: Level, args: fmt::Arguments<'_>) {
        logger.log(&Record::builder().level(level).args(args).build());
    }

    #[test]
    fn filters_by_level() {
        let logger = ConsoleLogger::<Capture>::new(LevelFilter::Info);
        logger.attach(Capture::default());

        emit(&logger, Level::Info, format_args!("begin {}", 1));
        emit(&logger, Level::Debug, format_args!("hidden"));

        let out = logger.detach().unwrap();
        assert_eq!(out.0.as_str(), "[INFO] begin 1\n");
    }

    #[test]
    fn silent_without_console() {
        let logger = ConsoleLogger::<Capture>::new(LevelFilter::Trace);
        emit(&logger, Level::Error, format_args!("lost"));
        assert!(logger.print(format_args!("lost too")).is_ok());
        assert!(logger.detach().is_none());
    }

    #[test]
    fn print_is_unfiltered() {
        let logger = ConsoleLogger::<Capture>::new(LevelFilter::Off);
        logger.attach(Capture::default());
        logger.print(format_args!("report\n")).unwrap();
        assert_eq!(logger.detach().unwrap().0.as_str(), "report\n");
    }
}
