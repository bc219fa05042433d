use std::{fmt, io};

pub mod guard;
pub mod lifecycle;
pub mod list;
pub mod snapshot;

/// How many instances a mutating command handled successfully and how many failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl CommandSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn record<T>(&mut self, result: &crate::error::Result<T>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Progress output that never interrupts a provider sequence.
///
/// The first write failure is kept and later lines are dropped; callers check
/// it with [`Progress::check`] once an instance has been fully handled.
pub(crate) struct Progress<'a> {
    out: &'a mut dyn io::Write,
    error: Option<io::Error>,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(out: &'a mut dyn io::Write) -> Self {
        Self { out, error: None }
    }

    pub(crate) fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self
            .out
            .write_fmt(args)
            .and_then(|()| self.out.write_all(b"\n"))
        {
            self.error = Some(error);
        }
    }

    pub(crate) fn check(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
