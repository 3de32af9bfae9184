//! Writer that only emits output on one designated rank.

use std::io::{self, Write};

/// Forwards writes to `inner` on the root rank and swallows them elsewhere.
///
/// Writes on non-root ranks still report the full length as written so
/// `writeln!` and friends behave identically on every rank.
#[derive(Debug)]
pub struct RootOnly<W> {
    inner: W,
    active: bool,
}

impl<W: Write> RootOnly<W> {
    pub fn new(inner: W, my_rank: usize, root: usize) -> Self {
        Self {
            inner,
            active: my_rank == root,
        }
    }

    /// True on the rank whose output is kept.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for RootOnly<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.active {
            self.inner.write(buf)
        } else {
            Ok(buf.len())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.active {
            self.inner.flush()
        } else {
            Ok(())
        }
    }
}
