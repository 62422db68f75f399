use crate::error::Result;
use crate::utils::fs;
use indicatif::DecimalBytes;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Width of the blank run that erases the previous progress line.
const CLEAR_WIDTH: usize = 35;

/// Receives the running byte total while a transfer is in flight.
pub trait ProgressReporter {
    fn update(&mut self, total: u64);

    fn finish(&mut self) {}
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn update(&mut self, total: u64) {
        (**self).update(total)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Discards progress updates.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn update(&mut self, _total: u64) {}
}

/// Single-line progress display, redrawn in place on every update.
pub struct LineProgress<W: Write> {
    out: W,
}

impl<W: Write> LineProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl LineProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressReporter for LineProgress<W> {
    fn update(&mut self, total: u64) {
        // Rendering errors are ignored.
        let _ = write!(
            self.out,
            "\r{}\rDownloading... {} complete",
            " ".repeat(CLEAR_WIDTH),
            DecimalBytes(total)
        );
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
    }
}

/// Writer decorator that counts forwarded bytes and reports the running
/// total after every chunk.
pub struct CountingWriter<W, P> {
    inner: W,
    reporter: P,
    total: u64,
}

impl<W: Write, P: ProgressReporter> CountingWriter<W, P> {
    pub fn new(inner: W, reporter: P) -> Self {
        Self {
            inner,
            reporter,
            total: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn into_parts(self) -> (W, P) {
        (self.inner, self.reporter)
    }
}

impl<W: Write, P: ProgressReporter> Write for CountingWriter<W, P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.total += n as u64;
        self.reporter.update(self.total);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Streams `source` into a fresh file at `destination`, returning the number
/// of bytes written.
///
/// The file is truncated if it exists. On failure the partial file is left
/// behind.
pub fn download_to<R, P>(source: &mut R, destination: &Path, reporter: &mut P) -> Result<u64>
where
    R: Read + ?Sized,
    P: ProgressReporter + ?Sized,
{
    fs::ensure_parent_exists(destination)?;

    let file = File::create(destination)?;
    let mut writer = CountingWriter::new(BufWriter::new(file), &mut *reporter);

    let copied = io::copy(source, &mut writer);
    let flushed = writer.flush();
    let total = writer.total();
    drop(writer);
    reporter.finish();

    copied?;
    flushed?;

    log::debug!("wrote {total} bytes to {}", destination.display());
    Ok(total)
}
