use crate::aba::BipolarABAFramework;
use anyhow::{Context, Result};
use std::{fmt::Display, io::Write};

/// The type of callback functions to call when warnings are raised while parsing a framework.
///
/// The first parameter is the line number (starting at 1), the second one the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read bipolar ABA frameworks.
pub trait InstanceReader {
    /// Reads a [`BipolarABAFramework`].
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    ///
    /// # Example
    ///
    /// ```
    /// # use crubaba::aba::BipolarABAFramework;
    /// # use crubaba::io::{BundleReader, InstanceReader};
    /// fn read_framework_from_str(s: &str) -> BipolarABAFramework {
    ///     let reader = BundleReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid bundle")
    /// }
    /// # read_framework_from_str("p baba\na a\nc a not_a\n");
    /// ```
    fn read(&self, reader: &mut dyn std::io::Read) -> Result<BipolarABAFramework>;

    /// Adds a callback function to call when warnings are raised while parsing a framework.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write responses to problems.
pub trait ResponseWriter {
    /// Writes the text associated with the fact the problem has no extension.
    fn write_no_extension(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes a single extension, given the keys of its members.
    fn write_single_extension(&self, writer: &mut dyn Write, extension: &[&str]) -> Result<()>;

    /// Writes a collection of extensions, given the keys of their members.
    ///
    /// If the collection is empty, [write_no_extension](Self::write_no_extension) is called.
    fn write_extensions(&self, writer: &mut dyn Write, extensions: &[Vec<&str>]) -> Result<()> {
        if extensions.is_empty() {
            return self.write_no_extension(writer);
        }
        extensions
            .iter()
            .try_for_each(|e| self.write_single_extension(writer, e))
    }

    /// Writes an extension along with its size.
    fn write_sized_extension(&self, writer: &mut dyn Write, extension: &[&str]) -> Result<()>;

    /// Writes an acceptance status.
    fn write_acceptance_status(&self, writer: &mut dyn Write, acceptance_status: bool)
        -> Result<()>;

    /// Writes the text rendering of an explanation.
    fn write_explanation(&self, writer: &mut dyn Write, explanation: &dyn Display) -> Result<()> {
        let context = "while writing an explanation";
        writeln!(writer, "{}", explanation).context(context)?;
        writer.flush().context(context)
    }
}

pub(crate) fn write_no_extension(writer: &mut dyn Write) -> Result<()> {
    let context = "while writing problem has no extension";
    writeln!(writer, "NO").context(context)?;
    writer.flush().context(context)
}

pub(crate) fn write_acceptance_status(
    writer: &mut dyn Write,
    acceptance_status: bool,
) -> Result<()> {
    let context = "while writing an acceptance_status";
    writeln!(writer, "{}", if acceptance_status { "YES" } else { "NO" }).context(context)?;
    writer.flush().context(context)
}
