use super::ResponseWriter;
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the line-based text output of the command line tool.
///
/// More precisely, the answers to problems are written this way:
///   * extension: the letter `w`, followed by a space and the list of assumption keys, splitted by spaces
///   * extension with its size: the letter `s`, followed by the size and the list of assumption keys
///   * absence of extension: `NO`
///   * acceptance status: `YES` and `NO`
///   * explanations: their text rendering
#[derive(Default)]
pub struct TextWriter;

fn write_keys(
    writer: &mut dyn Write,
    prefix: &str,
    keys: &[&str],
    context: &'static str,
) -> Result<()> {
    write!(writer, "{}", prefix).context(context)?;
    keys.iter()
        .try_for_each(|k| write!(writer, " {}", k).context(context))?;
    writeln!(writer).context(context)?;
    writer.flush().context(context)
}

impl ResponseWriter for TextWriter {
    fn write_no_extension(&self, writer: &mut dyn Write) -> Result<()> {
        super::specs::write_no_extension(writer)
    }

    fn write_single_extension(&self, writer: &mut dyn Write, extension: &[&str]) -> Result<()> {
        write_keys(writer, "w", extension, "while writing an extension")
    }

    fn write_sized_extension(&self, writer: &mut dyn Write, extension: &[&str]) -> Result<()> {
        write_keys(
            writer,
            &format!("s {}", extension.len()),
            extension,
            "while writing an extension and its size",
        )
    }

    fn write_acceptance_status(
        &self,
        writer: &mut dyn Write,
        acceptance_status: bool,
    ) -> Result<()> {
        super::specs::write_acceptance_status(writer, acceptance_status)
    }
}
