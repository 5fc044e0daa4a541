//! Objects used to read bipolar ABA frameworks and write answers to problems.

mod bundle_reader;
pub use bundle_reader::BundleReader;

mod specs;
pub use specs::InstanceReader;
pub use specs::ResponseWriter;
pub use specs::WarningHandler;

mod text_writer;
pub use text_writer::TextWriter;
