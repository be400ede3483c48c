//! Objects used to read and write argumentation theories and the results of their evaluations.

mod aspic_reader;
pub use aspic_reader::AspicReader;

mod aspic_writer;
pub use aspic_writer::AspicWriter;

mod json_reader;
pub use json_reader::JsonReader;

mod response_writers;
pub use response_writers::JsonWriter;
pub use response_writers::TextWriter;

mod specs;
pub use specs::ResponseWriter;
pub use specs::TheoryReader;
pub use specs::WarningHandler;

mod warning_result;
