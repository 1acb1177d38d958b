pub mod serializer;

pub use serializer::{export_filename, serialize, ExportTable};
