pub mod result_store;
pub mod table_reader;
