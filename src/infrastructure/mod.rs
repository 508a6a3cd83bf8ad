pub mod csv_source;
pub mod local_file_sink;
