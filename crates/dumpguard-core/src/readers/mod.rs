mod csv_reader;

pub use csv_reader::{read_csv_file, read_csv_table, DEFAULT_BATCH_SIZE};
