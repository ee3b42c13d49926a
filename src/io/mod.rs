pub mod config_io;
pub mod sketch_io;
