pub mod kind;

pub use symcode_error::Error;
