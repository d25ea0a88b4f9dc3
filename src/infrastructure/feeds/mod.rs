pub mod file;
pub mod fixed;
