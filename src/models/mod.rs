pub mod classification;
pub mod disk;
pub mod server;
