mod handler;

pub mod init;

pub use handler::Handler;
