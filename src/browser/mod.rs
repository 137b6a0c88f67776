pub mod driver;
pub mod error;
pub mod mock;
pub mod session;
