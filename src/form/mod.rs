pub mod block_model;
pub mod classifier;
pub mod date;
pub mod filler;
pub mod outcome;
