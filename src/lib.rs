pub mod browser;
pub mod cli;
pub mod form;
pub mod matching;
pub mod record;
pub mod report;
pub mod runner;
pub mod trace;
