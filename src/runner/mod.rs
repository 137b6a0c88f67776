pub mod checkpoint;
pub mod orchestrator;
