pub mod field_record;
pub mod loader;
