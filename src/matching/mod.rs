pub mod alias;
pub mod fuzzy;
pub mod normalize;
pub mod resolver;
