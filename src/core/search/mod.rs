pub mod autocomplete;
pub mod fuzzy;
