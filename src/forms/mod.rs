pub mod field;
pub mod rules;
pub mod submit;
pub mod upload;
