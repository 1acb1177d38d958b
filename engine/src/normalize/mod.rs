// Column resolution, value coercion and the record transforms built on them.
pub mod resolver;
pub mod transform;
pub mod value;
