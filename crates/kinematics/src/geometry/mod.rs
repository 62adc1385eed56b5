pub mod bounds;
pub mod curves;
pub mod point;
pub mod vector;
