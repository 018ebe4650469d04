pub mod polyline;
pub mod stream;
