pub mod route;
pub mod simplify;
pub mod terrain;
