pub mod impl_static;
pub mod interface;
