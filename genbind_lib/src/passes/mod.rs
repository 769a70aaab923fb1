pub mod bind;
pub mod map_type;
pub mod rename;
