pub mod attachment;
pub mod direction;
pub mod map_bounds;
pub mod map_object;
pub mod owned;
pub mod position;
pub mod status;
