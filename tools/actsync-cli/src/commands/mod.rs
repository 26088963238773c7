pub mod align;
pub mod check;
pub mod marker;
pub mod normalize;
