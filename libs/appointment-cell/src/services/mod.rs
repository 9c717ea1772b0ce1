pub mod roster;
pub mod slots;
