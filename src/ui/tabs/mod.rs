pub mod artist;
pub mod roster;
