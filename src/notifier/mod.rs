pub mod interface;
pub mod recording;
pub mod terminal;
