//! UIコンポーネント

pub mod entry;
pub mod filter_bar;
pub mod header;
pub mod loading;
