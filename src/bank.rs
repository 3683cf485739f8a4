pub mod bank;
pub mod matcher;
pub mod slots;
pub mod store;
pub mod sync;
pub mod synergy;
