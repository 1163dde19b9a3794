pub mod address;
pub mod eta;

pub use address::{join_full_address, join_street, needs_update};
pub use eta::estimate_remaining;
