pub mod block;
pub mod key;
pub mod spawn;
