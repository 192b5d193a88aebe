pub mod transport;
pub mod storage;
