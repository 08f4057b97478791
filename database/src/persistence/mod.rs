pub mod slot;
pub mod storage;
