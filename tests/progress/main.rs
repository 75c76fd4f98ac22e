mod session;
mod storage;
