pub mod captioner;
pub mod discovery;
pub mod downloader;
pub mod ranking;
pub mod relay;
pub mod scheduling;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
