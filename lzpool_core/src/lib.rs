pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod pool;

pub use decode::decode;
pub use encode::encode;
pub use error::FormatError;
pub use format::{decoded_len, max_encoded_len};
pub use pool::{BufferPool, PooledBuf};
