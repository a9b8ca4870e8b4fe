pub mod crypto;
pub mod header;

pub use crypto::{align_up, FrameCipher, BLOCK_MASK, BLOCK_SIZE};
pub use header::{Header, HEADER_LEN, ID_LEN, IO_BUF_LEN};
