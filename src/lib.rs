pub mod codec;
pub mod core;
pub mod fifo;
pub mod process;
pub mod send;

// Re-exports for easy access
pub use crate::core::buffer::PixelBuffer;
pub use crate::core::engine::{run, EngineError};
pub use crate::core::queue::{Task, TaskQueue, QMAX};
pub use crate::core::wire::{read_image, write_image, Header, TransferError};
pub use crate::core::FilterMode;
