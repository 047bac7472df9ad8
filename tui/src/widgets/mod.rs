//! Ready-made elements

mod text_block;

pub use text_block::TextBlock;
