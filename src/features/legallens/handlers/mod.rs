pub mod legal_lens_handler;

pub use legal_lens_handler::*;
