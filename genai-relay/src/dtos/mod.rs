pub mod generation;

pub use generation::{GenerateResponse, GenerateTextRequest, UploadedFile};
