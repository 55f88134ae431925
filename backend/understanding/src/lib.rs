pub mod ocr;
pub mod vision;

pub use ocr::{is_ocr_error, OcrClient};
pub use vision::{parse_model_reply, VisionClient};
