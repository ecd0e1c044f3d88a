pub mod catalog;
pub mod http;
pub mod onnx;
pub mod storage;
