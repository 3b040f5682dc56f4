mod huggingface;

pub use huggingface::HuggingFaceLlm;
