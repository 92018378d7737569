//! Shared utility functions for quant-forge.

pub mod json_extraction;

pub use json_extraction::{
    extract_json_object, find_matching_brace, strip_code_fences, try_extract_json_object,
    JsonExtractionError,
};
