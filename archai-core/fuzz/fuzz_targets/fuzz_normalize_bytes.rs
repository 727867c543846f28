#![no_main]

//! Fuzz target for ImageNormalizer::normalize_bytes()
//!
//! Uploaded files are untrusted. Decoding and resizing must reject bad input
//! with an error, never a panic, and any tensor produced must be 256x256x1
//! with every value in [0, 1].
//!
//! Run with: cargo +nightly fuzz run fuzz_normalize_bytes

use archai_core::{ImageNormalizer, TENSOR_HEIGHT, TENSOR_WIDTH};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(tensor) = ImageNormalizer::new().normalize_bytes(data) {
        assert_eq!(tensor.as_slice().len(), TENSOR_HEIGHT * TENSOR_WIDTH);
        assert!(tensor.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }
});
