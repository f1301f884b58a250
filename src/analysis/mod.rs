// Analysis module - acoustic feature extraction
//
// Pipeline: PcmBuffer (channel 0) → temporal features (RMS, ZCR)
//                                  → framed FFT → spectral centroid
//           → FeatureRecord

pub mod features;

pub use features::{FeatureExtractor, FeatureRecord};
