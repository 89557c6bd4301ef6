//! A growable, range-allocated buffer pool shared by a backend's
//! per-layout vertex buckets and its index buffer (§3.9/§4.6).

pub mod dynamic_gpu_array;

pub use dynamic_gpu_array::{BufferRange, DynamicGpuArray, CAPACITY_INCREMENT};
