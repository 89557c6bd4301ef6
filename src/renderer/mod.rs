//! The abstract render-backend contract (§4.6) and its reference
//! implementation.

pub mod backend;
pub mod mock_backend;

pub use backend::{
    build_draw_list, DrawListRecord, RenderBackend, RenderCamera, RenderGeometryHandle,
    RenderMaterialHandle, RenderSamplerHandle, RenderTextureHandle,
};
pub use mock_backend::MockBackend;
