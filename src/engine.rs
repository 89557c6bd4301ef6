//! Ember Engine - singleton manager for engine-wide subsystems.
//!
//! Provides global access to the logger and the resource caches (geometry,
//! texture, material, sampler) using thread-safe static storage. The render
//! thread and the game thread both reach these caches through `Engine`
//! rather than through parameters threaded down every call, mirroring how
//! the render-thread handoff in [`crate::render_engine`] reaches them.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;

use crate::cache::{GeometryCache, TextureCache, MaterialCache, SamplerCache};
use crate::error::{EngineResult, EngineError};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct EngineState {
    geometry_cache: RwLock<Option<Arc<Mutex<GeometryCache>>>>,
    texture_cache: RwLock<Option<Arc<Mutex<TextureCache>>>>,
    material_cache: RwLock<Option<Arc<Mutex<MaterialCache>>>>,
    sampler_cache: RwLock<Option<Arc<Mutex<SamplerCache>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            geometry_cache: RwLock::new(None),
            texture_cache: RwLock::new(None),
            material_cache: RwLock::new(None),
            sampler_cache: RwLock::new(None),
        }
    }
}

/// Process-wide singleton manager for the logger and resource caches.
pub struct Engine;

impl Engine {
    fn log_and_return_error(error: EngineError) -> EngineError {
        crate::engine_error!("ember::Engine", "{}", error);
        error
    }

    /// Initialize the engine. Must be called once at application startup
    /// before creating any cache.
    pub fn initialize() -> EngineResult<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shut down the engine and destroy every cache singleton.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            // Material cache references geometry/texture cache handles, clear it first.
            if let Ok(mut mc) = state.material_cache.write() {
                *mc = None;
            }
            if let Ok(mut tc) = state.texture_cache.write() {
                *tc = None;
            }
            if let Ok(mut gc) = state.geometry_cache.write() {
                *gc = None;
            }
            if let Ok(mut sc) = state.sampler_cache.write() {
                *sc = None;
            }
        }
    }

    // ===== GEOMETRY CACHE =====

    /// Create and register the geometry cache singleton.
    pub fn create_geometry_cache(cache: GeometryCache) -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed(
                "Engine not initialized. Call Engine::initialize() first.".to_string(),
            ))
        })?;

        let mut lock = state.geometry_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("geometry cache lock poisoned".to_string()))
        })?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(EngineError::InitializationFailed(
                "geometry cache already exists".to_string(),
            )));
        }

        *lock = Some(Arc::new(Mutex::new(cache)));
        crate::engine_info!("ember::Engine", "geometry cache created");
        Ok(())
    }

    /// Get the geometry cache singleton.
    pub fn geometry_cache() -> EngineResult<Arc<Mutex<GeometryCache>>> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let lock = state.geometry_cache.read().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("geometry cache lock poisoned".to_string()))
        })?;
        lock.clone().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("geometry cache not created".to_string()))
        })
    }

    /// Destroy the geometry cache singleton.
    pub fn destroy_geometry_cache() -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.geometry_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("geometry cache lock poisoned".to_string()))
        })?;
        *lock = None;
        Ok(())
    }

    // ===== TEXTURE CACHE =====

    /// Create and register the texture cache singleton.
    pub fn create_texture_cache(cache: TextureCache) -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.texture_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("texture cache lock poisoned".to_string()))
        })?;
        if lock.is_some() {
            return Err(Self::log_and_return_error(EngineError::InitializationFailed(
                "texture cache already exists".to_string(),
            )));
        }
        *lock = Some(Arc::new(Mutex::new(cache)));
        crate::engine_info!("ember::Engine", "texture cache created");
        Ok(())
    }

    /// Get the texture cache singleton.
    pub fn texture_cache() -> EngineResult<Arc<Mutex<TextureCache>>> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let lock = state.texture_cache.read().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("texture cache lock poisoned".to_string()))
        })?;
        lock.clone().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("texture cache not created".to_string()))
        })
    }

    /// Destroy the texture cache singleton.
    pub fn destroy_texture_cache() -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.texture_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("texture cache lock poisoned".to_string()))
        })?;
        *lock = None;
        Ok(())
    }

    // ===== MATERIAL CACHE =====

    /// Create and register the material cache singleton.
    pub fn create_material_cache(cache: MaterialCache) -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.material_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("material cache lock poisoned".to_string()))
        })?;
        if lock.is_some() {
            return Err(Self::log_and_return_error(EngineError::InitializationFailed(
                "material cache already exists".to_string(),
            )));
        }
        *lock = Some(Arc::new(Mutex::new(cache)));
        crate::engine_info!("ember::Engine", "material cache created");
        Ok(())
    }

    /// Get the material cache singleton.
    pub fn material_cache() -> EngineResult<Arc<Mutex<MaterialCache>>> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let lock = state.material_cache.read().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("material cache lock poisoned".to_string()))
        })?;
        lock.clone().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("material cache not created".to_string()))
        })
    }

    /// Destroy the material cache singleton.
    pub fn destroy_material_cache() -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.material_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("material cache lock poisoned".to_string()))
        })?;
        *lock = None;
        Ok(())
    }

    // ===== SAMPLER CACHE =====

    /// Create and register the sampler cache singleton.
    pub fn create_sampler_cache(cache: SamplerCache) -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.sampler_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("sampler cache lock poisoned".to_string()))
        })?;
        if lock.is_some() {
            return Err(Self::log_and_return_error(EngineError::InitializationFailed(
                "sampler cache already exists".to_string(),
            )));
        }
        *lock = Some(Arc::new(Mutex::new(cache)));
        crate::engine_info!("ember::Engine", "sampler cache created");
        Ok(())
    }

    /// Get the sampler cache singleton.
    pub fn sampler_cache() -> EngineResult<Arc<Mutex<SamplerCache>>> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let lock = state.sampler_cache.read().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("sampler cache lock poisoned".to_string()))
        })?;
        lock.clone().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("sampler cache not created".to_string()))
        })
    }

    /// Destroy the sampler cache singleton.
    pub fn destroy_sampler_cache() -> EngineResult<()> {
        let state = ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(EngineError::InitializationFailed("engine not initialized".to_string()))
        })?;
        let mut lock = state.sampler_cache.write().map_err(|_| {
            Self::log_and_return_error(EngineError::BackendError("sampler cache lock poisoned".to_string()))
        })?;
        *lock = None;
        Ok(())
    }

    /// Reset all singletons. Test builds only.
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut mc) = state.material_cache.write() {
                *mc = None;
            }
            if let Ok(mut tc) = state.texture_cache.write() {
                *tc = None;
            }
            if let Ok(mut gc) = state.geometry_cache.write() {
                *gc = None;
            }
            if let Ok(mut sc) = state.sampler_cache.write() {
                *sc = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Install a custom logger.
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset the logger to [`DefaultLogger`].
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log a message without file:line information. Used by `engine_trace!`/`engine_debug!`/`engine_info!`/`engine_warn!`.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log a message with file:line information. Used by `engine_error!`.
    pub fn log_detailed(severity: LogSeverity, source: &str, message: String, file: &'static str, line: u32) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
