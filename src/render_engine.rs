//! The render thread handoff (§4.5): a double binary-semaphore
//! rendezvous between the game thread and a dedicated render thread,
//! driving [`RenderScene`]'s Stage 1/Stage 2 split each frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::renderer::RenderBackend;
use crate::render_scene::RenderScene;
use crate::scene::SceneGraph;

/// A binary semaphore built on `Condvar`/`Mutex<bool>`, standing in
/// for the OS semaphore the thread handoff is specified against.
struct BinarySemaphore {
    lock: Mutex<bool>,
    condvar: Condvar,
}

impl BinarySemaphore {
    fn new(initially_available: bool) -> Self {
        Self { lock: Mutex::new(initially_available), condvar: Condvar::new() }
    }

    fn acquire(&self) {
        let mut available = self.lock.lock().unwrap();
        while !*available {
            available = self.condvar.wait(available).unwrap();
        }
        *available = false;
    }

    fn release(&self) {
        let mut available = self.lock.lock().unwrap();
        *available = true;
        self.condvar.notify_one();
    }
}

/// Shared state reachable from both the game thread and the render
/// thread without plumbing it through every call.
struct SharedState {
    caller_semaphore: BinarySemaphore,
    render_semaphore: BinarySemaphore,
    running: AtomicBool,
    render_waiting: AtomicBool,
    render_scene: Mutex<RenderScene>,
    backend: Mutex<Box<dyn RenderBackend>>,
}

/// Owns the render thread and drives the per-frame game-thread side
/// of the handoff protocol (§4.5).
pub struct RenderEngine {
    shared: Arc<SharedState>,
    render_thread: Option<JoinHandle<()>>,
}

impl RenderEngine {
    /// Take ownership of `backend`, spawn the render thread, and
    /// start the loop described in §4.5.
    pub fn new(mut backend: Box<dyn RenderBackend>) -> Self {
        backend.initialize_context();
        let shared = Arc::new(SharedState {
            caller_semaphore: BinarySemaphore::new(false),
            render_semaphore: BinarySemaphore::new(true),
            running: AtomicBool::new(true),
            render_waiting: AtomicBool::new(false),
            render_scene: Mutex::new(RenderScene::new()),
            backend: Mutex::new(backend),
        });

        let render_thread_shared = shared.clone();
        let render_thread = std::thread::spawn(move || Self::render_thread_main(render_thread_shared));

        Self { shared, render_thread: Some(render_thread) }
    }

    /// Game thread, one call per frame (§4.5 `submit_frame`):
    /// update the graph's transforms, run render-scene Stage 1, then
    /// hand the frame off to the render thread.
    pub fn submit_frame(&self, graph: &mut SceneGraph) {
        self.shared.render_semaphore.acquire();

        graph.update_transforms();
        {
            let mut render_scene = self.shared.render_scene.lock().unwrap();
            render_scene.update_stage1(graph);
        }

        self.shared.caller_semaphore.release();
    }

    fn render_thread_main(shared: Arc<SharedState>) {
        while shared.running.load(Ordering::Acquire) {
            shared.render_waiting.store(true, Ordering::Release);
            shared.caller_semaphore.acquire();
            shared.render_waiting.store(false, Ordering::Release);

            if !shared.running.load(Ordering::Acquire) {
                break;
            }

            let mut backend = shared.backend.lock().unwrap();
            let mut render_scene = shared.render_scene.lock().unwrap();
            render_scene.update_stage2(backend.as_mut());
            let camera = render_scene.render_camera();
            backend.render(&camera, render_scene.render_bundles());
            backend.swap_buffers();

            shared.render_semaphore.release();
        }
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if self.shared.render_waiting.load(Ordering::Acquire) {
            self.shared.caller_semaphore.release();
        }
        if let Some(handle) = self.render_thread.take() {
            let _ = handle.join();
        }
        self.shared.backend.lock().unwrap().destroy_context();
    }
}

#[cfg(test)]
#[path = "render_engine_tests.rs"]
mod tests;
