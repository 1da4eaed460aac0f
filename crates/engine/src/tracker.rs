//! Tracker: owns the camera workers
//!
//! The tracker spawns one named thread per camera and keeps a handle with
//! the camera's stop flag. Releasing a camera sets the flag; the worker
//! finishes its current tick, releases its frame source and exits.
//! [`Tracker::shutdown`] releases every camera and joins every worker.

use crate::alert::AlertDispatcher;
use crate::perception::{FrameSource, Perception};
use crate::worker::{CameraWorker, WorkerContext};
use backtrack_core::{CameraId, Error, Result};
use backtrack_primitives::{EmbeddingStore, Timeline};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Stop flag and thread of one running camera
pub struct CameraHandle {
    camera: CameraId,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CameraHandle {
    /// Camera id
    pub fn camera(&self) -> CameraId {
        self.camera
    }

    /// Ask the worker to stop after its current tick
    pub fn release(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Whether the worker thread is still running
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!(camera = %self.camera, "camera worker panicked");
            }
        }
    }
}

/// Runs camera workers against shared stores
pub struct Tracker {
    context: WorkerContext,
    cameras: Mutex<Vec<CameraHandle>>,
}

impl Tracker {
    /// Tracker writing to the given stores
    pub fn new(
        embeddings: Arc<EmbeddingStore>,
        timeline: Arc<Timeline>,
        alerts: Arc<AlertDispatcher>,
        proximity_threshold: f32,
    ) -> Self {
        Self {
            context: WorkerContext {
                embeddings,
                timeline,
                alerts,
                proximity_threshold,
            },
            cameras: Mutex::new(Vec::new()),
        }
    }

    /// Stores shared with the workers
    pub fn context(&self) -> &WorkerContext {
        &self.context
    }

    /// Start a worker thread for `camera`.
    ///
    /// # Errors
    /// - `InvalidInput` if a worker for this camera is still running
    /// - `Io` if the thread cannot be spawned
    pub fn start_camera<S, P>(&self, camera: CameraId, source: S, perception: P) -> Result<()>
    where
        S: FrameSource + 'static,
        P: Perception<S::Frame> + 'static,
    {
        let mut cameras = self.cameras.lock();
        if cameras.iter().any(|h| h.camera == camera && h.is_running()) {
            return Err(Error::invalid_input(format!(
                "camera {} is already being tracked",
                camera
            )));
        }
        // Reap finished workers for this id
        cameras.retain_mut(|h| {
            if h.camera == camera {
                h.join();
                false
            } else {
                true
            }
        });

        let stop = Arc::new(AtomicBool::new(false));
        let worker = CameraWorker::new(
            camera,
            source,
            perception,
            self.context.clone(),
            Arc::clone(&stop),
        );
        let thread = thread::Builder::new()
            .name(format!("camera-{}", camera))
            .spawn(move || worker.run())?;

        cameras.push(CameraHandle {
            camera,
            stop,
            thread: Some(thread),
        });
        info!(camera = %camera, "tracking started");
        Ok(())
    }

    /// Release one camera; returns false if it was never started
    pub fn release(&self, camera: CameraId) -> bool {
        let cameras = self.cameras.lock();
        let mut found = false;
        for handle in cameras.iter().filter(|h| h.camera == camera) {
            handle.release();
            found = true;
        }
        found
    }

    /// Cameras whose workers are running
    pub fn cameras(&self) -> Vec<CameraId> {
        self.cameras
            .lock()
            .iter()
            .filter(|h| h.is_running())
            .map(CameraHandle::camera)
            .collect()
    }

    /// Whether any worker is running
    pub fn is_tracking(&self) -> bool {
        self.cameras.lock().iter().any(CameraHandle::is_running)
    }

    /// Release every camera and wait for its worker to exit.
    pub fn shutdown(&self) {
        let mut handles = std::mem::take(&mut *self.cameras.lock());
        if handles.is_empty() {
            return;
        }
        for handle in &handles {
            handle.release();
        }
        for handle in &mut handles {
            handle.join();
        }
        info!(cameras = handles.len(), "tracker shut down");
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
