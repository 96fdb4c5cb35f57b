use std::sync::mpsc;
use std::thread;

use anyhow::anyhow;

use crate::foundation::error::{ChromaplaneError, ChromaplaneResult};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Owns the single designated rendering thread.
///
/// Canvas construction and content rasterization must run on one thread; this
/// executor makes that contract explicit. Closures run to completion in
/// submission order, and results are sent back to the caller. Canvases cannot
/// escape the closure because they are not `Send`.
pub struct RenderThread {
    tx: Option<mpsc::Sender<Job>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl RenderThread {
    /// Spawn the rendering thread.
    pub fn spawn() -> ChromaplaneResult<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name("chromaplane-render".to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
            })
            .map_err(|e| {
                ChromaplaneError::Other(anyhow::Error::new(e).context("spawn rendering thread"))
            })?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Run `f` on the rendering thread and block until it completes.
    pub fn run<R, F>(&self, f: F) -> ChromaplaneResult<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (done_tx, done_rx) = mpsc::channel::<R>();
        let job: Job = Box::new(move || {
            let _ = done_tx.send(f());
        });
        self.tx
            .as_ref()
            .ok_or_else(|| ChromaplaneError::Other(anyhow!("rendering thread is shut down")))?
            .send(job)
            .map_err(|_| ChromaplaneError::Other(anyhow!("rendering thread is gone")))?;
        done_rx.recv().map_err(|_| {
            ChromaplaneError::Other(anyhow!(
                "rendering thread terminated before completing the task"
            ))
        })
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/render_thread.rs"]
mod tests;
