//! Camera stream lifecycle.
//!
//! [`CaptureManager`] holds at most one live stream. Every stream it
//! successfully opens is stopped exactly once: by [`close`], by
//! [`switch_facing`] (the old stream), after a successful [`capture`],
//! or when the manager is dropped. Ownership always transfers
//! stop-then-open.
//!
//! Operations may interleave (a facing switch while a capture is
//! reading its frame). A capture works against the stream that was live
//! when it was invoked, across facing switches. A close or a new open
//! discards it: the capture stops only its own stream and yields no
//! image. An open that completes after a later close or switch stops
//! its own stream and reports [`CaptureError::Superseded`].
//!
//! [`close`]: CaptureManager::close
//! [`switch_facing`]: CaptureManager::switch_facing
//! [`capture`]: CaptureManager::capture

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mirror_core::image::StillImage;
use tokio::sync::Mutex;

use crate::device::{Facing, LiveStream, MediaDeviceProvider, StreamConstraints};
use crate::error::CaptureError;
use crate::frame::{frame_to_still, CaptureConfig};

/// Externally visible capture session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    Inactive,
    /// Waiting for the device to grant a stream.
    Opening,
    /// A stream is live and previewing.
    Active,
    /// Old stream stopped, new facing not yet granted. Captures no-op.
    Switching,
}

/// A granted stream plus the stop-once latch.
struct StreamHandle {
    id: u64,
    facing: Facing,
    stream: Box<dyn LiveStream>,
    stopped: AtomicBool,
}

impl StreamHandle {
    /// Stop the stream. Returns `false` if it was already stopped.
    fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.stream.stop();
        tracing::debug!(stream_id = self.id, facing = self.facing.as_str(), "Camera stream stopped");
        true
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

enum Phase {
    Inactive,
    Opening,
    Active(Arc<StreamHandle>),
    Switching,
}

struct CaptureState {
    phase: Phase,
    facing: Facing,
    /// Bumped by every operation that invalidates in-flight opens.
    epoch: u64,
    /// Bumped by `open`, `close` and a successful capture. A facing
    /// switch keeps the session.
    session: u64,
    next_stream_id: u64,
}

impl CaptureState {
    /// Detach the live stream (if any) and invalidate pending opens.
    fn detach(&mut self, next: Phase) -> Option<Arc<StreamHandle>> {
        self.epoch += 1;
        match std::mem::replace(&mut self.phase, next) {
            Phase::Active(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Owns the device camera stream for one capture session.
pub struct CaptureManager {
    provider: Arc<dyn MediaDeviceProvider>,
    config: CaptureConfig,
    state: Mutex<CaptureState>,
}

impl CaptureManager {
    pub fn new(provider: Arc<dyn MediaDeviceProvider>, config: CaptureConfig) -> Self {
        Self {
            provider,
            config,
            state: Mutex::new(CaptureState {
                phase: Phase::Inactive,
                facing: Facing::default(),
                epoch: 0,
                session: 0,
                next_stream_id: 1,
            }),
        }
    }

    pub async fn status(&self) -> CaptureStatus {
        match self.state.lock().await.phase {
            Phase::Inactive => CaptureStatus::Inactive,
            Phase::Opening => CaptureStatus::Opening,
            Phase::Active(_) => CaptureStatus::Active,
            Phase::Switching => CaptureStatus::Switching,
        }
    }

    pub async fn is_active(&self) -> bool {
        self.status().await == CaptureStatus::Active
    }

    /// Facing of the live stream, or of the next one to be opened.
    pub async fn facing(&self) -> Facing {
        self.state.lock().await.facing
    }

    /// Request a live stream for `facing`.
    ///
    /// Any stream already live is stopped first. On failure the session
    /// stays inactive and [`CaptureError::CameraUnavailable`] is returned;
    /// the caller should offer file-based acquisition instead of retrying.
    pub async fn open(&self, facing: Facing) -> Result<(), CaptureError> {
        let (previous, epoch) = {
            let mut state = self.state.lock().await;
            let previous = state.detach(Phase::Opening);
            state.session += 1;
            state.facing = facing;
            (previous, state.epoch)
        };
        if let Some(previous) = previous {
            previous.stop();
        }
        self.attach(epoch, facing).await
    }

    /// Stop the live stream, flip the facing, and open the other camera.
    pub async fn switch_facing(&self) -> Result<(), CaptureError> {
        let (previous, epoch, facing) = {
            let mut state = self.state.lock().await;
            if !matches!(state.phase, Phase::Active(_)) {
                return Err(CaptureError::NotActive);
            }
            let previous = state.detach(Phase::Switching);
            state.facing = state.facing.flipped();
            (previous, state.epoch, state.facing)
        };
        if let Some(previous) = previous {
            previous.stop();
        }
        tracing::info!(facing = facing.as_str(), "Switching camera facing");
        self.attach(epoch, facing).await
    }

    /// Capture the current frame as a still image and end the session.
    ///
    /// Returns `Ok(None)` without changing state when no frame can be
    /// taken right now (a facing switch or open is in flight, the stream
    /// was stopped underneath this capture, or the session was closed or
    /// reopened while the frame was being read).
    pub async fn capture(&self) -> Result<Option<StillImage>, CaptureError> {
        let (handle, session) = {
            let state = self.state.lock().await;
            match &state.phase {
                Phase::Active(handle) => (Arc::clone(handle), state.session),
                Phase::Opening | Phase::Switching => return Ok(None),
                Phase::Inactive => return Err(CaptureError::NotActive),
            }
        };

        let frame = match handle.stream.read_frame().await {
            Ok(frame) => frame,
            Err(_) if handle.is_stopped() => {
                tracing::debug!(stream_id = handle.id, "Capture raced a stream stop, ignoring");
                return Ok(None);
            }
            Err(e) => return Err(CaptureError::Frame(e)),
        };

        // The facing of the stream the frame came from decides mirroring,
        // not whatever the session switched to meanwhile.
        let facing = handle.facing;
        let encoding = self.config.encoding;
        let still = tokio::task::spawn_blocking(move || frame_to_still(frame, facing, encoding))
            .await
            .map_err(|e| CaptureError::Encode(e.to_string()))??;

        let current = {
            let mut state = self.state.lock().await;
            if state.session != session {
                drop(state);
                handle.stop();
                tracing::debug!(stream_id = handle.id, "Capture outlived its session, discarding");
                return Ok(None);
            }
            state.session += 1;
            state.detach(Phase::Inactive)
        };
        handle.stop();
        if let Some(current) = current {
            current.stop();
        }

        tracing::info!(
            stream_id = handle.id,
            facing = facing.as_str(),
            bytes = still.len(),
            "Captured still image",
        );
        Ok(Some(still))
    }

    /// Stop the live stream (if any) and deactivate.
    pub async fn close(&self) {
        let previous = {
            let mut state = self.state.lock().await;
            state.session += 1;
            state.detach(Phase::Inactive)
        };
        if let Some(previous) = previous {
            previous.stop();
        }
    }

    // ---- private helpers ----

    /// Ask the provider for a stream and install it if `epoch` is still
    /// current.
    async fn attach(&self, epoch: u64, facing: Facing) -> Result<(), CaptureError> {
        let constraints = StreamConstraints::for_facing(facing);
        let result = self.provider.open(&constraints).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(stream) => {
                let id = state.next_stream_id;
                state.next_stream_id += 1;
                let handle = Arc::new(StreamHandle {
                    id,
                    facing,
                    stream,
                    stopped: AtomicBool::new(false),
                });

                if state.epoch != epoch {
                    drop(state);
                    handle.stop();
                    tracing::debug!(stream_id = id, "Discarding stream from superseded open");
                    return Err(CaptureError::Superseded);
                }

                state.phase = Phase::Active(handle);
                tracing::info!(stream_id = id, facing = facing.as_str(), "Camera stream opened");
                Ok(())
            }
            Err(e) => {
                if state.epoch == epoch {
                    state.phase = Phase::Inactive;
                }
                tracing::warn!(error = %e, facing = facing.as_str(), "Camera unavailable");
                Err(CaptureError::CameraUnavailable(e))
            }
        }
    }
}
