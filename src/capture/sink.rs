//! Capacity-1 hand-off between a capture backend and the pipeline

use std::time::{Duration, Instant};

use flume::{Receiver, Sender, TrySendError};
use tracing::trace;

use crate::capture::Frame;
use crate::error::{Result, SnapshotError};

/// What happened to a frame handed to [`FrameSink::deliver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// The slot was still occupied; the frame was discarded
    Dropped,
    /// Nobody is listening anymore; the producer should stop
    Closed,
}

/// Producer half, owned by the backend's delivery context
#[derive(Clone)]
pub struct FrameSink {
    tx: Sender<Frame>,
}

/// Consumer half, owned by the pipeline
pub struct FrameReceiver {
    rx: Receiver<Frame>,
}

/// Create a connected sink/receiver pair holding at most `depth` frames
pub fn frame_channel(depth: usize) -> (FrameSink, FrameReceiver) {
    let (tx, rx) = flume::bounded(depth.max(1));
    (FrameSink { tx }, FrameReceiver { rx })
}

impl FrameSink {
    /// Never blocks the delivering thread
    pub fn deliver(&self, frame: Frame) -> Delivery {
        match self.tx.try_send(frame) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(frame)) => {
                trace!(sequence = frame.meta.sequence, "Frame slot occupied, dropping");
                metrics::counter!("monoshot_frames_dropped").increment(1);
                Delivery::Dropped
            }
            Err(TrySendError::Disconnected(_)) => Delivery::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_disconnected()
    }
}

impl FrameReceiver {
    /// Wait for the next delivered frame, at most `timeout`
    pub async fn next_frame(&self, timeout: Duration) -> Result<Frame> {
        let started = Instant::now();

        let frame = match tokio::time::timeout(timeout, self.rx.recv_async()).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(flume::RecvError::Disconnected)) => return Err(SnapshotError::StreamEnded),
            Err(_) => return Err(SnapshotError::FrameTimeout(timeout)),
        };

        metrics::histogram!("monoshot_frame_wait_ms").record(started.elapsed().as_millis() as f64);
        Ok(frame)
    }
}
