//! SyncPipeline - public facade
//!
//! Accepts `(camera_index, image, timestamp)` arrivals, dispatches
//! processing to the worker pool, and exposes the consumer-facing
//! completion-queue accessors.

use std::sync::Arc;

use tracing::{instrument, warn};

use contracts::{
    CameraFrame, CameraSet, FrameBundle, FrameProcessor, ImageData, PipelineConfig, PipelineError,
};
use worker_pool::{PoolError, WorkerPool};

use crate::correlator::Correlator;
use crate::passthrough::PassThroughProcessor;
use crate::stats::{PipelineStats, StatsSnapshot};

/// Multi-camera synchronization pipeline.
///
/// One instance exists per physical rig, constructed once and torn down
/// once. Producers call [`process_image`](Self::process_image); consumers
/// pull completed bundles with [`next`](Self::next),
/// [`next_blocking`](Self::next_blocking), or
/// [`latest_and_clear`](Self::latest_and_clear).
///
/// A frame whose processor fails is logged, counted, and dropped; it is
/// never installed into any bundle and never surfaces to the
/// `process_image` caller.
pub struct SyncPipeline {
    processors: Vec<Arc<dyn FrameProcessor>>,
    input_cameras: Arc<CameraSet>,
    output_cameras: Arc<CameraSet>,
    correlator: Arc<Correlator>,
    pool: WorkerPool,
    stats: Arc<PipelineStats>,
}

impl SyncPipeline {
    /// Construct a pipeline, validating the rig configuration.
    ///
    /// Fails with `InvalidConfiguration` when camera counts disagree, the
    /// rig is empty, the worker count or tolerance is out of range, or a
    /// processor's declared camera is not the identical handle held by the
    /// corresponding camera set entry. Misconfiguration is caught here
    /// rather than surfacing as silently-misaligned bundles at runtime.
    pub fn new(
        config: PipelineConfig,
        processors: Vec<Arc<dyn FrameProcessor>>,
        input_cameras: Arc<CameraSet>,
        output_cameras: Arc<CameraSet>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let num_cameras = input_cameras.len();
        if num_cameras == 0 {
            return Err(PipelineError::invalid_configuration(
                "input_cameras",
                "rig must have at least one camera",
            ));
        }
        if output_cameras.len() != num_cameras {
            return Err(PipelineError::invalid_configuration(
                "output_cameras",
                format!(
                    "camera count {} does not match input camera count {num_cameras}",
                    output_cameras.len()
                ),
            ));
        }
        if processors.len() != num_cameras {
            return Err(PipelineError::invalid_configuration(
                "processors",
                format!(
                    "processor count {} does not match camera count {num_cameras}",
                    processors.len()
                ),
            ));
        }
        for (i, processor) in processors.iter().enumerate() {
            let input_matches = input_cameras
                .get(i)
                .is_some_and(|camera| Arc::ptr_eq(camera, processor.input_camera()));
            if !input_matches {
                return Err(PipelineError::invalid_configuration(
                    "processors",
                    format!("processor {i} input camera is not the rig's camera {i}"),
                ));
            }
            let output_matches = output_cameras
                .get(i)
                .is_some_and(|camera| Arc::ptr_eq(camera, processor.output_camera()));
            if !output_matches {
                return Err(PipelineError::invalid_configuration(
                    "processors",
                    format!("processor {i} output camera is not the rig's camera {i}"),
                ));
            }
        }

        let pool = WorkerPool::new(config.num_workers).map_err(|e| match e {
            PoolError::InvalidWorkerCount { num_workers } => PipelineError::invalid_configuration(
                "num_workers",
                format!("worker count {num_workers} must be at least 1"),
            ),
            PoolError::Spawn(e) => PipelineError::Io(e),
        })?;

        let stats = Arc::new(PipelineStats::new());
        let correlator = Arc::new(Correlator::new(
            num_cameras,
            config.tolerance_ns,
            Arc::clone(&stats),
        ));

        Ok(Self {
            processors,
            input_cameras,
            output_cameras,
            correlator,
            pool,
            stats,
        })
    }

    /// Build an `num_cameras`-rig pipeline with pass-through processors.
    ///
    /// Convenience factory for tests and demos.
    pub fn test_rig(
        num_cameras: usize,
        num_workers: usize,
        tolerance_ns: i64,
    ) -> Result<Self, PipelineError> {
        let cameras = Arc::new(CameraSet::uniform(num_cameras, 640, 480));
        let processors = cameras
            .iter()
            .map(|camera| {
                Arc::new(PassThroughProcessor::new(Arc::clone(camera)))
                    as Arc<dyn FrameProcessor>
            })
            .collect();
        Self::new(
            PipelineConfig {
                num_workers,
                tolerance_ns,
            },
            processors,
            Arc::clone(&cameras),
            cameras,
        )
    }

    /// Dispatch one raw image for processing.
    ///
    /// Validates `camera_index` and returns immediately; the frame flows
    /// into a bundle asynchronously. Processing failures inside the worker
    /// task have no return channel here; they are observable only through
    /// logs, stats, and the absence of an eventual completion.
    #[instrument(level = "debug", name = "pipeline_process_image", skip(self, image))]
    pub fn process_image(
        &self,
        camera_index: usize,
        image: ImageData,
        timestamp_ns: i64,
    ) -> Result<(), PipelineError> {
        if camera_index >= self.processors.len() {
            return Err(PipelineError::index_out_of_range(
                camera_index,
                self.processors.len(),
            ));
        }
        metrics::counter!("pipeline_images_received_total").increment(1);

        let processor = Arc::clone(&self.processors[camera_index]);
        let correlator = Arc::clone(&self.correlator);
        let stats = Arc::clone(&self.stats);
        let enqueued = self.pool.enqueue(move || {
            match processor.process_image(image, timestamp_ns) {
                Ok(processed) => correlator.install_frame(CameraFrame {
                    camera_index,
                    timestamp_ns: processed.timestamp_ns,
                    payload: processed.payload,
                }),
                Err(e) => {
                    warn!(
                        camera_index,
                        timestamp_ns,
                        error = %e,
                        "processor failed, dropping frame"
                    );
                    stats.inc_frames_dropped();
                    metrics::counter!("pipeline_frames_dropped_total").increment(1);
                }
            }
        });
        if !enqueued {
            self.stats.inc_frames_dropped();
        }
        Ok(())
    }

    /// Remove and return the oldest completed bundle, if any. Never blocks.
    pub fn next(&self) -> Option<Arc<FrameBundle>> {
        self.correlator.next()
    }

    /// Block until a bundle completes, then remove and return the oldest.
    ///
    /// Call this only while the pipeline is being fed; it keeps blocking
    /// through teardown if no bundle ever completes.
    pub fn next_blocking(&self) -> Arc<FrameBundle> {
        self.correlator.next_blocking()
    }

    /// Return the newest completed bundle and shed the backlog: the
    /// completion queue is cleared and every in-progress bundle at or
    /// before the returned timestamp is discarded.
    ///
    /// For latency-sensitive consumers that only want the freshest bundle.
    pub fn latest_and_clear(&self) -> Option<Arc<FrameBundle>> {
        self.correlator.latest_and_clear()
    }

    /// Current completion queue size
    pub fn num_bundles_complete(&self) -> usize {
        self.correlator.num_complete()
    }

    /// Current processing index size
    pub fn num_bundles_processing(&self) -> usize {
        self.correlator.num_processing()
    }

    /// Camera set describing the raw images fed in
    pub fn input_cameras(&self) -> &Arc<CameraSet> {
        &self.input_cameras
    }

    /// Camera set describing the processed frames coming out
    pub fn output_cameras(&self) -> &Arc<CameraSet> {
        &self.output_cameras
    }

    /// Number of cameras in the rig
    pub fn num_cameras(&self) -> usize {
        self.processors.len()
    }

    /// Block until every enqueued processing task has run.
    ///
    /// Says nothing about consumer demand; the completion queue may still
    /// hold bundles afterwards.
    pub fn wait_for_all_work(&self) {
        self.pool.wait_for_empty_queue();
    }

    /// Snapshot of the pipeline's counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the worker pool: queued tasks are discarded, in-flight tasks
    /// finish, workers are joined. Incomplete bundles are simply dropped.
    pub fn stop(&mut self) {
        self.pool.stop();
    }
}

impl Drop for SyncPipeline {
    fn drop(&mut self) {
        // The pool must be stopped before any other state is released so no
        // task runs against a torn-down correlator.
        self.pool.stop();
    }
}
