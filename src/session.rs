//! Owning facade for a camera-path editing and playback session
//!
//! A [`CameraPathSession`] owns the keyframe store, the derived trajectory
//! cache, the transport and the event dispatcher. It replaces any notion
//! of a process-wide manager: construct one per authoring session and pass
//! it by reference to whichever subsystem needs it.
//!
//! Threading discipline is single-writer: all mutations are `&mut self`
//! methods driven by one owner (typically the render loop). File I/O can
//! run on a worker via the pure functions in [`crate::persist`], with the
//! result applied here afterwards ([`apply_loaded`](CameraPathSession::apply_loaded)).

use crate::event::{EventDispatcher, PathEvent, SubscriptionId};
use crate::keyframe::KeyframeId;
use crate::mapper::FrameMapper;
use crate::pose::{CameraPose, PoseProvider};
use crate::store::KeyframeStore;
use crate::trajectory::{PathSample, Trajectory};
use crate::transport::Transport;
use crate::{persist, Keyframe, Result};
use std::path::Path;

/// A camera-path authoring and playback session
#[derive(Debug)]
pub struct CameraPathSession {
    store: KeyframeStore,
    mapper: FrameMapper,
    /// Derived cache; `None` or a stale revision means it is rebuilt on
    /// next access, never patched in place.
    trajectory: Option<Trajectory>,
    transport: Transport,
    dispatcher: EventDispatcher,
}

impl CameraPathSession {
    /// Create a session at the given scene-wide target frame rate
    pub fn new(frame_rate: f64) -> Self {
        Self {
            store: KeyframeStore::new(),
            mapper: FrameMapper::new(frame_rate),
            trajectory: None,
            transport: Transport::new(),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// The target frame rate
    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.mapper.frame_rate()
    }

    /// Change the target frame rate; the trajectory is regenerated on
    /// next access.
    pub fn set_frame_rate(&mut self, frame_rate: f64) {
        if frame_rate > 0.0 && frame_rate != self.mapper.frame_rate() {
            self.mapper = FrameMapper::new(frame_rate);
            self.trajectory = None;
        }
    }

    /// The frame/time mapper at the current target rate
    #[inline]
    pub fn mapper(&self) -> &FrameMapper {
        &self.mapper
    }

    /// Read-only view of the keyframe store
    #[inline]
    pub fn store(&self) -> &KeyframeStore {
        &self.store
    }

    /// Register an event callback
    pub fn subscribe(&mut self, callback: impl FnMut(&PathEvent) + 'static) -> SubscriptionId {
        self.dispatcher.subscribe(callback)
    }

    /// Remove an event callback
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    // ----- keyframe editing -----

    /// Capture the collaborator's current camera pose and scene time as a
    /// new keyframe at the end of the path.
    pub fn add_keyframe(
        &mut self,
        provider: &impl PoseProvider,
        name: Option<&str>,
        seconds: f64,
    ) -> Result<KeyframeId> {
        let pose = provider.pose();
        let time_ms = provider.scene_time_ms();
        self.mutate(|s| s.append(name, seconds, pose, time_ms))
    }

    /// Append a keyframe from an explicit pose
    pub fn append_keyframe(
        &mut self,
        name: Option<&str>,
        seconds: f64,
        pose: CameraPose,
        time_ms: i64,
    ) -> Result<KeyframeId> {
        self.mutate(|s| s.append(name, seconds, pose, time_ms))
    }

    /// Insert a keyframe at an explicit index
    pub fn insert_keyframe_at(
        &mut self,
        index: usize,
        name: Option<&str>,
        seconds: f64,
        pose: CameraPose,
        time_ms: i64,
    ) -> Result<KeyframeId> {
        self.mutate(|s| s.insert_at(index, name, seconds, pose, time_ms))
    }

    /// Insert a synthesized keyframe after `index` (midpoint between
    /// neighbors, or extrapolated past the final keyframe)
    pub fn insert_keyframe_after(&mut self, index: usize) -> Result<KeyframeId> {
        self.mutate(|s| s.insert_after(index))
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, id: KeyframeId) -> Result<Keyframe> {
        self.mutate(|s| s.remove(id))
    }

    /// Rename a keyframe
    pub fn rename_keyframe(&mut self, id: KeyframeId, name: &str) -> Result<()> {
        self.mutate(|s| s.rename(id, name))
    }

    /// Change a keyframe's spacing from its predecessor
    pub fn set_keyframe_seconds(&mut self, id: KeyframeId, seconds: f64) -> Result<()> {
        self.mutate(|s| s.set_seconds(id, seconds))
    }

    /// Toggle a keyframe's seam flag
    pub fn set_keyframe_seam(&mut self, id: KeyframeId, seam: bool) -> Result<()> {
        self.mutate(|s| s.set_seam(id, seam))
    }

    /// Redistribute timings proportionally to spatial distance
    pub fn normalize_timing(&mut self) -> Result<()> {
        self.mutate(|s| s.normalize_timing())
    }

    /// Empty the store and detach all derived state
    pub fn clear(&mut self) {
        self.store.clear();
        self.after_store_change();
    }

    /// Timing feasibility: indices of keyframes spaced shorter than one
    /// frame at the current target rate (advisory, never blocks editing)
    pub fn check_timings(&self) -> Vec<usize> {
        self.mapper.check_timings(&self.store)
    }

    // ----- trajectory -----

    /// The generated trajectory, regenerating it first if the store or
    /// frame rate changed since the last generation.
    pub fn trajectory(&mut self) -> &Trajectory {
        self.ensure_trajectory();
        self.trajectory.as_ref().expect("trajectory just ensured")
    }

    /// Force regeneration of the trajectory, even if the cache is fresh
    pub fn regenerate_path(&mut self) {
        self.trajectory = None;
        self.ensure_trajectory();
    }

    /// Absolute frame index of the sample at a keyframe's cumulative time
    pub fn frame_of_keyframe(&mut self, index: usize) -> Option<u64> {
        self.ensure_trajectory();
        self.trajectory.as_ref()?.frame_of_keyframe(index)
    }

    /// The sample under the playhead, if any
    pub fn current_sample(&mut self) -> Option<PathSample> {
        self.ensure_trajectory();
        let frame = self.transport.current_frame();
        self.trajectory.as_ref()?.get(frame).copied()
    }

    // ----- transport -----

    /// Current transport (read-only; drive it through the session so
    /// notifications fire)
    #[inline]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Start or resume playback
    pub fn play(&mut self) -> bool {
        self.ensure_trajectory();
        self.with_transport(Transport::play)
    }

    /// Pause playback
    pub fn pause(&mut self) -> bool {
        self.with_transport(Transport::pause)
    }

    /// Stop playback at the current frame
    pub fn stop(&mut self) -> bool {
        self.with_transport(Transport::stop)
    }

    /// Seek to a frame (clamped); any state becomes stopped
    pub fn seek(&mut self, frame: u64) -> bool {
        self.ensure_trajectory();
        self.with_transport(|t| t.seek(frame))
    }

    /// Step one frame forward
    pub fn step_forward(&mut self) -> bool {
        self.ensure_trajectory();
        self.with_transport(Transport::step_forward)
    }

    /// Step one frame backward
    pub fn step_backward(&mut self) -> bool {
        self.ensure_trajectory();
        self.with_transport(Transport::step_backward)
    }

    /// Jump to the first frame
    pub fn skip_to_start(&mut self) -> bool {
        self.ensure_trajectory();
        self.with_transport(Transport::skip_to_start)
    }

    /// Jump to the last frame
    pub fn skip_to_end(&mut self) -> bool {
        self.ensure_trajectory();
        self.with_transport(Transport::skip_to_end)
    }

    /// Seek to the frame of the keyframe at `index`
    pub fn jump_to_keyframe(&mut self, index: usize) -> bool {
        match self.frame_of_keyframe(index) {
            Some(frame) => self.with_transport(|t| t.seek(frame)),
            None => false,
        }
    }

    /// Advance playback by one frame. Call once per render tick.
    pub fn tick(&mut self) -> Option<u64> {
        self.ensure_trajectory();
        let before_state = self.transport.state();
        let advanced = self.transport.tick();
        if let Some(frame) = advanced {
            self.dispatcher.dispatch(&PathEvent::FrameChanged { frame });
        }
        let state = self.transport.state();
        if state != before_state {
            self.dispatcher
                .dispatch(&PathEvent::PlaybackStateChanged { state });
        }
        advanced
    }

    /// Whether the transport is inert or resting
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.transport.is_idle()
    }

    /// Current frame cursor
    #[inline]
    pub fn current_frame(&self) -> u64 {
        self.transport.current_frame()
    }

    // ----- persistence -----

    /// Save the keyframe store to a `.gkf` file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        persist::save_keyframes(path, self.store.keyframes())
    }

    /// Load a `.gkf` file, replacing the store only if the parse
    /// succeeds; on failure the live store is untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let keyframes = persist::load_keyframes(path)?;
        Ok(self.apply_loaded(keyframes))
    }

    /// Apply an already-parsed keyframe list, e.g. the result of a
    /// background load handed back to the owning thread. Returns the new
    /// store length.
    pub fn apply_loaded(&mut self, keyframes: Vec<Keyframe>) -> usize {
        self.store.replace(keyframes);
        self.after_store_change();
        self.store.len()
    }

    /// Export the resampled trajectory as a `.gsc` camera script
    pub fn export(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_trajectory();
        let trajectory = self.trajectory.as_ref().expect("trajectory just ensured");
        persist::export_camera_script(path, trajectory)
    }

    // ----- internals -----

    /// Run a store mutation; on success invalidate the trajectory cache
    /// and notify subscribers.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut KeyframeStore) -> Result<T>) -> Result<T> {
        let result = op(&mut self.store);
        if result.is_ok() {
            self.after_store_change();
        }
        result
    }

    fn after_store_change(&mut self) {
        self.trajectory = None;
        self.dispatcher.dispatch(&PathEvent::KeyframesChanged);
    }

    /// Rebuild the trajectory if the cache is missing or stale, then bring
    /// the transport into the new bounds: a playing transport is stopped
    /// at the proportionally re-mapped frame, otherwise the cursor is just
    /// clamped.
    fn ensure_trajectory(&mut self) {
        let fresh = self
            .trajectory
            .as_ref()
            .is_some_and(|t| t.revision() == self.store.revision());
        if fresh {
            return;
        }

        let trajectory = Trajectory::generate(&self.store, self.mapper.frame_rate());
        let frames = trajectory.len() as u64;
        self.trajectory = Some(trajectory);

        let before_state = self.transport.state();
        let before_frame = self.transport.current_frame();
        if before_state.is_playing() {
            self.transport.remap(frames);
        } else {
            self.transport.bind(frames);
        }
        let state = self.transport.state();
        if state != before_state {
            self.dispatcher
                .dispatch(&PathEvent::PlaybackStateChanged { state });
        }
        let frame = self.transport.current_frame();
        if frame != before_frame {
            self.dispatcher.dispatch(&PathEvent::FrameChanged { frame });
        }
    }

    fn with_transport(&mut self, op: impl FnOnce(&mut Transport) -> bool) -> bool {
        let before_state = self.transport.state();
        let before_frame = self.transport.current_frame();
        let changed = op(&mut self.transport);
        let state = self.transport.state();
        if state != before_state {
            self.dispatcher
                .dispatch(&PathEvent::PlaybackStateChanged { state });
        }
        let frame = self.transport.current_frame();
        if frame != before_frame {
            self.dispatcher.dispatch(&PathEvent::FrameChanged { frame });
        }
        changed
    }
}
