//! Persistence of the keyframe store and export of the generated path
//!
//! Two distinct formats:
//! - `.gkf` — the authoring format: the full keyframe store as a JSON
//!   array, every field of every keyframe in playback order. Lossless,
//!   reloadable.
//! - `.gsc` — the playback export: one line per trajectory sample
//!   (`time_ms px py pz dx dy dz ux uy uz`), consumable by an independent
//!   camera-path player. One-way and lossy: no names, no seams, poses
//!   only.
//!
//! All functions here are pure with respect to session state: they take
//! slices or readers and return results, so they can run on a background
//! worker and be applied on the owning thread afterwards. A failed load
//! never yields partial data.

use crate::keyframe::Keyframe;
use crate::trajectory::Trajectory;
use crate::{PathError, Result};
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Serialize keyframes to a writer as pretty-printed JSON
pub fn write_keyframes<W: Write>(writer: W, keyframes: &[Keyframe]) -> Result<()> {
    serde_json::to_writer_pretty(writer, keyframes)?;
    Ok(())
}

/// Parse keyframes from a reader.
///
/// Malformed input fails with a format error and produces nothing; the
/// caller's live store must not be touched until this succeeds.
pub fn read_keyframes<R: Read>(reader: R) -> Result<Vec<Keyframe>> {
    let keyframes: Vec<Keyframe> =
        serde_json::from_reader(reader).map_err(|e| PathError::Format {
            reason: e.to_string(),
        })?;
    for kf in &keyframes {
        if !kf.seconds.is_finite() || kf.seconds < 0.0 {
            return Err(PathError::Format {
                reason: format!("keyframe {:?} has invalid seconds {}", kf.name, kf.seconds),
            });
        }
    }
    Ok(keyframes)
}

/// Write the full keyframe store to a `.gkf` file
pub fn save_keyframes(path: impl AsRef<Path>, keyframes: &[Keyframe]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_keyframes(BufWriter::new(file), keyframes)?;
    info!("saved {} keyframes to {}", keyframes.len(), path.display());
    Ok(())
}

/// Load an ordered keyframe list from a `.gkf` file
pub fn load_keyframes(path: impl AsRef<Path>) -> Result<Vec<Keyframe>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let keyframes = read_keyframes(BufReader::new(file))?;
    info!(
        "loaded {} keyframes from {}",
        keyframes.len(),
        path.display()
    );
    Ok(keyframes)
}

/// Write a generated trajectory as a dense per-frame pose script
pub fn write_camera_script<W: Write>(mut writer: W, trajectory: &Trajectory) -> Result<()> {
    for sample in trajectory.samples() {
        writeln!(
            writer,
            "{} {} {} {} {} {} {} {} {} {}",
            sample.time_ms,
            sample.position.x,
            sample.position.y,
            sample.position.z,
            sample.direction.x,
            sample.direction.y,
            sample.direction.z,
            sample.up.x,
            sample.up.y,
            sample.up.z,
        )?;
    }
    Ok(())
}

/// Export a generated trajectory to a `.gsc` camera script file
pub fn export_camera_script(path: impl AsRef<Path>, trajectory: &Trajectory) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_camera_script(&mut writer, trajectory)?;
    writer.flush()?;
    info!(
        "exported {} frames at {} fps to {}",
        trajectory.len(),
        trajectory.frame_rate(),
        path.display()
    );
    Ok(())
}
