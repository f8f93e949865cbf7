//! File-backed capture driver and detection engine for offline replay.
//!
//! A recorded session is a directory of frame images plus a YAML file with
//! the landmark sets the engine reported for each frame:
//!
//! ```yaml
//! frames:
//!   - faces:
//!       - [{x: 0.41, y: 0.38, z: -0.02}, {x: 0.43, y: 0.37}, ...]
//!   - faces: []
//! ```

use crate::{
    landmarks::LandmarkSet,
    session::{DetectionEngine, DetectorOptions, FrameSource},
    Error, Result,
};
use image::RgbaImage;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Frames read in file-name order from a directory
#[derive(Debug)]
pub struct ImageSequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    next: usize,
    running: bool,
}

impl ImageSequenceSource {
    /// Create a source over `dir`; nothing is read until `start`
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            files: Vec::new(),
            next: 0,
            running: false,
        }
    }

    /// Frame files found by the last `start`
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

impl FrameSource for ImageSequenceSource {
    fn start(&mut self) -> Result<()> {
        let files = self
            .scan()
            .map_err(|e| Error::StreamAcquisition(format!("{}: {e}", self.dir.display())))?;
        if files.is_empty() {
            return Err(Error::StreamAcquisition(format!(
                "no frame images in {}",
                self.dir.display()
            )));
        }

        info!("Replaying {} frames from {}", files.len(), self.dir.display());
        self.files = files;
        self.next = 0;
        self.running = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RgbaImage>> {
        if !self.running {
            return Ok(None);
        }
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        debug!("Reading frame {}", path.display());
        Ok(Some(image::open(path)?.to_rgba8()))
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// Landmark sets of one recorded frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// One entry per detected face; empty when no face was found
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

/// Landmark recording for a whole session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecording {
    /// Frames in capture order
    pub frames: Vec<RecordedFrame>,
}

impl LandmarkRecording {
    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the YAML does not describe a recording.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::InvalidInput(format!("Failed to parse landmarks: {e}")))
    }

    /// Serialize the recording as YAML
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::InvalidInput(format!("Failed to serialize landmarks: {e}")))
    }
}

/// Detection engine answering from a landmark recording, frame by frame
#[derive(Debug)]
pub struct RecordedLandmarks {
    path: Option<PathBuf>,
    recording: Option<LandmarkRecording>,
    cursor: usize,
    ready: bool,
}

impl RecordedLandmarks {
    /// Engine that loads its recording from `path` on initialisation
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            recording: None,
            cursor: 0,
            ready: false,
        }
    }

    /// Engine over an in-memory recording
    #[must_use]
    pub fn from_recording(recording: LandmarkRecording) -> Self {
        Self {
            path: None,
            recording: Some(recording),
            cursor: 0,
            ready: false,
        }
    }
}

impl DetectionEngine for RecordedLandmarks {
    fn initialize(&mut self, options: &DetectorOptions) -> Result<()> {
        debug!("Initialising recorded landmarks with {options:?}");
        if let Some(path) = &self.path {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::DetectionUnavailable(format!("{}: {e}", path.display())))?;
            let recording = LandmarkRecording::from_yaml(&content)
                .map_err(|e| Error::DetectionUnavailable(format!("{}: {e}", path.display())))?;
            self.recording = Some(recording);
        }
        if self.recording.is_none() {
            return Err(Error::DetectionUnavailable("no landmark recording".to_string()));
        }

        self.cursor = 0;
        self.ready = true;
        Ok(())
    }

    fn submit_frame(&mut self, _frame: &RgbaImage) -> Result<Vec<LandmarkSet>> {
        if !self.ready {
            return Err(Error::SessionState("detection engine is not initialised".to_string()));
        }
        let faces = self
            .recording
            .as_ref()
            .and_then(|recording| recording.frames.get(self.cursor))
            .map(|frame| frame.faces.clone())
            .unwrap_or_default();
        self.cursor += 1;
        Ok(faces)
    }

    fn release(&mut self) {
        self.ready = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    #[test]
    fn test_recording_yaml() {
        let recording = LandmarkRecording::from_yaml(
            "frames:\n  - faces:\n      - [{x: 0.1, y: 0.2}, {x: 0.3, y: 0.4, z: 0.5}]\n  - faces: []\n  - {}\n",
        )
        .unwrap();

        assert_eq!(recording.frames.len(), 3);
        assert_eq!(recording.frames[0].faces[0].points()[1], Landmark::with_depth(0.3, 0.4, 0.5));
        assert!(recording.frames[1].faces.is_empty());
        assert!(recording.frames[2].faces.is_empty());

        let again = LandmarkRecording::from_yaml(&recording.to_yaml().unwrap()).unwrap();
        assert_eq!(again, recording);
    }

    #[test]
    fn test_recorded_engine_sequence() {
        let face = LandmarkSet::new(vec![Landmark::new(0.5, 0.5)]);
        let mut engine = RecordedLandmarks::from_recording(LandmarkRecording {
            frames: vec![RecordedFrame { faces: vec![face.clone()] }, RecordedFrame::default()],
        });
        let frame = RgbaImage::new(1, 1);

        assert!(engine.submit_frame(&frame).is_err());
        engine.initialize(&DetectorOptions::default()).unwrap();

        assert_eq!(engine.submit_frame(&frame).unwrap(), vec![face]);
        assert!(engine.submit_frame(&frame).unwrap().is_empty());
        assert!(engine.submit_frame(&frame).unwrap().is_empty());

        engine.release();
        assert!(engine.submit_frame(&frame).is_err());
    }

    #[test]
    fn test_missing_recording_is_unavailable() {
        let mut engine = RecordedLandmarks::from_file("does/not/exist.yaml");
        assert!(matches!(
            engine.initialize(&DetectorOptions::default()),
            Err(Error::DetectionUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_frame_dir() {
        let mut source = ImageSequenceSource::new("does/not/exist");
        assert!(matches!(source.start(), Err(Error::StreamAcquisition(_))));
        assert!(source.next_frame().unwrap().is_none());
    }
}
