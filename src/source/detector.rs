//! External hand detector running as a child process.
//!
//! The command is a template; `{camera}` is replaced with the camera index
//! being tried. The child must print `READY` once its camera and model are
//! up, then one JSON-lines frame per captured image on stdout.

use crate::error::{VirtualMouseError, VmResult};
use crate::landmarks::Detection;
use crate::source::{JsonLinesSource, LandmarkSource};
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, info};

pub const CAMERA_PLACEHOLDER: &str = "{camera}";
pub const READY_SIGNAL: &str = "READY";

pub struct DetectorProcess {
    child: Child,
    camera: u32,
    frames: JsonLinesSource<BufReader<ChildStdout>>,
}

impl DetectorProcess {
    pub fn spawn(template: &str, camera: u32, frame: (f32, f32)) -> VmResult<Self> {
        let command_line = template.replace(CAMERA_PLACEHOLDER, &camera.to_string());
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| VirtualMouseError::Detector("empty detector command".to_string()))?;

        debug!("Spawning detector: {}", command_line);
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| VirtualMouseError::Detector(format!("failed to start '{}': {}", program, e)))?;

        let Some(stdout) = child.stdout.take() else {
            stop(&mut child);
            return Err(VirtualMouseError::Detector(
                "detector stdout not captured".to_string(),
            ));
        };
        let mut reader = BufReader::new(stdout);

        let mut ready = String::new();
        let handshake = reader.read_line(&mut ready);
        if !matches!(handshake, Ok(n) if n > 0) || ready.trim() != READY_SIGNAL {
            stop(&mut child);
            let got = match handshake {
                Ok(0) => "end of stream".to_string(),
                Ok(_) => format!("'{}'", ready.trim()),
                Err(e) => e.to_string(),
            };
            return Err(VirtualMouseError::Acquisition(format!(
                "detector for camera {} did not signal {} (got {})",
                camera, READY_SIGNAL, got
            )));
        }

        info!("📷 Detector ready on camera {}", camera);
        let frames = JsonLinesSource::new(reader, frame).with_label(format!("camera {}", camera));
        Ok(Self {
            child,
            camera,
            frames,
        })
    }

    pub fn camera(&self) -> u32 {
        self.camera
    }
}

impl LandmarkSource for DetectorProcess {
    fn next_frame(&mut self) -> VmResult<Option<Detection>> {
        self.frames.next_frame()
    }

    fn describe(&self) -> String {
        format!("detector (camera {})", self.camera)
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        stop(&mut self.child);
    }
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
