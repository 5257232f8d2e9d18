mod common;

use rstest::rstest;
use std::io::Cursor;
use std::time::Duration;
use virtual_mouse::error::VirtualMouseError;
use virtual_mouse::landmarks::{Detection, HandSide, LANDMARK_COUNT};
use virtual_mouse::source::{
    first_success, JsonLinesSource, LandmarkSource, ReplaySource, SyntheticSource,
};

const FRAME: (f32, f32) = (640.0, 480.0);

fn landmarks_json(n: usize, x: f32, y: f32) -> String {
    let pts: Vec<String> = (0..n).map(|_| format!("[{}, {}, 0.0]", x, y)).collect();
    format!("[{}]", pts.join(","))
}

fn source(text: &str) -> JsonLinesSource<Cursor<Vec<u8>>> {
    JsonLinesSource::new(Cursor::new(text.as_bytes().to_vec()), FRAME)
}

fn drain(mut s: impl LandmarkSource) -> Vec<Detection> {
    let mut out = Vec::new();
    while let Some(d) = s.next_frame().unwrap() {
        out.push(d);
    }
    out
}

// --- JSON LINES ---
#[test]
fn test_reads_pixel_frames() {
    let text = format!(
        "{{\"t\": 0.5, \"hands\": [{{\"side\": \"Left\", \"landmarks\": {}}}]}}\n",
        landmarks_json(LANDMARK_COUNT, 100.0, 200.0)
    );
    let frames = drain(source(&text));

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].timestamp, Duration::from_millis(500));
    let hand = frames[0].primary().unwrap();
    assert_eq!(hand.side, HandSide::Left);
    assert_eq!(hand.wrist().x, 100.0);
    assert_eq!(hand.wrist().y, 200.0);
}

#[test]
fn test_scales_normalized_coordinates() {
    let text = format!(
        "{{\"t\": 0, \"normalized\": true, \"hands\": [{{\"side\": \"right\", \"landmarks\": {}}}]}}\n",
        landmarks_json(LANDMARK_COUNT, 0.25, 0.5)
    );
    let frames = drain(source(&text));
    let hand = frames[0].primary().unwrap();
    assert_eq!(hand.side, HandSide::Right);
    assert_eq!(hand.index_tip().x, 160.0);
    assert_eq!(hand.index_tip().y, 240.0);
}

#[test]
fn test_accepts_object_landmarks() {
    let pts: Vec<String> = (0..LANDMARK_COUNT)
        .map(|i| format!("{{\"x\": {}, \"y\": 1.0}}", i))
        .collect();
    let text = format!("{{\"hands\": [{{\"landmarks\": [{}]}}]}}\n", pts.join(","));
    let frames = drain(source(&text));
    assert_eq!(frames[0].primary().unwrap().index_tip().x, 8.0);
}

#[test]
fn test_skips_malformed_and_blank_lines() {
    let good = format!(
        "{{\"t\": 1.0, \"hands\": [{{\"landmarks\": {}}}]}}",
        landmarks_json(LANDMARK_COUNT, 1.0, 1.0)
    );
    let text = format!("not json\n\n{}\n{{\"hands\": 5}}\n{}\n", good, good);
    let frames = drain(source(&text));
    assert_eq!(frames.len(), 2);
}

#[test]
fn test_drops_hands_with_wrong_landmark_count() {
    let text = format!(
        "{{\"t\": 0.1, \"hands\": [{{\"landmarks\": {}}}, {{\"landmarks\": {}}}]}}\n",
        landmarks_json(20, 1.0, 1.0),
        landmarks_json(LANDMARK_COUNT, 2.0, 2.0)
    );
    let frames = drain(source(&text));
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].hands.len(), 1);
    assert_eq!(frames[0].primary().unwrap().wrist().x, 2.0);
}

#[test]
fn test_empty_and_error_frames_are_misses() {
    let text = "{\"t\": 0.1, \"hands\": []}\n{\"t\": 0.2, \"error\": \"camera hiccup\"}\n";
    let frames = drain(source(text));
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.primary().is_none()));
}

#[test]
fn test_backwards_timestamps_are_clamped() {
    let text = "{\"t\": 2.0}\n{\"t\": 1.0}\n{\"t\": 3.0}\n";
    let ts: Vec<Duration> = drain(source(text)).iter().map(|f| f.timestamp).collect();
    assert_eq!(
        ts,
        vec![
            Duration::from_secs(2),
            Duration::from_secs(2),
            Duration::from_secs(3)
        ]
    );
}

#[rstest]
#[case("1e20")]
#[case("-1.0")]
#[case("1e300")]
fn test_unusable_timestamp_reuses_previous(#[case] t: &str) {
    let text = format!(
        "{{\"t\": 2.0}}\n{{\"t\": {}, \"hands\": []}}\n{{\"t\": 3.0}}\n",
        t
    );
    let ts: Vec<Duration> = drain(source(&text)).iter().map(|f| f.timestamp).collect();
    assert_eq!(
        ts,
        vec![
            Duration::from_secs(2),
            Duration::from_secs(2),
            Duration::from_secs(3)
        ]
    );
}

#[test]
fn test_missing_timestamps_are_monotonic() {
    let text = "{}\n{}\n{}\n";
    let ts: Vec<Duration> = drain(source(text)).iter().map(|f| f.timestamp).collect();
    assert_eq!(ts.len(), 3);
    assert!(ts.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_open_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");
    std::fs::write(&path, "{\"t\": 0.0}\n{\"t\": 0.1}\n").unwrap();

    let s = JsonLinesSource::open(&path, FRAME).unwrap();
    assert!(s.describe().contains("session.jsonl"));
    assert_eq!(drain(s).len(), 2);
}

#[test]
fn test_open_missing_file_fails() {
    assert!(matches!(
        JsonLinesSource::open("/no/such/recording.jsonl", FRAME),
        Err(VirtualMouseError::Io(_))
    ));
}

// --- FALLBACK ---
#[test]
fn test_first_success_tries_in_order() {
    let mut tried = Vec::new();
    let got = first_success(&[2u32, 0, 1], |&cam| {
        tried.push(cam);
        if cam == 0 {
            Ok(cam * 10)
        } else {
            Err(VirtualMouseError::Acquisition(format!("camera {} busy", cam)))
        }
    })
    .unwrap();
    assert_eq!(got, 0);
    assert_eq!(tried, vec![2, 0]);
}

#[test]
fn test_first_success_reports_every_failure() {
    let err = first_success(&[2u32, 4], |&cam| -> Result<(), _> {
        Err(VirtualMouseError::Acquisition(format!("camera {} busy", cam)))
    })
    .unwrap_err();
    match err {
        VirtualMouseError::Acquisition(msg) => {
            assert!(msg.contains("camera 2 busy") && msg.contains("camera 4 busy"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_first_success_with_no_candidates() {
    let empty: [u32; 0] = [];
    assert!(matches!(
        first_success(&empty, |_| Ok(())),
        Err(VirtualMouseError::Acquisition(_))
    ));
}

// --- REPLAY / SYNTHETIC ---
#[test]
fn test_replay_yields_in_order() {
    let frames = common::FrameScript::new()
        .hold(common::pointer(), 3)
        .absent(1)
        .detections();
    let replay: ReplaySource = frames.clone().into_iter().collect();
    assert_eq!(replay.remaining(), 4);
    assert_eq!(drain(replay), frames);
}

#[test]
fn test_synthetic_is_reproducible() {
    let a = drain(SyntheticSource::demo(3));
    let b = drain(SyntheticSource::demo(3));
    let c = drain(SyntheticSource::demo(4));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.windows(2).all(|w| w[1].timestamp > w[0].timestamp));
}

// --- DETECTOR PROCESS ---
#[cfg(unix)]
mod detector {
    use super::*;
    use std::path::Path;
    use virtual_mouse::source::DetectorProcess;

    // Command template running `body` under sh with the camera as $1.
    fn script(dir: &Path, body: &str) -> String {
        let path = dir.join("detector.sh");
        std::fs::write(&path, format!("{}\n", body)).unwrap();
        format!("sh {} {{camera}}", path.display())
    }

    #[test]
    fn test_streams_after_ready() {
        let dir = tempfile::tempdir().unwrap();
        let template = script(
            dir.path(),
            "echo READY\necho '{\"t\": 0.0, \"camera\": '$1'}'\necho '{\"t\": 0.1}'",
        );

        let mut d = DetectorProcess::spawn(&template, 3, FRAME).unwrap();
        assert_eq!(d.camera(), 3);
        assert!(d.next_frame().unwrap().is_some());
        assert!(d.next_frame().unwrap().is_some());
        assert!(d.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_missing_handshake_is_acquisition_error() {
        let dir = tempfile::tempdir().unwrap();
        let template = script(dir.path(), "echo 'cannot open camera'");
        let err = DetectorProcess::spawn(&template, 0, FRAME).err();
        assert!(matches!(err, Some(VirtualMouseError::Acquisition(_))));
    }

    #[test]
    fn test_unknown_program_is_detector_error() {
        let err = DetectorProcess::spawn("/no/such/detector {camera}", 0, FRAME).err();
        assert!(matches!(err, Some(VirtualMouseError::Detector(_))));
    }

    #[test]
    fn test_camera_fallback_picks_first_working_camera() {
        let dir = tempfile::tempdir().unwrap();
        let template = script(
            dir.path(),
            "if [ \"$1\" = \"1\" ]; then echo READY; echo '{}'; else echo busy; fi",
        );

        let d = first_success(&[2u32, 1, 0], |&cam| {
            DetectorProcess::spawn(&template, cam, FRAME)
        })
        .unwrap();
        assert_eq!(d.camera(), 1);
    }
}
