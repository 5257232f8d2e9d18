mod common;

use common::fingers;
use rstest::rstest;
use std::time::Duration;
use strum::IntoEnumIterator;
use virtual_mouse::fingers::{finger_states, pinch_distances, read_hand, Finger, FingerStates};
use virtual_mouse::landmarks::{index, HandSide, LandmarkSnapshot, Point, LANDMARK_COUNT};
use virtual_mouse::source::HandPose;

fn with_point(hand: &LandmarkSnapshot, id: usize, p: Point) -> LandmarkSnapshot {
    let mut points = *hand.points();
    points[id] = p;
    LandmarkSnapshot::new(hand.timestamp, hand.side, points)
}

// --- RAISED / LOWERED ---
#[rstest]
#[case([0, 1, 0, 0, 0])] // Pointer
#[case([0, 1, 1, 0, 0])] // V sign
#[case([0, 0, 0, 1, 1])] // Scroll
#[case([1, 1, 1, 1, 1])] // Open palm
#[case([0, 0, 0, 0, 0])] // Fist
#[case([1, 0, 0, 0, 1])] // Shaka
fn test_pose_round_trip(
    #[case] bits: [u8; 5],
    #[values(HandSide::Left, HandSide::Right)] side: HandSide,
) {
    let hand = HandPose::new(fingers(bits)).side(side).snapshot(Duration::ZERO);
    assert_eq!(finger_states(&hand, 2.0), fingers(bits));
}

#[test]
fn test_margin_rejects_marginal_tip() {
    let hand = HandPose::pointer().snapshot(Duration::ZERO);
    let pip = hand.point(index::INDEX_PIP);

    // Tip only 1 px above the joint: below a 2 px margin, above a 0 px one.
    let hand = with_point(&hand, index::INDEX_TIP, Point::new(pip.x, pip.y - 1.0));
    assert!(!finger_states(&hand, 2.0).index);
    assert!(finger_states(&hand, 0.0).index);
}

#[test]
fn test_tip_level_with_joint_is_lowered() {
    let hand = HandPose::pointer().snapshot(Duration::ZERO);
    let pip = hand.point(index::INDEX_PIP);
    let hand = with_point(&hand, index::INDEX_TIP, pip);
    assert!(!finger_states(&hand, 0.0).index);
}

#[rstest]
#[case(HandSide::Right, 30.0, true)] // Right thumb extends toward +x
#[case(HandSide::Right, -30.0, false)]
#[case(HandSide::Left, -30.0, true)] // Left thumb extends toward -x
#[case(HandSide::Left, 30.0, false)]
fn test_thumb_direction_follows_hand_side(
    #[case] side: HandSide,
    #[case] tip_dx: f32,
    #[case] expected: bool,
) {
    let mut points = [Point::new(300.0, 300.0); LANDMARK_COUNT];
    points[index::WRIST] = Point::new(300.0, 300.0);
    points[index::THUMB_IP] = Point::new(300.0, 250.0);
    points[index::THUMB_TIP] = Point::new(300.0 + tip_dx, 240.0);
    let hand = LandmarkSnapshot::new(Duration::ZERO, side, points);

    assert_eq!(finger_states(&hand, 2.0).thumb, expected);
}

#[test]
fn test_fingers_compare_against_pip_joint() {
    for finger in Finger::iter() {
        let (tip, joint) = finger.landmarks();
        assert!(tip > joint, "{} tip must come after its joint", finger);
        assert_eq!(tip - joint, if finger == Finger::Thumb { 1 } else { 2 });
    }
}

// --- FINGER STATE HELPERS ---
#[rstest]
#[case([0, 1, 0, 0, 0], true, false, 1)]
#[case([1, 1, 0, 0, 0], true, false, 2)]
#[case([0, 1, 1, 0, 0], false, false, 2)]
#[case([0, 0, 0, 1, 1], false, true, 2)]
#[case([1, 0, 0, 1, 1], false, false, 3)] // Thumb up breaks the scroll pose
#[case([0, 0, 1, 1, 1], false, false, 3)]
fn test_pose_predicates(
    #[case] bits: [u8; 5],
    #[case] pointer: bool,
    #[case] scroll: bool,
    #[case] raised: usize,
) {
    let f = fingers(bits);
    assert_eq!(f.is_pointer_pose(), pointer);
    assert_eq!(f.is_scroll_pose(), scroll);
    assert_eq!(f.raised_count(), raised);
}

#[test]
fn test_is_raised_matches_fields() {
    let f = FingerStates::new(true, false, true, false, true);
    let raised: Vec<Finger> = Finger::iter().filter(|&x| f.is_raised(x)).collect();
    assert_eq!(raised, vec![Finger::Thumb, Finger::Middle, Finger::Pinky]);
}

// --- DISTANCES ---
#[test]
fn test_pinch_distances_are_planar() {
    let mut points = [Point::default(); LANDMARK_COUNT];
    points[index::THUMB_TIP] = Point { x: 0.0, y: 0.0, z: 50.0 };
    points[index::INDEX_TIP] = Point { x: 3.0, y: 4.0, z: -50.0 };
    points[index::MIDDLE_TIP] = Point::new(3.0, 16.0);
    let hand = LandmarkSnapshot::new(Duration::ZERO, HandSide::Right, points);

    let d = pinch_distances(&hand);
    assert!((d.thumb_index - 5.0).abs() < 1e-5);
    assert!((d.index_middle - 12.0).abs() < 1e-5);
}

#[test]
fn test_pinch_pose_closes_distance() {
    let open = read_hand(&common::pointer().snapshot(Duration::ZERO), 2.0);
    let pinched = read_hand(&common::pointer_pinch().snapshot(Duration::ZERO), 2.0);

    assert!(open.distances.thumb_index > 40.0);
    assert!(pinched.distances.thumb_index < 40.0);
    // Pinching does not disturb the pointer pose.
    assert!(pinched.fingers.is_pointer_pose());

    let v = read_hand(&common::v_pinch().snapshot(Duration::ZERO), 2.0);
    assert!(v.distances.index_middle < 40.0);
    assert!(v.fingers.index && v.fingers.middle);
}
