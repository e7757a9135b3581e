//! Per-frame pose computation.
//!
//! `pose` is a pure function of the animation state and elapsed time;
//! callers evaluate it every frame and apply the offsets to the rendered
//! figure. All offsets are relative to the rest pose.

use crate::state::AnimationState;
use serde::Serialize;

/// Pose offsets for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// Vertical bob of the whole body
    pub body_offset_y: f32,
    /// Lean toward the viewer (rotation about x)
    pub body_pitch: f32,
    /// Body turn (rotation about y)
    pub body_yaw: f32,
    /// Head nod (rotation about x)
    pub head_pitch: f32,
    /// Head turn (rotation about y)
    pub head_yaw: f32,
    /// Head tilt (rotation about z)
    pub head_roll: f32,
    /// Left wing flap (rotation about z)
    pub left_wing_roll: f32,
    /// Vertical eye scale; 1.0 open, 0.2 mid-blink
    pub eye_blink_scale: f32,
    /// Accent light while the assistant is thinking
    pub glow: bool,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            body_offset_y: 0.0,
            body_pitch: 0.0,
            body_yaw: 0.0,
            head_pitch: 0.0,
            head_yaw: 0.0,
            head_roll: 0.0,
            left_wing_roll: 0.0,
            eye_blink_scale: 1.0,
            glow: false,
        }
    }
}

/// Computes the pose for `state` at `elapsed` seconds.
pub fn pose(state: AnimationState, elapsed: f32) -> Pose {
    let t = elapsed;
    let mut pose = Pose::default();

    match state {
        AnimationState::Idle => {
            // Gentle bobbing with an occasional blink
            pose.body_offset_y = (t * 1.5).sin() * 0.1;
            pose.body_yaw = (t * 0.5).sin() * 0.05;
            pose.eye_blink_scale = if (t * 3.0).sin() > 0.95 { 0.2 } else { 1.0 };
        }
        AnimationState::Wave => {
            pose.left_wing_roll = (t * 8.0).sin() * 0.5 - 0.3;
            pose.body_offset_y = (t * 2.0).sin() * 0.15;
            pose.head_roll = (t * 4.0).sin() * 0.1;
        }
        AnimationState::Listen => {
            // Lean forward slightly
            pose.body_pitch = (t * 3.0).sin() * 0.1 + 0.1;
            pose.head_yaw = (t * 2.0).sin() * 0.15;
        }
        AnimationState::Responding => {
            pose.body_yaw = t.sin() * 0.2;
            pose.body_offset_y = (t * 2.0).sin() * 0.12;
            pose.head_pitch = (t * 1.5).sin() * 0.08;
            pose.glow = true;
        }
    }

    pose
}

/// Short caption shown under the avatar for each state.
pub fn status_line(state: AnimationState) -> &'static str {
    match state {
        AnimationState::Idle => "Ready to assist",
        AnimationState::Wave => "Greeting you",
        AnimationState::Listen => "Listening",
        AnimationState::Responding => "Thinking",
    }
}
