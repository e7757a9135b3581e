pub mod pose;
pub mod state;

pub use pose::{pose, status_line, Pose};
pub use state::{AnimationState, AvatarContext, AvatarSnapshot, MoodAnnotation};
