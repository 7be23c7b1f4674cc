//! Background video sources: client-side fallback order and deployment
//! verification for the hero video files.

pub mod playback;
pub mod verify;

pub use playback::{PlaybackState, VideoPlayback};
pub use verify::{
    classify_head, verify_all, verify_local, verify_remote, DeploymentVerdict, LocalCheck,
    RemoteCheck, SourceReport, VerificationReport,
};
