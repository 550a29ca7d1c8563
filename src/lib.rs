// Gold sample position detection for the Rover Ruckus sampling field.
//
// The pipeline host hands the detector one RGB frame per camera update;
// the detector classifies where the gold sample sits relative to the two
// silver references (LEFT / MIDDLE / RIGHT), annotates the frame in
// place, and keeps a sticky estimate that a majority-vote query can
// aggregate over a window of frames.

pub mod config;
pub mod contours;
pub mod correlation;
pub mod detector;
pub mod overlay;
pub mod region_filter;
pub mod segmentation;
pub mod types;

pub use detector::SamplingDetector;
pub use types::{DetectorConfig, Frame, GoldPosition, Region};
