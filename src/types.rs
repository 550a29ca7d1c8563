use serde::{Deserialize, Serialize};

/// One camera frame: tightly packed RGB, 3 bytes per pixel, row-major.
/// The pipeline host owns the buffer; the detector mutates it in place to
/// draw overlays.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 3],
            width,
            height,
        }
    }

    /// A frame is processable only if its buffer matches its dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() == self.width * self.height * 3
    }
}

/// Lateral position of the gold sample relative to the two silver references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldPosition {
    Left,
    Middle,
    Right,
    Unknown,
}

impl GoldPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoldPosition::Left => "LEFT",
            GoldPosition::Middle => "MIDDLE",
            GoldPosition::Right => "RIGHT",
            GoldPosition::Unknown => "UNKNOWN",
        }
    }
}

/// Axis-aligned bounding box of a connected color blob, plus its pixel area.
/// Valid only for the frame that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Number of foreground pixels in the blob (not width * height).
    pub area: usize,
}

impl Region {
    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.width as f32 / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 / 2.0
    }

    /// Width/height aspect ratio. Degenerate boxes report 0.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Inclusive HSV band on the OpenCV scale: H in [0,179], S and V in [0,255].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HsvBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBand {
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.lower[0]
            && h <= self.upper[0]
            && s >= self.lower[1]
            && s <= self.upper[1]
            && v >= self.lower[2]
            && v <= self.upper[2]
    }
}

/// Inclusive [min, max] band on blob pixel area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AreaBand {
    pub min: usize,
    pub max: usize,
}

impl AreaBand {
    pub fn contains(&self, area: usize) -> bool {
        area >= self.min && area <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub hsv: HsvBand,
    pub area: AreaBand,
    /// Reject boxes whose w/h ratio deviates from 1 by more than
    /// `squareness_tolerance`. Disabled when `check_squareness` is false.
    pub check_squareness: bool,
    pub squareness_tolerance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Max vertical center offset (px, inclusive) between a reference and
    /// the marker for the reference to count as level with it.
    pub vertical_tolerance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteConfig {
    /// Default number of frame ticks sampled by the aggregation query.
    pub window: usize,
    /// Max wait for the next frame update before the query gives up on the
    /// remaining ticks and returns the majority of what it has.
    pub tick_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub show_contours: bool,
    pub show_rectangles: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub gold: ColorConfig,
    pub silver: ColorConfig,
    /// 3x3 mean blur on the masks to merge speckle into solid blobs.
    pub blur_masks: bool,
    pub correlation: CorrelationConfig,
    pub vote: VoteConfig,
    pub overlay: OverlayConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            // Bands calibrated for the competition camera; HSV separates
            // gold from silver far better than raw RGB under gym lighting.
            gold: ColorConfig {
                hsv: HsvBand {
                    lower: [20, 80, 60],
                    upper: [32, 255, 255],
                },
                area: AreaBand {
                    min: 1000,
                    max: 40000,
                },
                check_squareness: true,
                squareness_tolerance: 0.35,
            },
            silver: ColorConfig {
                hsv: HsvBand {
                    lower: [0, 0, 140],
                    upper: [179, 15, 255],
                },
                area: AreaBand {
                    min: 400,
                    max: 20000,
                },
                check_squareness: false,
                squareness_tolerance: 0.5,
            },
            blur_masks: true,
            correlation: CorrelationConfig {
                vertical_tolerance: 60.0,
            },
            vote: VoteConfig {
                window: 30,
                tick_timeout_ms: 500,
            },
            overlay: OverlayConfig {
                show_contours: true,
                show_rectangles: true,
            },
        }
    }
}
