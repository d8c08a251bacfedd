use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point precision of the HSV lookup tables
const HSV_SHIFT: u32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);

/// Hue is stored halved so that it fits a byte
pub const HUE_RANGE: i32 = 180;

/// A pixel in 8-bit HSV: hue 0-179, saturation and value 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn from_rgb(pixel: Rgb<u8>) -> Self {
        rgb_to_hsv(pixel[0], pixel[1], pixel[2])
    }
}

fn saturation_divisor(v: i32) -> i32 {
    if v == 0 {
        return 0;
    }
    (((255 << HSV_SHIFT) as f64) / v as f64).round() as i32
}

fn hue_divisor(diff: i32) -> i32 {
    if diff == 0 {
        return 0;
    }
    (((HUE_RANGE << HSV_SHIFT) as f64) / (6.0 * diff as f64)).round() as i32
}

/// Convert an RGB triple to 8-bit HSV.
///
/// Uses the same fixed-point arithmetic as the common computer-vision
/// libraries, so thresholds tuned there select exactly the same pixels here.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (r, g, b) = (r as i32, g as i32, b as i32);

    let v = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = v - vmin;

    let s = (diff * saturation_divisor(v) + HSV_ROUND) >> HSV_SHIFT;

    let h = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (h * hue_divisor(diff) + HSV_ROUND) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    Hsv {
        h: h as u8,
        s: s as u8,
        v: v as u8,
    }
}

/// Inclusive box in HSV space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ThresholdRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        let channels = [hsv.h, hsv.s, hsv.v];
        channels
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(c, (lo, hi))| c >= lo && c <= hi)
    }

    /// Index of the first channel whose lower bound exceeds its upper bound
    pub fn inverted_channel(&self) -> Option<usize> {
        (0..3).find(|&i| self.lower[i] > self.upper[i])
    }
}

/// Corrosion categories reported by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CorrosionClass {
    /// Reddish-brown rust
    Red,
    /// Dark deposits, selected by brightness alone
    Black,
    /// Pale, washed-out oxide
    White,
}

impl CorrosionClass {
    pub const ALL: [CorrosionClass; 3] = [Self::Red, Self::Black, Self::White];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl fmt::Display for CorrosionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-pixel HSV view of an RGB image, computed once and reused by every rule
pub struct HsvImage {
    width: u32,
    height: u32,
    pixels: Vec<Hsv>,
}

impl HsvImage {
    pub fn from_rgb(img: &RgbImage) -> Self {
        let pixels = img.pixels().map(|p| Hsv::from_rgb(*p)).collect();
        Self {
            width: img.width(),
            height: img.height(),
            pixels,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Hsv {
        self.pixels[(y * self.width + x) as usize]
    }
}
