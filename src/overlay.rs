//! Draws the measured landmark segments and key points onto a copy of the
//! source image.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mesh::{LandmarkPair, KEY_POINTS, MEASURED_PAIRS};
use crate::types::{LandmarkSet, Point};

/// Segment colors in [`MEASURED_PAIRS`] order: eye yellow, nose magenta,
/// mouth cyan.
const DEFAULT_SEGMENT_COLORS: [Rgb<u8>; 3] = [
    Rgb([255, 255, 0]),
    Rgb([255, 0, 255]),
    Rgb([0, 255, 255]),
];
const DEFAULT_MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const DEFAULT_LINE_THICKNESS: u32 = 2;
const DEFAULT_MARKER_RADIUS: i32 = 3;

/// Overlay appearance as stored in configuration. Colors are `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub line_thickness: u32,
    pub marker_radius: i32,
    pub eye_color: String,
    pub nose_color: String,
    pub mouth_color: String,
    pub marker_color: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        let [eye, nose, mouth] = DEFAULT_SEGMENT_COLORS;
        Self {
            line_thickness: DEFAULT_LINE_THICKNESS,
            marker_radius: DEFAULT_MARKER_RADIUS,
            eye_color: to_hex(eye),
            nose_color: to_hex(nose),
            mouth_color: to_hex(mouth),
            marker_color: to_hex(DEFAULT_MARKER_COLOR),
        }
    }
}

/// Parse a `#RRGGBB` color.
pub fn parse_hex_color(hex: &str) -> Result<Rgb<u8>> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| Error::InvalidColor(hex.to_string()))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

fn to_hex(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Renders the analysis overlay. Built once from an [`OverlayStyle`].
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    segments: [(LandmarkPair, Rgb<u8>); 3],
    marker_color: Rgb<u8>,
    line_thickness: u32,
    marker_radius: i32,
}

impl OverlayRenderer {
    pub fn from_style(style: &OverlayStyle) -> Result<Self> {
        let segment_colors = [
            parse_hex_color(&style.eye_color)?,
            parse_hex_color(&style.nose_color)?,
            parse_hex_color(&style.mouth_color)?,
        ];
        Ok(Self::with_colors(
            segment_colors,
            parse_hex_color(&style.marker_color)?,
            style.line_thickness,
            style.marker_radius,
        ))
    }

    fn with_colors(
        segment_colors: [Rgb<u8>; 3],
        marker_color: Rgb<u8>,
        line_thickness: u32,
        marker_radius: i32,
    ) -> Self {
        Self {
            segments: std::array::from_fn(|i| (MEASURED_PAIRS[i], segment_colors[i])),
            marker_color,
            line_thickness: line_thickness.max(1),
            marker_radius: marker_radius.max(1),
        }
    }

    /// Return an annotated copy of `image`. Without landmarks the copy is
    /// unchanged. The caller's image is never modified.
    pub fn render(&self, image: &RgbImage, landmarks: Option<&LandmarkSet>) -> RgbImage {
        let mut canvas = image.clone();
        let Some(landmarks) = landmarks else {
            return canvas;
        };

        for (pair, color) in &self.segments {
            match (landmarks.get(pair.from), landmarks.get(pair.to)) {
                (Some(from), Some(to)) => {
                    draw_thick_line(&mut canvas, from, to, self.line_thickness, *color)
                }
                _ => warn!("skipping {} overlay: landmark index out of range", pair.name),
            }
        }

        for idx in KEY_POINTS {
            if let Some(p) = landmarks.get(idx) {
                draw_filled_circle_mut(&mut canvas, (p.x, p.y), self.marker_radius, self.marker_color);
            }
        }

        canvas
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::with_colors(
            DEFAULT_SEGMENT_COLORS,
            DEFAULT_MARKER_COLOR,
            DEFAULT_LINE_THICKNESS,
            DEFAULT_MARKER_RADIUS,
        )
    }
}

/// Draw `thickness` parallel one-pixel segments, stacked along the line's
/// minor axis.
fn draw_thick_line(img: &mut RgbImage, from: Point, to: Point, thickness: u32, color: Rgb<u8>) {
    let (x0, y0) = from.to_f32();
    let (x1, y1) = to.to_f32();
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let half = (thickness as i32 - 1) / 2;

    for i in 0..thickness as i32 {
        let offset = (i - half) as f32;
        let (ox, oy) = if steep { (offset, 0.0) } else { (0.0, offset) };
        draw_line_segment_mut(img, (x0 + ox, y0 + oy), (x1 + ox, y1 + oy), color);
    }
}
