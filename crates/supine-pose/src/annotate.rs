//! In-place frame annotation: skeleton overlay and the classification label.
//!
//! Everything here draws directly into the RGB pixel buffer. Lines are
//! Bresenham with Cohen-Sutherland clipping, the label uses a small 5x7
//! bitmap font. Landmark positions arrive normalized and are scaled to
//! pixels against the frame dimensions.

use crate::{KeypointSet, Landmark};
use supine_image::RgbFrame;

const GREEN: [u8; 3] = [0, 255, 0];
const RED: [u8; 3] = [255, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// Skeleton edges over the COCO landmark vocabulary
const CONNECTIONS: [(Landmark, Landmark); 12] = [
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
];

/// Draw the skeletal overlay for one detected body.
///
/// Edges and joint dots are drawn only where both endpoints reach
/// `kp_threshold` confidence.
pub fn draw_skeleton(frame: &mut RgbFrame, keypoints: &KeypointSet, kp_threshold: f32) {
    let width = frame.width() as i32;
    let height = frame.height() as i32;

    for (a, b) in &CONNECTIONS {
        let pt_a = keypoints.get(*a);
        let pt_b = keypoints.get(*b);
        if pt_a.confidence < kp_threshold || pt_b.confidence < kp_threshold {
            continue;
        }
        draw_line(
            frame,
            (pt_a.x * width as f32) as i32,
            (pt_a.y * height as f32) as i32,
            (pt_b.x * width as f32) as i32,
            (pt_b.y * height as f32) as i32,
            GREEN,
        );
    }

    for kp in keypoints.iter() {
        if kp.confidence >= kp_threshold {
            draw_filled_circle(
                frame,
                (kp.x * width as f32) as i32,
                (kp.y * height as f32) as i32,
                3,
                WHITE,
            );
        }
    }
}

/// Overlay the classification label at a fixed screen position.
pub fn draw_classification_label(frame: &mut RgbFrame, lying: bool) {
    let (text, color) = if lying {
        ("LYING DOWN", RED)
    } else {
        ("NOT LYING DOWN", GREEN)
    };
    draw_label(frame, 16, 16, text, color, 3);
}

/// Draw a line using Bresenham's algorithm, clipped to the frame
pub fn draw_line(frame: &mut RgbFrame, mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32, color: [u8; 3]) {
    let width = frame.width() as i32;
    let height = frame.height() as i32;

    // Cohen-Sutherland clipping
    loop {
        let code0 = outcode(x0, y0, width, height);
        let code1 = outcode(x1, y1, width, height);

        if (code0 | code1) == 0 {
            break;
        }
        if (code0 & code1) != 0 {
            // Entirely outside one edge
            return;
        }

        let code = if code0 != 0 { code0 } else { code1 };
        let (x, y) = clip_point(x0, y0, x1, y1, code, width, height);
        if code == code0 {
            x0 = x;
            y0 = y;
        } else {
            x1 = x;
            y1 = y;
        }
    }

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(frame, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw a filled circle, clipped to the frame
pub fn draw_filled_circle(frame: &mut RgbFrame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                set_pixel(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Draw uppercase text with a 5x7 bitmap font at the given integer scale
pub fn draw_label(frame: &mut RgbFrame, x: i32, y: i32, text: &str, color: [u8; 3], scale: i32) {
    let mut pen_x = x;
    let advance = 6 * scale;

    for ch in text.chars().flat_map(|c| c.to_uppercase()) {
        if let Some(glyph) = glyph_bits(ch) {
            for (row, pattern) in glyph.iter().enumerate() {
                for col in 0..5 {
                    if (pattern >> (4 - col)) & 1 == 1 {
                        // One glyph cell becomes a scale x scale block
                        for sy in 0..scale {
                            for sx in 0..scale {
                                set_pixel(
                                    frame,
                                    pen_x + col * scale + sx,
                                    y + row as i32 * scale + sy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
        }
        pen_x += advance;
    }
}

fn set_pixel(frame: &mut RgbFrame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let idx = (y as usize * frame.width() as usize + x as usize) * 3;
    frame.data_mut()[idx..idx + 3].copy_from_slice(&color);
}

// Cohen-Sutherland region codes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(x: i32, y: i32, width: i32, height: i32) -> u8 {
    let mut code = INSIDE;
    if x < 0 {
        code |= LEFT;
    } else if x >= width {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y >= height {
        code |= BOTTOM;
    }
    code
}

fn clip_point(x0: i32, y0: i32, x1: i32, y1: i32, code: u8, width: i32, height: i32) -> (i32, i32) {
    let dx = x1 - x0;
    let dy = y1 - y0;

    if code & TOP != 0 {
        (x0 + dx * (0 - y0) / dy, 0)
    } else if code & BOTTOM != 0 {
        (x0 + dx * (height - 1 - y0) / dy, height - 1)
    } else if code & LEFT != 0 {
        (0, y0 + dy * (0 - x0) / dx)
    } else {
        (width - 1, y0 + dy * (width - 1 - x0) / dx)
    }
}

fn glyph_bits(ch: char) -> Option<[u8; 7]> {
    match ch {
        'D' => Some([
            0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110,
        ]),
        'G' => Some([
            0b01111, 0b10000, 0b10000, 0b10011, 0b10001, 0b10001, 0b01111,
        ]),
        'I' => Some([
            0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ]),
        'L' => Some([
            0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111,
        ]),
        'N' => Some([
            0b10001, 0b11001, 0b10101, 0b10101, 0b10011, 0b10001, 0b10001,
        ]),
        'O' => Some([
            0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ]),
        'T' => Some([
            0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
        ]),
        'W' => Some([
            0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010,
        ]),
        'Y' => Some([
            0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100,
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Keypoint, KeypointSet, LANDMARK_COUNT};

    fn black_frame(width: u32, height: u32) -> RgbFrame {
        RgbFrame::new(width, height, vec![0; (width * height * 3) as usize]).unwrap()
    }

    fn pixel(frame: &RgbFrame, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * frame.width() as usize + x as usize) * 3;
        let d = frame.data();
        [d[idx], d[idx + 1], d[idx + 2]]
    }

    #[test]
    fn test_draw_line_marks_endpoints() {
        let mut frame = black_frame(32, 32);
        draw_line(&mut frame, 2, 2, 20, 20, WHITE);
        assert_eq!(pixel(&frame, 2, 2), WHITE);
        assert_eq!(pixel(&frame, 20, 20), WHITE);
    }

    #[test]
    fn test_draw_line_fully_outside_is_noop() {
        let mut frame = black_frame(16, 16);
        draw_line(&mut frame, -10, -10, -1, -5, WHITE);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_draw_line_partially_outside_is_clipped() {
        let mut frame = black_frame(16, 16);
        draw_line(&mut frame, 8, 8, 100, 8, WHITE);
        assert_eq!(pixel(&frame, 8, 8), WHITE);
        assert_eq!(pixel(&frame, 15, 8), WHITE);
    }

    #[test]
    fn test_label_changes_pixels() {
        let mut frame = black_frame(320, 64);
        draw_classification_label(&mut frame, true);
        assert!(frame.data().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_skeleton_respects_confidence_threshold() {
        let mut frame = black_frame(64, 64);
        let keypoints = KeypointSet::new(
            [Keypoint {
                x: 0.5,
                y: 0.5,
                confidence: 0.1,
            }; LANDMARK_COUNT],
        );
        draw_skeleton(&mut frame, &keypoints, 0.5);
        assert!(frame.data().iter().all(|&b| b == 0));
    }
}
