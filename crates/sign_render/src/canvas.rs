//! The off-screen drawing surface (spec §4.2).
//!
//! `Canvas` owns a single BGRA pixel buffer, allocated once at startup and
//! reused every frame (spec §5 "Resource ownership": no per-frame
//! allocation on the hot path). It supports exactly the two drawable kinds
//! spec §4.2 names: filled rectangles and filled text.

use sign_core::{Dimensions, Frame};

/// Saved canvas context state, pushed/popped around each animation's draw
/// call (spec §4.2 step 4: "invoke its draw routine within a save/restore
/// pair").
#[derive(Clone, Copy)]
struct ContextState {
    global_alpha: f64,
}

pub struct Canvas {
    dims: Dimensions,
    buffer: Vec<u8>,
    stack: Vec<ContextState>,
    current: ContextState,
}

/// Horizontal text alignment, mirrors the canvas `textAlign` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }
}

/// Vertical text baseline, mirrors the canvas `textBaseline` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

impl TextBaseline {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "middle" => TextBaseline::Middle,
            "bottom" | "alphabetic" => TextBaseline::Bottom,
            _ => TextBaseline::Top,
        }
    }
}

impl Canvas {
    #[must_use]
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            buffer: vec![0u8; dims.byte_len()],
            stack: Vec::new(),
            current: ContextState { global_alpha: 1.0 },
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Clears the canvas to fully transparent black (spec §4.2 step 3).
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Pushes the current context state.
    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Pops the most recently saved context state.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.current.global_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Draws a filled, axis-aligned rectangle, alpha-blended onto the
    /// existing contents.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        let alpha = self.current.global_alpha;
        if alpha <= 0.0 || width <= 0 || height <= 0 {
            return;
        }
        for row in y..y + height {
            for col in x..x + width {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    /// Draws left-to-right ASCII text using the built-in bitmap font,
    /// scaled to `font_size` pixels tall.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: f64,
        color: u32,
        align: TextAlign,
        baseline: TextBaseline,
    ) {
        let alpha = self.current.global_alpha;
        if alpha <= 0.0 || text.is_empty() {
            return;
        }

        let scale = (font_size / crate::font::GLYPH_HEIGHT as f64).max(1.0);
        let glyph_w = (crate::font::GLYPH_WIDTH as f64 * scale).round() as i32;
        let glyph_h = (crate::font::GLYPH_HEIGHT as f64 * scale).round() as i32;
        let advance = glyph_w + (scale.round().max(1.0) as i32); // 1px (scaled) gap

        let total_width = advance * text.chars().count() as i32 - (scale.round().max(1.0) as i32);
        let origin_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - total_width / 2,
            TextAlign::Right => x - total_width,
        };
        let origin_y = match baseline {
            TextBaseline::Top => y,
            TextBaseline::Middle => y - glyph_h / 2,
            TextBaseline::Bottom => y - glyph_h,
        };

        let mut cursor_x = origin_x;
        for ch in text.chars() {
            let bitmap = crate::font::glyph(ch);
            for (row_idx, row_bits) in bitmap.iter().enumerate() {
                for col_idx in 0..crate::font::GLYPH_WIDTH {
                    let bit = (row_bits >> (crate::font::GLYPH_WIDTH - 1 - col_idx)) & 1;
                    if bit == 0 {
                        continue;
                    }
                    let px0 = cursor_x + (col_idx as f64 * scale).round() as i32;
                    let py0 = origin_y + (row_idx as f64 * scale).round() as i32;
                    let px1 = cursor_x + ((col_idx + 1) as f64 * scale).round() as i32;
                    let py1 = origin_y + ((row_idx + 1) as f64 * scale).round() as i32;
                    for py in py0..py1.max(py0 + 1) {
                        for px in px0..px1.max(px0 + 1) {
                            self.blend_pixel(px, py, color, alpha);
                        }
                    }
                }
            }
            cursor_x += advance;
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f64) {
        if x < 0 || y < 0 || x as u16 >= self.dims.width || y as u16 >= self.dims.height {
            return;
        }
        let idx = (y as usize * self.dims.width as usize + x as usize) * sign_core::BYTES_PER_PIXEL;
        let (r, g, b) = sign_core::values::split_rgb(color);
        let src = [b as u8, g as u8, r as u8, 255u8]; // BGRA
        for channel in 0..3 {
            let dst = f64::from(self.buffer[idx + channel]);
            let srcf = f64::from(src[channel]);
            self.buffer[idx + channel] = (srcf * alpha + dst * (1.0 - alpha)).round() as u8;
        }
        self.buffer[idx + 3] = 255;
    }

    /// Returns the canvas' raw pixel buffer as a flat BGRA byte sequence
    /// (spec §4.2 "Buffer export").
    #[must_use]
    pub fn get_image_data(&self) -> Frame {
        Frame::from_bytes(self.dims, self.buffer.clone())
            .expect("canvas buffer length always matches its own dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_zeroes_buffer() {
        let mut canvas = Canvas::new(Dimensions::new(4, 4));
        canvas.fill_rect(0, 0, 4, 4, 0xFFFFFF);
        canvas.clear();
        assert!(canvas.get_image_data().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_rect_writes_bgra_bytes() {
        let mut canvas = Canvas::new(Dimensions::new(2, 2));
        canvas.fill_rect(0, 0, 1, 1, 0x112233);
        let frame = canvas.get_image_data();
        assert_eq!(frame.pixel(0, 0), Some([0x33, 0x22, 0x11, 255]));
        assert_eq!(frame.pixel(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn global_alpha_blends_toward_background() {
        let mut canvas = Canvas::new(Dimensions::new(1, 1));
        canvas.save();
        canvas.set_global_alpha(0.5);
        canvas.fill_rect(0, 0, 1, 1, 0xFFFFFF);
        canvas.restore();
        let frame = canvas.get_image_data();
        assert_eq!(frame.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn restore_reverts_alpha_after_save() {
        let mut canvas = Canvas::new(Dimensions::new(1, 1));
        canvas.save();
        canvas.set_global_alpha(0.0);
        canvas.restore();
        canvas.fill_rect(0, 0, 1, 1, 0xFFFFFF);
        let frame = canvas.get_image_data();
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn fill_text_draws_something_for_a_known_glyph() {
        let mut canvas = Canvas::new(Dimensions::new(20, 20));
        canvas.fill_text("H", 2, 2, 5.0, 0xFFFFFF, TextAlign::Left, TextBaseline::Top);
        let frame = canvas.get_image_data();
        assert!(frame.as_bytes().iter().any(|&b| b != 0));
    }
}
