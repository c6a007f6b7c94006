use serde::{Deserialize, Serialize};

/// Pixel dimensions of the composite being laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Multiply both sides by `factor`, truncating to whole pixels.
    ///
    /// Each side grows by at least one pixel so that repeated growth always
    /// makes progress, even on tiny canvases where `floor(w * 1.2) == w`.
    pub fn grown(&self, factor: f64) -> Self {
        let grow = |side: u32| -> u32 {
            // Absorb float error so 10 * 1.2 lands on 12, not 11.
            let scaled = (side as f64 * factor + 1e-9).floor();
            let scaled = if scaled >= u32::MAX as f64 {
                u32::MAX
            } else {
                scaled as u32
            };
            scaled.max(side.saturating_add(1))
        };
        Self {
            width: grow(self.width),
            height: grow(self.height),
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_sequence() {
        let mut canvas = Canvas::new(10, 10);
        let mut widths = Vec::new();
        for _ in 0..4 {
            canvas = canvas.grown(1.2);
            widths.push(canvas.width);
        }
        assert_eq!(widths, vec![12, 14, 16, 19]);
    }

    #[test]
    fn test_growth_always_progresses() {
        let canvas = Canvas::new(1, 2).grown(1.2);
        assert_eq!(canvas, Canvas::new(2, 3));
    }

    #[test]
    fn test_growth_keeps_aspect_roughly() {
        let canvas = Canvas::new(400, 300).grown(1.2);
        assert_eq!(canvas, Canvas::new(480, 360));
        assert_eq!(canvas.area(), 480 * 360);
    }
}
