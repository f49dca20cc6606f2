//! Shape parameters and box geometry
//!
//! A spawned shape is a randomly sized, colored and rotated circle, square or
//! triangle centered on the spawn point. Triangles are drawn CSS-style as a
//! zero-size box with transparent side borders and a colored bottom border.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::recycler::Element;

/// Shape types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle];

    /// CSS class name
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
        }
    }
}

/// HSL color, saturation/lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    /// Bright, saturated colors only
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            hue: rng.random_range(0..=360),
            saturation: rng.random_range(60..=90),
            lightness: rng.random_range(45..=65),
        }
    }

    /// CSS color level 4 syntax, e.g. `hsl(200 75% 50%)`
    pub fn css(&self) -> String {
        format!("hsl({} {}% {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Triangle border widths (px)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleBorders {
    /// Transparent left and right borders
    pub side: f32,
    /// Colored bottom border (triangle height)
    pub bottom: f32,
}

/// Resolved box geometry, relative to the surface's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Set for triangles only
    pub borders: Option<TriangleBorders>,
}

/// Everything needed to display one shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub kind: ShapeKind,
    /// Spawn point (surface coordinates)
    pub center: Vec2,
    /// Nominal size in px
    pub size: u32,
    pub color: Hsl,
    pub rotation_deg: u32,
    pub opacity: f32,
}

impl ShapeStyle {
    /// Random shape at `center`
    pub fn random(rng: &mut impl Rng, center: Vec2) -> Self {
        let kind = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];
        let size = rng.random_range(SHAPE_SIZE_MIN..=SHAPE_SIZE_MAX);
        let color = Hsl::random(rng);
        let rotation_deg = rng.random_range(0..=360);
        Self {
            kind,
            center,
            size,
            color,
            rotation_deg,
            opacity: 1.0,
        }
    }

    pub fn layout(&self) -> Layout {
        let size = self.size as f32;
        match self.kind {
            ShapeKind::Triangle => {
                let side = (size * 0.6).round();
                let bottom = (size * 1.2).round();
                Layout {
                    left: self.center.x - side,
                    top: self.center.y - bottom,
                    width: 0.0,
                    height: 0.0,
                    borders: Some(TriangleBorders { side, bottom }),
                }
            }
            ShapeKind::Circle | ShapeKind::Square => Layout {
                left: self.center.x - size / 2.0,
                top: self.center.y - size / 2.0,
                width: size,
                height: size,
                borders: None,
            },
        }
    }
}

/// Presentation side of a recycled element
pub trait Shape: Element {
    /// Apply `style` and make the element visible
    fn show(&mut self, style: &ShapeStyle);
}

/// In-memory shape, used on native builds and in tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeState {
    /// Currently displayed style, `None` when hidden
    pub style: Option<ShapeStyle>,
    pub layout: Option<Layout>,
}

impl ShapeState {
    pub fn is_visible(&self) -> bool {
        self.style.is_some_and(|s| s.opacity > 0.0)
    }
}

impl Element for ShapeState {
    fn reset(&mut self) {
        self.style = None;
        self.layout = None;
    }

    fn release(self) {}
}

impl Shape for ShapeState {
    fn show(&mut self, style: &ShapeStyle) {
        self.style = Some(*style);
        self.layout = Some(style.layout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn style(kind: ShapeKind, size: u32) -> ShapeStyle {
        ShapeStyle {
            kind,
            center: Vec2::new(200.0, 300.0),
            size,
            color: Hsl {
                hue: 10,
                saturation: 70,
                lightness: 50,
            },
            rotation_deg: 45,
            opacity: 1.0,
        }
    }

    #[test]
    fn test_square_layout_centered() {
        let layout = style(ShapeKind::Square, 40).layout();
        assert_eq!(layout.left, 180.0);
        assert_eq!(layout.top, 280.0);
        assert_eq!(layout.width, 40.0);
        assert_eq!(layout.height, 40.0);
        assert!(layout.borders.is_none());
    }

    #[test]
    fn test_triangle_layout_uses_borders() {
        let layout = style(ShapeKind::Triangle, 50).layout();
        let borders = layout.borders.expect("triangle borders");
        assert_eq!(borders.side, 30.0);
        assert_eq!(borders.bottom, 60.0);
        assert_eq!(layout.left, 170.0);
        assert_eq!(layout.top, 240.0);
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 0.0);
    }

    #[test]
    fn test_random_params_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut kinds = [false; 3];
        for _ in 0..500 {
            let s = ShapeStyle::random(&mut rng, Vec2::ZERO);
            assert!((SHAPE_SIZE_MIN..=SHAPE_SIZE_MAX).contains(&s.size));
            assert!(s.rotation_deg <= 360);
            assert!(s.color.hue <= 360);
            assert!((60..=90).contains(&s.color.saturation));
            assert!((45..=65).contains(&s.color.lightness));
            kinds[s.kind as usize] = true;
        }
        assert!(kinds.iter().all(|k| *k), "every kind should appear");
    }

    #[test]
    fn test_hsl_css() {
        let c = Hsl {
            hue: 200,
            saturation: 75,
            lightness: 50,
        };
        assert_eq!(c.css(), "hsl(200 75% 50%)");
    }

    #[test]
    fn test_reset_hides_shape() {
        let mut shape = ShapeState::default();
        shape.show(&style(ShapeKind::Circle, 30));
        assert!(shape.is_visible());
        shape.reset();
        assert_eq!(shape, ShapeState::default());
        assert!(!shape.is_visible());
    }
}
