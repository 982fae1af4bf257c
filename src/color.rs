/// An RGBA color with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1., 1., 1.);
    pub const GRAY: Color = Color::rgb(0.533, 0.533, 0.533);
    pub const YELLOW: Color = Color::rgb(1., 1., 0.);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b, a: 1. }
    }

    /// Creates a color from packed `0xAARRGGBB`.
    pub fn from_argb(argb: u32) -> Color {
        let channel = |shift: u32| f64::from((argb >> shift) & 0xFF) / 255.;
        Color {
            r: channel(16),
            g: channel(8),
            b: channel(0),
            a: channel(24),
        }
    }
}

#[test]
fn test_from_argb() {
    let c = Color::from_argb(0xFF_FF_00_80);
    assert_eq!(c.a, 1.);
    assert_eq!(c.r, 1.);
    assert_eq!(c.g, 0.);
    assert!((c.b - 128. / 255.).abs() < 1e-12);
}
