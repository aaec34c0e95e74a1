use crate::color::{Argb, Hct, hue_distance, normalize_degrees, oklab};
use palette::Oklab;

/// 藍色與白色之間最小的色相差（度）
pub const MIN_BLUE_WHITE_SEPARATION: f64 = 60.0;

/// 將基底色混向主色或參考調色盤中最接近的顏色
pub struct Blender {
    ratio: f64,
    primary: Argb,
    targets: Vec<Oklab>,
}

impl Blender {
    /// `reference` 為空時只混向主色
    #[must_use]
    pub fn new(ratio: f64, primary: Argb, reference: &[Argb]) -> Self {
        let targets = std::iter::once(primary)
            .chain(reference.iter().copied())
            .map(oklab::from_argb)
            .collect();

        Self {
            ratio,
            primary,
            targets,
        }
    }

    #[must_use]
    pub fn blend(&self, color: Argb) -> Hct {
        if self.ratio <= 0.0 {
            return Hct::from_argb(color);
        }
        if self.ratio >= 1.0 {
            return Hct::from_argb(self.primary);
        }

        let source = oklab::from_argb(color);
        let target = self.nearest(source);
        oklab::to_hct(oklab::mix(source, target, self.ratio))
    }

    fn nearest(&self, source: Oklab) -> Oklab {
        self.targets
            .iter()
            .copied()
            .min_by(|a, b| oklab::distance(source, *a).total_cmp(&oklab::distance(source, *b)))
            .unwrap_or_else(|| oklab::from_argb(self.primary))
    }
}

/// 白色與藍色色相太接近時，把白色推到離藍色 60 度的位置
#[must_use]
pub fn separate_white_from_blue(blue: Hct, white: Hct) -> Hct {
    if hue_distance(blue.hue, white.hue) >= MIN_BLUE_WHITE_SEPARATION {
        return white;
    }

    // 往白色原本偏離的方向推開，重疊時順時針
    let offset = normalize_degrees(white.hue - blue.hue);
    let direction = if offset > 180.0 { -1.0 } else { 1.0 };
    white.with_hue(normalize_degrees(
        blue.hue + direction * MIN_BLUE_WHITE_SEPARATION,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORANGE: Argb = Argb::from_rgb(0xff, 0x88, 0x00);
    const TEAL: Argb = Argb::from_rgb(0x00, 0x80, 0x80);

    fn close(a: Hct, b: Hct) -> bool {
        (a.tone - b.tone).abs() < 0.5
            && (a.chroma - b.chroma).abs() < 0.5
            && (a.chroma < 1.0 || hue_distance(a.hue, b.hue) < 0.5)
    }

    #[test]
    fn test_ratio_zero_keeps_original() {
        let blender = Blender::new(0.0, TEAL, &[]);
        assert!(close(blender.blend(ORANGE), Hct::from_argb(ORANGE)));
    }

    #[test]
    fn test_ratio_one_returns_primary() {
        let blender = Blender::new(1.0, TEAL, &[Argb::from_rgb(0xff, 0x80, 0x00)]);
        assert!(close(blender.blend(ORANGE), Hct::from_argb(TEAL)));
    }

    #[test]
    fn test_half_ratio_is_oklab_midpoint() {
        let blender = Blender::new(0.5, TEAL, &[]);
        let expected = oklab::to_hct(oklab::mix(
            oklab::from_argb(ORANGE),
            oklab::from_argb(TEAL),
            0.5,
        ));
        assert!(close(blender.blend(ORANGE), expected));
    }

    #[test]
    fn test_blends_toward_nearest_reference() {
        let near_orange = Argb::from_rgb(0xf0, 0x90, 0x10);
        let blender = Blender::new(0.5, TEAL, &[near_orange]);
        let expected = oklab::to_hct(oklab::mix(
            oklab::from_argb(ORANGE),
            oklab::from_argb(near_orange),
            0.5,
        ));
        assert!(close(blender.blend(ORANGE), expected));
    }

    #[test]
    fn test_white_pushed_away_from_blue() {
        let blue = Hct::new(250.0, 50.0, 40.0);

        let white = separate_white_from_blue(blue, Hct::new(270.0, 5.0, 95.0));
        assert!((white.hue - 310.0).abs() < 1e-9);

        let white = separate_white_from_blue(blue, Hct::new(230.0, 5.0, 95.0));
        assert!((white.hue - 190.0).abs() < 1e-9);

        let far = Hct::new(90.0, 5.0, 95.0);
        assert_eq!(separate_white_from_blue(blue, far), far);
    }
}
