use super::Argb;
use palette::convert::FromColorUnclamped;
use palette::{FromColor, Lab, LinSrgb};
use serde::{Deserialize, Serialize};

/// 線性 sRGB 色域判斷的容許誤差
const GAMUT_EPSILON: f32 = 1e-4;

/// 降低彩度搜尋色域邊界的迭代次數
const GAMUT_SEARCH_STEPS: usize = 24;

/// 色相 / 彩度 / 明度
///
/// 以 CIE LCh(ab) 表示：`tone` 即 L*（0–100），`hue` 為 0–360 度的圓周角，
/// `chroma` 為 a*b* 平面上的半徑。轉回 `Argb` 時若超出 sRGB 色域，
/// 會保留色相與明度並降低彩度到可顯示的最大值。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hct {
    pub hue: f64,
    pub chroma: f64,
    pub tone: f64,
}

impl Hct {
    #[must_use]
    pub fn new(hue: f64, chroma: f64, tone: f64) -> Self {
        Self {
            hue: normalize_degrees(hue),
            chroma: chroma.max(0.0),
            tone: tone.clamp(0.0, 100.0),
        }
    }

    #[must_use]
    pub fn from_argb(color: Argb) -> Self {
        Self::from_linear(color.to_linear())
    }

    pub(crate) fn from_linear(linear: LinSrgb) -> Self {
        let lab: Lab = Lab::from_color_unclamped(linear);
        let (a, b) = (f64::from(lab.a), f64::from(lab.b));
        let chroma = a.hypot(b);
        let hue = if chroma < 1e-6 {
            0.0
        } else {
            normalize_degrees(b.atan2(a).to_degrees())
        };

        Self {
            hue,
            chroma,
            tone: f64::from(lab.l).clamp(0.0, 100.0),
        }
    }

    #[must_use]
    pub fn to_argb(self) -> Argb {
        let linear = to_linear(self.hue, self.chroma, self.tone);
        if in_gamut(&linear) {
            return Argb::from_linear(linear);
        }

        let (mut low, mut high) = (0.0, self.chroma);
        for _ in 0..GAMUT_SEARCH_STEPS {
            let mid = (low + high) / 2.0;
            if in_gamut(&to_linear(self.hue, mid, self.tone)) {
                low = mid;
            } else {
                high = mid;
            }
        }

        Argb::from_linear(to_linear(self.hue, low, self.tone))
    }

    #[must_use]
    pub fn with_hue(self, hue: f64) -> Self {
        Self::new(hue, self.chroma, self.tone)
    }
}

impl From<Argb> for Hct {
    fn from(color: Argb) -> Self {
        Self::from_argb(color)
    }
}

fn to_linear(hue: f64, chroma: f64, tone: f64) -> LinSrgb {
    let radians = hue.to_radians();
    let lab = Lab::new(
        tone as f32,
        (chroma * radians.cos()) as f32,
        (chroma * radians.sin()) as f32,
    );
    LinSrgb::from_color_unclamped(lab)
}

fn in_gamut(linear: &LinSrgb) -> bool {
    [linear.red, linear.green, linear.blue]
        .iter()
        .all(|c| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(c))
}

/// 將角度正規化到 `[0, 360)`
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// 兩個色相在圓周上的最短距離（0–180）
#[must_use]
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs().rem_euclid(360.0);
    diff.min(360.0 - diff)
}
