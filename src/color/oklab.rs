//! OkLab 混色與距離

use super::{Argb, Hct};
use palette::convert::FromColorUnclamped;
use palette::{FromColor, LinSrgb, Mix, Oklab};

#[must_use]
pub fn from_argb(color: Argb) -> Oklab {
    Oklab::from_color(color.to_linear())
}

/// 不經過 8-bit 量化直接轉到色相空間
#[must_use]
pub fn to_hct(color: Oklab) -> Hct {
    let linear: LinSrgb = LinSrgb::from_color_unclamped(color);
    Hct::from_linear(linear)
}

#[must_use]
pub fn to_argb(color: Oklab) -> Argb {
    Argb::from_linear(LinSrgb::from_color_unclamped(color))
}

/// 線性內插：`ratio = 0` 為 `from`，`ratio = 1` 為 `to`
#[must_use]
pub fn mix(from: Oklab, to: Oklab, ratio: f64) -> Oklab {
    from.mix(to, ratio.clamp(0.0, 1.0) as f32)
}

#[must_use]
pub fn distance(a: Oklab, b: Oklab) -> f64 {
    let dl = f64::from(a.l - b.l);
    let da = f64::from(a.a - b.a);
    let db = f64::from(a.b - b.b);
    (dl * dl + da * da + db * db).sqrt()
}
