use crate::color::{Argb, Hct, normalize_degrees};
use crate::component::palette_cache::QuantizedSample;
use std::collections::BTreeMap;
use thiserror::Error;

/// 色彩角色名稱對應顏色，例如 `primary`、`on_background`
pub type ColorMap = BTreeMap<String, Argb>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemeError {
    #[error("取樣中沒有任何顏色")]
    NoColorFound,
}

/// 由量化結果推導設計系統色彩
pub trait SchemeGenerator: Send + Sync {
    fn generate(&self, sample: &QuantizedSample, dark: bool) -> Result<ColorMap, SchemeError>;

    /// 直接以單一來源色推導，不經過取樣
    fn from_source(&self, source: Argb, dark: bool) -> ColorMap;
}

/// 找不到夠鮮豔的代表色時使用
pub const FALLBACK_SOURCE: Argb = Argb::from_rgb(0x42, 0x85, 0xf4);

/// 低於此彩度的代表色不列入主色候選
const MIN_SOURCE_CHROMA: f64 = 5.0;

const PRIMARY_MIN_CHROMA: f64 = 48.0;
const ERROR_HUE: f64 = 25.0;

/// 以主色色相為基礎的簡易色調方案
#[derive(Debug, Clone, Copy, Default)]
pub struct TonalScheme;

impl TonalScheme {
    /// 數量乘上彩度最高的代表色
    #[must_use]
    pub fn source_color(sample: &QuantizedSample) -> Option<Argb> {
        sample
            .population
            .iter()
            .filter_map(|(color, count)| {
                let hct = Hct::from_argb(*color);
                (hct.chroma >= MIN_SOURCE_CHROMA).then(|| (*color, f64::from(*count) * hct.chroma))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(color, _)| color)
    }
}

impl SchemeGenerator for TonalScheme {
    fn generate(&self, sample: &QuantizedSample, dark: bool) -> Result<ColorMap, SchemeError> {
        if sample.is_empty() {
            return Err(SchemeError::NoColorFound);
        }

        Ok(self.from_source(Self::source_color(sample).unwrap_or(FALLBACK_SOURCE), dark))
    }

    fn from_source(&self, source: Argb, dark: bool) -> ColorMap {
        let source = Hct::from_argb(source);
        let hue = source.hue;
        let accent = source.chroma.max(PRIMARY_MIN_CHROMA);

        // (深色模式 tone, 淺色模式 tone)
        let tone = |dark_tone: f64, light_tone: f64| if dark { dark_tone } else { light_tone };
        let role = |hue: f64, chroma: f64, tone: f64| Hct::new(hue, chroma, tone).to_argb();

        let background = role(hue, 4.0, tone(6.0, 98.0));
        let on_background = role(hue, 4.0, tone(90.0, 10.0));

        let entries = [
            ("primary", role(hue, accent, tone(80.0, 40.0))),
            ("on_primary", role(hue, accent, tone(20.0, 100.0))),
            ("secondary", role(hue, 16.0, tone(80.0, 40.0))),
            (
                "tertiary",
                role(normalize_degrees(hue + 60.0), 24.0, tone(80.0, 40.0)),
            ),
            ("error", role(ERROR_HUE, 84.0, tone(80.0, 40.0))),
            ("background", background),
            ("on_background", on_background),
            ("surface", background),
            ("on_surface", on_background),
            ("outline", role(hue, 8.0, tone(60.0, 50.0))),
        ];

        entries
            .into_iter()
            .map(|(name, color)| (name.to_string(), color))
            .collect()
    }
}
