use crate::color::Argb;
use crate::tools::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 量化後的取樣結果，寫入快取後不再修改
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuantizedSample {
    /// 代表色與其像素數量
    pub population: BTreeMap<Argb, u32>,
    /// 依數量排序的小型調色盤，作為混色目標
    pub palette: Vec<Argb>,
}

impl QuantizedSample {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.population.is_empty() && self.palette.is_empty()
    }
}

/// 最近一次產生調色盤時使用的來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteState {
    pub path: PathBuf,
    pub hash: ContentHash,
    pub quantized: QuantizedSample,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_uses_hex_keys() {
        let mut sample = QuantizedSample::default();
        sample.population.insert(Argb::from_rgb(0xff, 0x00, 0x80), 7);
        sample.palette.push(Argb::from_rgb(0x10, 0x20, 0x30));

        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"#ff0080\":7"));
        assert!(json.contains("\"#102030\""));

        let back: QuantizedSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
