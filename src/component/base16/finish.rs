use crate::color::{Argb, Hct};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// 單一色階的明度與彩度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneChroma {
    pub tone: f64,
    pub chroma: f64,
}

impl ToneChroma {
    #[must_use]
    pub const fn new(tone: f64, chroma: f64) -> Self {
        Self { tone, chroma }
    }

    fn apply(self, color: Hct) -> Argb {
        Hct::new(color.hue, self.chroma, self.tone).to_argb()
    }

    fn validate(self, label: &str) -> Result<()> {
        if !self.tone.is_finite() || !(0.0..=100.0).contains(&self.tone) {
            bail!("{label} 的 tone 必須介於 0 到 100，目前為 {}", self.tone);
        }
        if !self.chroma.is_finite() || self.chroma < 0.0 {
            bail!("{label} 的 chroma 不可為負數，目前為 {}", self.chroma);
        }
        Ok(())
    }
}

/// 一般色與亮色的組合
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotFinish {
    pub normal: ToneChroma,
    pub bright: ToneChroma,
}

impl SlotFinish {
    #[must_use]
    pub const fn new(normal: ToneChroma, bright: ToneChroma) -> Self {
        Self { normal, bright }
    }

    /// 回傳 (一般色, 亮色)，保留輸入色的色相
    #[must_use]
    pub fn apply(&self, color: Hct) -> (Argb, Argb) {
        (self.normal.apply(color), self.bright.apply(color))
    }
}

/// 槽位的類別，決定使用哪一組明度與彩度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Black,
    White,
    Hue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeFinish {
    pub black: SlotFinish,
    pub white: SlotFinish,
    pub hue: SlotFinish,
}

impl ModeFinish {
    #[must_use]
    pub const fn slot(&self, kind: SlotKind) -> &SlotFinish {
        match kind {
            SlotKind::Black => &self.black,
            SlotKind::White => &self.white,
            SlotKind::Hue => &self.hue,
        }
    }
}

const DARK_SHADE: SlotFinish =
    SlotFinish::new(ToneChroma::new(5.0, 15.0), ToneChroma::new(15.0, 15.0));
const LIGHT_SHADE: SlotFinish =
    SlotFinish::new(ToneChroma::new(95.0, 10.0), ToneChroma::new(100.0, 10.0));

/// 深色 / 淺色模式的完整明度彩度對照表
///
/// 黑與白在兩種模式下互換：深色模式的白色是淺色模式的黑色。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishTable {
    pub dark: ModeFinish,
    pub light: ModeFinish,
}

impl Default for FinishTable {
    fn default() -> Self {
        Self {
            dark: ModeFinish {
                black: DARK_SHADE,
                white: LIGHT_SHADE,
                hue: SlotFinish::new(ToneChroma::new(50.0, 80.0), ToneChroma::new(70.0, 80.0)),
            },
            light: ModeFinish {
                black: LIGHT_SHADE,
                white: DARK_SHADE,
                hue: SlotFinish::new(ToneChroma::new(35.0, 100.0), ToneChroma::new(25.0, 100.0)),
            },
        }
    }
}

impl FinishTable {
    #[must_use]
    pub const fn mode(&self, dark: bool) -> &ModeFinish {
        if dark { &self.dark } else { &self.light }
    }

    #[must_use]
    pub fn apply(&self, dark: bool, kind: SlotKind, color: Hct) -> (Argb, Argb) {
        self.mode(dark).slot(kind).apply(color)
    }

    pub fn validate(&self) -> Result<()> {
        for (mode_name, mode) in [("dark", &self.dark), ("light", &self.light)] {
            for (slot_name, slot) in [
                ("black", &mode.black),
                ("white", &mode.white),
                ("hue", &mode.hue),
            ] {
                slot.normal
                    .validate(&format!("{mode_name}.{slot_name}.normal"))?;
                slot.bright
                    .validate(&format!("{mode_name}.{slot_name}.bright"))?;
            }
        }
        Ok(())
    }
}
