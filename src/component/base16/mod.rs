//! 16 色終端調色盤合成
//!
//! 兩種方式：
//! - static：8 個可設定的基底色混向主色（或參考調色盤中最接近的顏色）
//! - dynamic：直接從取樣色挑出色相差異最大的 6 色
//!
//! 每個槽位最後都經過 [`FinishTable`] 轉成一般色與亮色。

mod dynamic;
mod finish;
mod static_blend;

pub use dynamic::{
    HUE_SLOT_COUNT, MIN_HUE_SPREAD, color_at, ensure_hue_variety, hue_spread, select_colors,
};
pub use finish::{FinishTable, ModeFinish, SlotFinish, SlotKind, ToneChroma};
pub use static_blend::{Blender, MIN_BLUE_WHITE_SEPARATION, separate_white_from_blue};

use crate::color::{Argb, Hct};
use crate::config::{Base16Method, Base16Settings};
use serde::Serialize;
use std::fmt;

/// ANSI 的 8 個基本槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiSlot {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiSlot {
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }

    #[must_use]
    pub const fn kind(self) -> SlotKind {
        match self {
            Self::Black => SlotKind::Black,
            Self::White => SlotKind::White,
            _ => SlotKind::Hue,
        }
    }
}

impl fmt::Display for AnsiSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一般色與亮色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotPair {
    pub normal: Argb,
    pub bright: Argb,
}

/// 產生完成的 16 色調色盤
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Base16Palette {
    pub dark: bool,
    pub black: SlotPair,
    pub red: SlotPair,
    pub green: SlotPair,
    pub yellow: SlotPair,
    pub blue: SlotPair,
    pub magenta: SlotPair,
    pub cyan: SlotPair,
    pub white: SlotPair,
}

impl Base16Palette {
    fn empty(dark: bool) -> Self {
        Self {
            dark,
            black: SlotPair::default(),
            red: SlotPair::default(),
            green: SlotPair::default(),
            yellow: SlotPair::default(),
            blue: SlotPair::default(),
            magenta: SlotPair::default(),
            cyan: SlotPair::default(),
            white: SlotPair::default(),
        }
    }

    #[must_use]
    pub const fn slot(&self, slot: AnsiSlot) -> SlotPair {
        match slot {
            AnsiSlot::Black => self.black,
            AnsiSlot::Red => self.red,
            AnsiSlot::Green => self.green,
            AnsiSlot::Yellow => self.yellow,
            AnsiSlot::Blue => self.blue,
            AnsiSlot::Magenta => self.magenta,
            AnsiSlot::Cyan => self.cyan,
            AnsiSlot::White => self.white,
        }
    }

    fn slot_mut(&mut self, slot: AnsiSlot) -> &mut SlotPair {
        match slot {
            AnsiSlot::Black => &mut self.black,
            AnsiSlot::Red => &mut self.red,
            AnsiSlot::Green => &mut self.green,
            AnsiSlot::Yellow => &mut self.yellow,
            AnsiSlot::Blue => &mut self.blue,
            AnsiSlot::Magenta => &mut self.magenta,
            AnsiSlot::Cyan => &mut self.cyan,
            AnsiSlot::White => &mut self.white,
        }
    }

    /// 依 ANSI 0–15 的順序列出所有顏色
    #[must_use]
    pub fn ansi_colors(&self) -> [Argb; 16] {
        let mut colors = [Argb::default(); 16];
        for (i, slot) in AnsiSlot::ALL.into_iter().enumerate() {
            let pair = self.slot(slot);
            colors[i] = pair.normal;
            colors[i + 8] = pair.bright;
        }
        colors
    }
}

/// 依深淺模式與對照表填入槽位
struct PaletteBuilder<'a> {
    palette: Base16Palette,
    finish: &'a FinishTable,
}

impl<'a> PaletteBuilder<'a> {
    fn new(dark: bool, finish: &'a FinishTable) -> Self {
        Self {
            palette: Base16Palette::empty(dark),
            finish,
        }
    }

    fn set(&mut self, slot: AnsiSlot, color: Hct) -> &mut Self {
        let (normal, bright) = self.finish.apply(self.palette.dark, slot.kind(), color);
        *self.palette.slot_mut(slot) = SlotPair { normal, bright };
        self
    }

    fn build(self) -> Base16Palette {
        self.palette
    }
}

/// 合成所需的輸入色
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub primary: Argb,
    pub foreground: Argb,
    pub background: Argb,
    /// 量化後的參考調色盤
    pub samples: &'a [Argb],
}

#[must_use]
pub fn generate(
    settings: &Base16Settings,
    dark: bool,
    input: &SynthesisInput<'_>,
) -> Base16Palette {
    match settings.method {
        Base16Method::Static => generate_static(settings, dark, input.primary, input.samples),
        Base16Method::Dynamic => generate_dynamic(
            &settings.finish,
            dark,
            input.foreground,
            input.background,
            input.samples,
            settings.colors.red,
        ),
    }
}

/// 將 8 個基底色混向主色後套用對照表
#[must_use]
pub fn generate_static(
    settings: &Base16Settings,
    dark: bool,
    primary: Argb,
    reference: &[Argb],
) -> Base16Palette {
    let blender = Blender::new(settings.blend, primary, reference);
    let colors = &settings.colors;

    let blue = blender.blend(colors.blue);
    let white = separate_white_from_blue(blue, blender.blend(colors.white));

    let mut builder = PaletteBuilder::new(dark, &settings.finish);
    builder
        .set(AnsiSlot::White, white)
        .set(AnsiSlot::Black, blender.blend(colors.black))
        .set(AnsiSlot::Red, blender.blend(colors.red))
        .set(AnsiSlot::Green, blender.blend(colors.green))
        .set(AnsiSlot::Yellow, blender.blend(colors.yellow))
        .set(AnsiSlot::Blue, blue)
        .set(AnsiSlot::Magenta, blender.blend(colors.magenta))
        .set(AnsiSlot::Cyan, blender.blend(colors.cyan));
    builder.build()
}

/// 從取樣色挑出 6 個色相，前景色與背景色分別作為白與黑
#[must_use]
pub fn generate_dynamic(
    finish: &FinishTable,
    dark: bool,
    foreground: Argb,
    background: Argb,
    samples: &[Argb],
    fallback: Argb,
) -> Base16Palette {
    let hct: Vec<Hct> = samples.iter().copied().map(Hct::from_argb).collect();
    let selected = select_colors(&ensure_hue_variety(&hct, fallback), HUE_SLOT_COUNT);

    let mut builder = PaletteBuilder::new(dark, finish);
    builder
        .set(AnsiSlot::White, Hct::from_argb(foreground))
        .set(AnsiSlot::Black, Hct::from_argb(background));

    let hue_slots = [
        AnsiSlot::Red,
        AnsiSlot::Green,
        AnsiSlot::Yellow,
        AnsiSlot::Blue,
        AnsiSlot::Magenta,
        AnsiSlot::Cyan,
    ];
    for (i, slot) in hue_slots.into_iter().enumerate() {
        builder.set(slot, color_at(&selected, i));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hue_distance;

    fn sample_colors() -> Vec<Argb> {
        [
            "#d04030", "#30a050", "#e0c040", "#3050c0", "#a040b0", "#30b0c0", "#806040",
        ]
        .iter()
        .map(|hex| Argb::from_hex(hex).unwrap())
        .collect()
    }

    #[test]
    fn test_dynamic_hue_slots_ascend() {
        let settings = Base16Settings {
            method: Base16Method::Dynamic,
            ..Base16Settings::default()
        };
        let samples = sample_colors();
        let input = SynthesisInput {
            primary: samples[0],
            foreground: Argb::from_rgb(0xee, 0xee, 0xee),
            background: Argb::from_rgb(0x11, 0x11, 0x11),
            samples: &samples,
        };

        let palette = generate(&settings, true, &input);
        let hues: Vec<f64> = [
            AnsiSlot::Red,
            AnsiSlot::Green,
            AnsiSlot::Yellow,
            AnsiSlot::Blue,
            AnsiSlot::Magenta,
            AnsiSlot::Cyan,
        ]
        .iter()
        .map(|slot| Hct::from_argb(palette.slot(*slot).normal).hue)
        .collect();

        // 套用明度彩度後色相可能微幅偏移
        assert!(hues.windows(2).all(|w| w[0] <= w[1] + 5.0), "{hues:?}");
        assert!(palette.dark);
    }

    #[test]
    fn test_dynamic_black_and_white_follow_background() {
        let finish = FinishTable::default();
        let palette = generate_dynamic(
            &finish,
            true,
            Argb::from_rgb(0xee, 0xee, 0xee),
            Argb::from_rgb(0x11, 0x11, 0x11),
            &[],
            Argb::from_rgb(0xff, 0x00, 0x00),
        );

        let black = Hct::from_argb(palette.black.normal);
        let white = Hct::from_argb(palette.white.normal);
        assert!(black.tone < 10.0);
        assert!(white.tone > 90.0);
    }

    #[test]
    fn test_light_mode_inverts_black_and_white() {
        let settings = Base16Settings::default();
        let palette = generate_static(&settings, false, Argb::from_rgb(0x33, 0x66, 0x99), &[]);

        assert!(Hct::from_argb(palette.black.normal).tone > 90.0);
        assert!(Hct::from_argb(palette.white.normal).tone < 10.0);
        assert!(!palette.dark);
    }

    #[test]
    fn test_static_white_is_separated_from_blue() {
        let settings = Base16Settings {
            blend: 0.9,
            ..Base16Settings::default()
        };
        let palette = generate_static(&settings, true, Argb::from_rgb(0x20, 0x40, 0xe0), &[]);

        let blue = Hct::from_argb(palette.blue.normal);
        let white = Hct::from_argb(palette.white.normal);
        // 白色彩度低，轉換回來的色相誤差較大
        assert!(hue_distance(blue.hue, white.hue) > 45.0);
    }

    #[test]
    fn test_ansi_colors_order() {
        let settings = Base16Settings::default();
        let palette = generate_static(&settings, true, Argb::from_rgb(0x80, 0x40, 0x20), &[]);
        let colors = palette.ansi_colors();

        assert_eq!(colors[0], palette.black.normal);
        assert_eq!(colors[8], palette.black.bright);
        assert_eq!(colors[4], palette.blue.normal);
        assert_eq!(colors[15], palette.white.bright);
    }
}
