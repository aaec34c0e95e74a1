use anyhow::{Result, bail};
use palette::{LinSrgb, Srgb};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid regex")
});

/// 不透明 8-bit 色彩，以 `0xAARRGGBB` 儲存
///
/// 序列化為 `#rrggbb` 字串，因此也能直接作為 JSON map 的 key。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Argb(pub u32);

impl Argb {
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(0xff00_0000 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16 & 0xff) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8 & 0xff) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// 解析 `#rgb` 或 `#rrggbb`（`#` 可省略，大小寫不拘）
    pub fn from_hex(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let Some(captures) = HEX_COLOR.captures(trimmed) else {
            bail!("無效的色碼: {value}");
        };

        let digits = &captures[1];
        let expanded = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect::<String>()
        } else {
            digits.to_string()
        };

        let rgb = u32::from_str_radix(&expanded, 16)?;
        Ok(Self(0xff00_0000 | rgb))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
    }

    pub(crate) fn to_linear(self) -> LinSrgb {
        let srgb = Srgb::new(
            f32::from(self.red()) / 255.0,
            f32::from(self.green()) / 255.0,
            f32::from(self.blue()) / 255.0,
        );
        srgb.into_linear()
    }

    /// 由線性 sRGB 編碼回 8-bit，超出範圍的分量直接截斷
    pub(crate) fn from_linear(linear: LinSrgb) -> Self {
        let srgb: Srgb = Srgb::from_linear(linear);
        let encode = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_rgb(encode(srgb.red), encode(srgb.green), encode(srgb.blue))
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Argb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Argb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}
