use super::engine::GeneratedPalette;
use crate::color::Argb;
use crate::component::base16::AnsiSlot;
use console::style;

/// 24-bit 背景色方塊
#[must_use]
pub fn swatch(color: Argb, width: usize) -> String {
    format!(
        "\x1b[48;2;{};{};{}m{}\x1b[0m",
        color.red(),
        color.green(),
        color.blue(),
        " ".repeat(width)
    )
}

#[must_use]
pub fn render_palette(generated: &GeneratedPalette) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} {}",
        style("來源:").dim(),
        generated.source
    ));
    lines.push(format!(
        "{} {}  {} {}",
        style("模式:").dim(),
        if generated.dark { "dark" } else { "light" },
        style("方法:").dim(),
        generated.method
    ));
    lines.push(String::new());

    for (name, color) in &generated.colors {
        lines.push(format!("  {} {:<14} {}", swatch(*color, 4), name, color));
    }
    lines.push(String::new());

    let colors = generated.base16.ansi_colors();
    let normal: String = colors[..8].iter().map(|c| swatch(*c, 4)).collect();
    let bright: String = colors[8..].iter().map(|c| swatch(*c, 4)).collect();
    lines.push(format!("  {normal}"));
    lines.push(format!("  {bright}"));
    lines.push(String::new());

    for slot in AnsiSlot::ALL {
        let pair = generated.base16.slot(slot);
        lines.push(format!(
            "  {:<8} {} {}  {} {}",
            slot.name(),
            swatch(pair.normal, 2),
            pair.normal,
            swatch(pair.bright, 2),
            pair.bright
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_escape() {
        let s = swatch(Argb::from_rgb(1, 2, 3), 2);
        assert_eq!(s, "\x1b[48;2;1;2;3m  \x1b[0m");
    }
}
