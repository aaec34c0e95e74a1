use crate::color::{Argb, Hct, hue_distance, normalize_degrees};
use log::debug;

/// 色相分布的最小跨度（度）
pub const MIN_HUE_SPREAD: f64 = 100.0;

/// 第一次補色的旋轉角度，之後每次加倍
const INITIAL_ROTATION: f64 = 80.0;

/// 補色次數上限，旋轉角度序列在此之前必定撐開跨度
const MAX_INJECTIONS: usize = 32;

/// 挑選的色相數量（red 到 cyan）
pub const HUE_SLOT_COUNT: usize = 6;

/// 取樣中最大與最小色相的差，少於兩色時為 0
#[must_use]
pub fn hue_spread(colors: &[Hct]) -> f64 {
    if colors.len() < 2 {
        return 0.0;
    }

    let (min, max) = colors
        .iter()
        .fold((f64::MAX, f64::MIN), |(min, max), c| {
            (min.min(c.hue), max.max(c.hue))
        });
    max - min
}

/// 色相過於集中時，旋轉既有取樣色補出新色
///
/// 空輸入回傳單一預設紅色。原有取樣保持在最前面，補出的顏色依序接在後方。
#[must_use]
pub fn ensure_hue_variety(colors: &[Hct], fallback: Argb) -> Vec<Hct> {
    if colors.is_empty() {
        return vec![Hct::from_argb(fallback)];
    }

    let mut out = colors.to_vec();
    let mut index = 0;
    let mut rotation = INITIAL_ROTATION;

    for _ in 0..MAX_INJECTIONS {
        if hue_spread(&out) >= MIN_HUE_SPREAD {
            break;
        }

        let base = colors[index];
        let injected = base.with_hue(normalize_degrees(base.hue + rotation));
        debug!("補充色相 {:.1}°", injected.hue);
        out.push(injected);

        index = (index + 1) % colors.len();
        rotation *= 2.0;
    }

    out
}

/// 貪婪最遠點法挑出 `k` 個色相差異最大的顏色，結果依色相遞增排序
///
/// 第一個取樣作為起點。數量不足 `k` 時全部回傳。
#[must_use]
pub fn select_colors(colors: &[Hct], k: usize) -> Vec<Hct> {
    let mut selected: Vec<Hct> = Vec::with_capacity(k.min(colors.len()));

    if colors.len() <= k {
        selected.extend_from_slice(colors);
    } else if k > 0 {
        let mut remaining: Vec<Hct> = colors[1..].to_vec();
        selected.push(colors[0]);

        while selected.len() < k && !remaining.is_empty() {
            let (best_index, _) = remaining
                .iter()
                .enumerate()
                .map(|(i, candidate)| (i, min_distance(candidate, &selected)))
                .fold((0, f64::MIN), |best, current| {
                    if current.1 > best.1 { current } else { best }
                });
            selected.push(remaining.swap_remove(best_index));
        }
    }

    selected.sort_by(|a, b| a.hue.total_cmp(&b.hue));
    selected
}

fn min_distance(candidate: &Hct, selected: &[Hct]) -> f64 {
    selected
        .iter()
        .map(|s| hue_distance(candidate.hue, s.hue))
        .fold(f64::MAX, f64::min)
}

/// 超出範圍時回傳全零的顏色
#[must_use]
pub fn color_at(colors: &[Hct], index: usize) -> Hct {
    colors.get(index).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hct(hue: f64) -> Hct {
        Hct::new(hue, 40.0, 50.0)
    }

    const RED: Argb = Argb::from_rgb(0xff, 0x00, 0x00);

    #[test]
    fn test_empty_input_uses_fallback() {
        let out = ensure_hue_variety(&[], RED);
        assert_eq!(out.len(), 1);
        assert!(hue_distance(out[0].hue, Hct::from_argb(RED).hue) < 1e-6);
    }

    #[test]
    fn test_narrow_hues_are_enriched() {
        let input = [hct(10.0), hct(20.0), hct(30.0)];
        let out = ensure_hue_variety(&input, RED);

        assert!(hue_spread(&out) >= MIN_HUE_SPREAD);
        assert_eq!(&out[..3], &input);
        // 10 + 80 = 90 仍不足，下一次 20 + 160 = 180 達標
        assert_eq!(out.len(), 5);
        assert!((out[3].hue - 90.0).abs() < 1e-9);
        assert!((out[4].hue - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_color_terminates() {
        for hue in [0.0, 45.0, 200.0, 300.0, 359.0] {
            let out = ensure_hue_variety(&[hct(hue)], RED);
            assert!(hue_spread(&out) >= MIN_HUE_SPREAD, "hue {hue}");
        }
    }

    #[test]
    fn test_wide_input_is_untouched() {
        let input = [hct(0.0), hct(120.0), hct(240.0)];
        assert_eq!(ensure_hue_variety(&input, RED), input.to_vec());
    }

    #[test]
    fn test_select_returns_k_sorted() {
        let input: Vec<Hct> = (0..20).map(|i| hct(f64::from(i) * 17.0)).collect();
        let selected = select_colors(&input, HUE_SLOT_COUNT);

        assert_eq!(selected.len(), HUE_SLOT_COUNT);
        assert!(selected.windows(2).all(|w| w[0].hue <= w[1].hue));
    }

    #[test]
    fn test_select_is_greedy_max_min() {
        let input = [hct(0.0), hct(5.0), hct(180.0), hct(90.0), hct(270.0), hct(10.0)];
        let selected = select_colors(&input, 4);
        let hues: Vec<f64> = selected.iter().map(|c| c.hue).collect();

        assert_eq!(hues, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_select_fewer_than_k_returns_all_sorted() {
        let input = [hct(200.0), hct(20.0)];
        let selected = select_colors(&input, HUE_SLOT_COUNT);

        assert_eq!(selected.len(), 2);
        assert!((selected[0].hue - 20.0).abs() < 1e-9);
        assert_eq!(color_at(&selected, 5), Hct::default());
    }
}
