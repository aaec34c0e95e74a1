use crate::color::{Argb, oklab};
use crate::component::palette_cache::QuantizedSample;
use crate::tools::Cancelled;
use anyhow::Result;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

/// 代表色數量上限
pub const MAX_POPULATION_COLORS: usize = 128;

/// 混色目標調色盤大小上限
pub const MAX_PALETTE_COLORS: usize = 16;

const MAX_ITERATIONS: usize = 16;

/// 群心移動小於此距離視為收斂
const CONVERGENCE_DISTANCE: f32 = 1e-4;

/// 將像素量化成代表色與混色調色盤
pub trait Quantizer: Send + Sync {
    fn quantize(&self, pixels: &[Argb], shutdown_signal: &AtomicBool) -> Result<QuantizedSample>;
}

/// 在 OkLab 空間以像素數量加權的 k-means
///
/// 初始群心取數量最多的顏色，之後每次取離既有群心最遠的點，結果可重現。
#[derive(Debug, Clone, Copy)]
pub struct KMeansQuantizer {
    population_colors: usize,
    palette_colors: usize,
}

impl Default for KMeansQuantizer {
    fn default() -> Self {
        Self {
            population_colors: MAX_POPULATION_COLORS,
            palette_colors: MAX_PALETTE_COLORS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WeightedPoint {
    lab: [f32; 3],
    weight: u32,
}

impl KMeansQuantizer {
    #[must_use]
    pub fn new(population_colors: usize, palette_colors: usize) -> Self {
        Self {
            population_colors: population_colors.max(1),
            palette_colors: palette_colors.max(1),
        }
    }
}

impl Quantizer for KMeansQuantizer {
    fn quantize(&self, pixels: &[Argb], shutdown_signal: &AtomicBool) -> Result<QuantizedSample> {
        if pixels.is_empty() {
            return Ok(QuantizedSample::default());
        }

        let mut histogram: HashMap<Argb, u32> = HashMap::new();
        for pixel in pixels {
            *histogram.entry(*pixel).or_insert(0) += 1;
        }

        let mut points: Vec<WeightedPoint> = histogram
            .into_iter()
            .map(|(color, weight)| WeightedPoint {
                lab: to_array(color),
                weight,
            })
            .collect();
        // HashMap 順序不固定，排序後結果才可重現
        points.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| compare_lab(&a.lab, &b.lab)));

        let clusters = kmeans(&points, self.population_colors, shutdown_signal)?;
        let population = merge_clusters(&clusters);

        let mut palette_clusters = kmeans(&clusters, self.palette_colors, shutdown_signal)?;
        palette_clusters.sort_by(|a, b| b.weight.cmp(&a.weight));

        let mut palette: Vec<Argb> = Vec::with_capacity(palette_clusters.len());
        for cluster in palette_clusters {
            let color = to_argb(cluster.lab);
            if !palette.contains(&color) {
                palette.push(color);
            }
        }

        Ok(QuantizedSample {
            population,
            palette,
        })
    }
}

fn compare_lab(a: &[f32; 3], b: &[f32; 3]) -> std::cmp::Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or(std::cmp::Ordering::Equal)
}

fn to_array(color: Argb) -> [f32; 3] {
    let lab = oklab::from_argb(color);
    [lab.l, lab.a, lab.b]
}

fn to_argb(lab: [f32; 3]) -> Argb {
    oklab::to_argb(palette::Oklab::new(lab[0], lab[1], lab[2]))
}

fn squared_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

fn nearest(point: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(point, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}

/// 最遠點初始化：第一個點最重，之後取與既有群心最遠者
fn initial_centroids(points: &[WeightedPoint], k: usize) -> Vec<[f32; 3]> {
    let mut centroids = vec![points[0].lab];
    let mut min_distances: Vec<f32> = points
        .iter()
        .map(|p| squared_distance(&p.lab, &points[0].lab))
        .collect();

    while centroids.len() < k {
        let Some((index, distance)) = min_distances
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
        else {
            break;
        };
        if distance <= 0.0 {
            break;
        }

        let next = points[index].lab;
        centroids.push(next);
        for (d, p) in min_distances.iter_mut().zip(points) {
            *d = d.min(squared_distance(&p.lab, &next));
        }
    }

    centroids
}

/// 回傳非空群集的加權群心，權重為群內像素總數
fn kmeans(
    points: &[WeightedPoint],
    k: usize,
    shutdown_signal: &AtomicBool,
) -> Result<Vec<WeightedPoint>> {
    if points.len() <= k {
        return Ok(points.to_vec());
    }

    let mut centroids = initial_centroids(points, k);
    let mut assignments: Vec<usize> = vec![0; points.len()];

    for _ in 0..MAX_ITERATIONS {
        if shutdown_signal.load(Ordering::SeqCst) {
            return Err(Cancelled {
                task: "quantize".to_string(),
            }
            .into());
        }

        assignments = points
            .par_iter()
            .map(|p| nearest(&p.lab, &centroids))
            .collect();

        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        let mut weights = vec![0u64; centroids.len()];
        for (point, &cluster) in points.iter().zip(&assignments) {
            let w = f64::from(point.weight);
            for axis in 0..3 {
                sums[cluster][axis] += f64::from(point.lab[axis]) * w;
            }
            weights[cluster] += u64::from(point.weight);
        }

        let mut max_shift = 0.0f32;
        for (i, centroid) in centroids.iter_mut().enumerate() {
            if weights[i] == 0 {
                continue;
            }
            let total = weights[i] as f64;
            let updated = [
                (sums[i][0] / total) as f32,
                (sums[i][1] / total) as f32,
                (sums[i][2] / total) as f32,
            ];
            max_shift = max_shift.max(squared_distance(centroid, &updated).sqrt());
            *centroid = updated;
        }

        if max_shift < CONVERGENCE_DISTANCE {
            break;
        }
    }

    let mut weights = vec![0u32; centroids.len()];
    for (point, &cluster) in points.iter().zip(&assignments) {
        weights[cluster] = weights[cluster].saturating_add(point.weight);
    }

    Ok(centroids
        .into_iter()
        .zip(weights)
        .filter(|(_, weight)| *weight > 0)
        .map(|(lab, weight)| WeightedPoint { lab, weight })
        .collect())
}

/// 轉回 8-bit 後可能重疊，相同顏色合併數量
fn merge_clusters(clusters: &[WeightedPoint]) -> BTreeMap<Argb, u32> {
    let mut population = BTreeMap::new();
    for cluster in clusters {
        let count = population.entry(to_argb(cluster.lab)).or_insert(0u32);
        *count = count.saturating_add(cluster.weight);
    }
    population
}
