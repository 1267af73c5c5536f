/// Dominant color extraction
///
/// The image is decoded, converted to 8-bit RGB and downsampled to a fixed
/// size so clustering cost does not depend on the source resolution. Pixels
/// are then grouped with k-means and the centroid of the largest group wins.

use image::{imageops::FilterType, DynamicImage, ImageError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::debug;

use super::color::Rgb;
use crate::error::ExtractionError;

/// Side length of the square the image is resized to before clustering
const SAMPLE_SIZE: u32 = 128;

/// Tuning for the k-means pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterParams {
    /// Number of clusters
    pub k: usize,
    /// Seed for centroid initialization
    pub seed: u64,
    /// Lloyd iterations before giving up on convergence
    pub max_iterations: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            k: 3,
            seed: 0,
            max_iterations: 300,
        }
    }
}

/// Dominant color of the image at `path` with default clustering parameters
pub fn extract_dominant_color(path: &Path) -> Result<Rgb, ExtractionError> {
    extract_dominant_color_with(path, &ClusterParams::default())
}

pub fn extract_dominant_color_with(
    path: &Path,
    params: &ClusterParams,
) -> Result<Rgb, ExtractionError> {
    let img = image::open(path).map_err(|err| match err {
        ImageError::IoError(source) => ExtractionError::Open {
            path: path.to_path_buf(),
            source,
        },
        source => ExtractionError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    dominant_color_of(&img, params)
}

/// Dominant color of an already decoded image
pub fn dominant_color_of(
    img: &DynamicImage,
    params: &ClusterParams,
) -> Result<Rgb, ExtractionError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ExtractionError::EmptyImage);
    }

    let sample = img
        .resize_exact(SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle)
        .to_rgb8();

    let pixels: Vec<[f64; 3]> = sample
        .pixels()
        .map(|p| [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])])
        .collect();

    let mut rng = StdRng::seed_from_u64(params.seed);
    let (centroids, counts) = kmeans(&pixels, params.k.max(1), params.max_iterations, &mut rng);

    // Strict comparison keeps the first cluster on ties
    let mut best = 0;
    for (idx, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = idx;
        }
    }

    Ok(Rgb::from_channels(centroids[best]))
}

fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

fn nearest(pixel: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = distance_sq(pixel, centroid);
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the closest existing one.
fn init_centroids(pixels: &[[f64; 3]], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(pixels[rng.gen_range(0..pixels.len())]);

    while centroids.len() < k {
        let dists: Vec<f64> = pixels
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| distance_sq(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = dists.iter().sum();

        // Fewer distinct colors than clusters
        if total <= 0.0 {
            centroids.push(pixels[rng.gen_range(0..pixels.len())]);
            continue;
        }

        let mut target = rng.gen::<f64>() * total;
        let idx = dists
            .iter()
            .position(|&d| {
                target -= d;
                target <= 0.0
            })
            .unwrap_or(pixels.len() - 1);
        centroids.push(pixels[idx]);
    }

    centroids
}

/// Lloyd's algorithm. Returns the centroids and the member count of each.
fn kmeans(
    pixels: &[[f64; 3]],
    k: usize,
    max_iterations: usize,
    rng: &mut StdRng,
) -> (Vec<[f64; 3]>, Vec<usize>) {
    let mut centroids = init_centroids(pixels, k, rng);
    let mut labels = vec![usize::MAX; pixels.len()];

    for iteration in 0..max_iterations {
        let mut changed = false;
        for (label, pixel) in labels.iter_mut().zip(pixels) {
            let cluster = nearest(pixel, &centroids);
            if *label != cluster {
                *label = cluster;
                changed = true;
            }
        }

        if !changed {
            debug!(iteration, "k-means converged");
            break;
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (&label, pixel) in labels.iter().zip(pixels) {
            counts[label] += 1;
            for c in 0..3 {
                sums[label][c] += pixel[c];
            }
        }

        // Empty clusters keep their previous centroid
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count > 0 {
                let n = count as f64;
                *centroid = [sum[0] / n, sum[1] / n, sum[2] / n];
            }
        }
    }

    let mut counts = vec![0usize; k];
    for &label in &labels {
        if label < k {
            counts[label] += 1;
        }
    }

    (centroids, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb as Pixel, RgbImage};

    fn two_tone(width: u32, height: u32, split: u32, left: [u8; 3], right: [u8; 3]) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < split {
                Pixel(left)
            } else {
                Pixel(right)
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    fn close_to(actual: Rgb, expected: Rgb, tolerance: i32) -> bool {
        (i32::from(actual.r) - i32::from(expected.r)).abs() <= tolerance
            && (i32::from(actual.g) - i32::from(expected.g)).abs() <= tolerance
            && (i32::from(actual.b) - i32::from(expected.b)).abs() <= tolerance
    }

    #[test]
    fn test_uniform_image_returns_its_color() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Pixel([200, 10, 10])));
        let color = dominant_color_of(&img, &ClusterParams::default()).unwrap();
        assert_eq!(color, Rgb::new(200, 10, 10));
    }

    #[test]
    fn test_majority_color_wins() {
        let img = two_tone(128, 128, 96, [20, 40, 200], [250, 250, 250]);
        let color = dominant_color_of(&img, &ClusterParams::default()).unwrap();
        assert!(close_to(color, Rgb::new(20, 40, 200), 15), "got {color}");
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let img = two_tone(300, 200, 120, [90, 160, 30], [10, 10, 10]);
        let params = ClusterParams {
            seed: 42,
            ..ClusterParams::default()
        };
        let first = dominant_color_of(&img, &params).unwrap();
        let second = dominant_color_of(&img, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red_tee.png");
        RgbImage::from_pixel(16, 16, Pixel([255, 0, 0])).save(&path).unwrap();

        assert_eq!(extract_dominant_color(&path).unwrap().to_string(), "rgb(255,0,0)");
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(
            extract_dominant_color(&path),
            Err(ExtractionError::Decode { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = extract_dominant_color(Path::new("/nonexistent/shirt.jpg"));
        assert!(matches!(result, Err(ExtractionError::Open { .. })));
    }
}
