//! Crater-field synthesis: bowl/rim profiles and the stamping pipeline
//!
//! A synthesis run is strictly sequential: noisy base terrain, a field of
//! randomly placed craters, one large prominent crater, then a clamp to
//! [0, 1]. Base noise draws from an entropy-seeded generator and differs
//! between runs; crater placement draws from its own seeded generator and
//! is reproducible from `SynthesisParams::seed`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::Error;
use crate::heightmap::Heightmap;

/// Elevation of undisturbed terrain
pub const BASE_LEVEL: f32 = 0.5;

/// Rim width of the random craters, in cells
const RIM_WIDTH: f32 = 10.0;

/// Parameters controlling crater-field synthesis
#[derive(Clone, Debug)]
pub struct SynthesisParams {
    pub width: u32,
    pub height: u32,
    /// Number of randomly placed craters
    pub crater_count: u32,
    /// Seed for crater placement (base noise is seeded independently)
    pub seed: u64,
    /// Amplitude of the per-cell base noise; 0.0 disables it
    pub base_noise: f32,
    /// The large prominent crater stamped after the random field
    pub large_crater: LargeCrater,
}

impl SynthesisParams {
    /// Params for a `width` x `height` field with `crater_count` random
    /// craters and the large crater in its default southern position.
    pub fn new(width: u32, height: u32, crater_count: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            crater_count,
            seed,
            base_noise: 0.05,
            large_crater: LargeCrater::southern(width, height),
        }
    }
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self::new(1024, 512, 60, 42)
    }
}

/// The large prominent crater.
///
/// Unlike the random craters, this one is clipped at the image edges
/// rather than wrapped around them.
#[derive(Clone, Copy, Debug)]
pub struct LargeCrater {
    pub cx: i64,
    pub cy: i64,
    pub radius: f32,
    pub depth: f32,
    pub rim_height: f32,
    pub rim_width: f32,
}

impl LargeCrater {
    /// Default placement: horizontal center, 75% down the vertical extent.
    pub fn southern(width: u32, height: u32) -> Self {
        Self {
            cx: (width / 2) as i64,
            cy: (height as f32 * 0.75) as i64,
            radius: 150.0,
            depth: 0.6,
            rim_height: 0.2,
            rim_width: 20.0,
        }
    }
}

/// A single random crater. Ephemeral: drawn, stamped, discarded.
#[derive(Clone, Copy, Debug)]
pub struct Crater {
    pub cx: i64,
    pub cy: i64,
    pub radius: f32,
    pub depth: f32,
    /// None = no rim
    pub rim_height: Option<f32>,
}

impl Crater {
    /// Draw one crater from the placement stream. The per-crater draw
    /// order (cx, cy, radius, depth, rim) is fixed; changing it changes
    /// every map generated from a given seed.
    fn draw(rng: &mut ChaCha8Rng, width: u32, height: u32) -> Self {
        let cx = rng.random_range(0..width as i64);
        let cy = rng.random_range(0..height as i64);
        let radius = rng.random_range(20..=100u32) as f32;
        let depth: f32 = rng.random_range(0.2..0.5);
        let rim_height = if rng.random::<f32>() < 0.7 {
            Some(rng.random_range(0.05f32..0.15))
        } else {
            None
        };
        Self { cx, cy, radius, depth, rim_height }
    }
}

/// Depression profile inside a crater: zero at the center, full depth at
/// the rim edge. `t` is `dist / radius` in [0, 1].
#[inline]
fn bowl(t: f32) -> f32 {
    1.0 - (1.0 - t * t).powi(2)
}

/// Rim profile outside the crater edge: a bump that peaks at the edge and
/// decays to zero one rim-width out. `t` is `(dist - radius) / rim_width`
/// in [0, 1].
#[inline]
fn rim(t: f32) -> f32 {
    (1.0 - t) * (-2.0 * t).exp()
}

/// Stamp a random crater with toroidal wrap: cells past an edge land on
/// the opposite side, so craters tile seamlessly.
pub fn stamp_wrapped(map: &mut Heightmap, crater: &Crater) {
    let reach = (crater.radius + RIM_WIDTH).ceil() as i64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist < crater.radius {
                let t = dist / crater.radius;
                map.add_wrapped(crater.cx + dx, crater.cy + dy, -crater.depth * bowl(t));
            } else if let Some(rim_height) = crater.rim_height {
                if dist < crater.radius + RIM_WIDTH {
                    let t = (dist - crater.radius) / RIM_WIDTH;
                    map.add_wrapped(crater.cx + dx, crater.cy + dy, rim_height * rim(t));
                }
            }
        }
    }
}

/// Stamp the large crater clipped to image bounds: cells past an edge are
/// dropped, never wrapped.
pub fn stamp_bounded(map: &mut Heightmap, crater: &LargeCrater) {
    let reach = (crater.radius + crater.rim_width).ceil() as i64;
    let (w, h) = (map.width() as i64, map.height() as i64);
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let x = crater.cx + dx;
            let y = crater.cy + dy;
            if x < 0 || x >= w || y < 0 || y >= h {
                continue;
            }
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist < crater.radius {
                let t = dist / crater.radius;
                map.add(x as u32, y as u32, -crater.depth * bowl(t));
            } else if dist < crater.radius + crater.rim_width {
                let t = (dist - crater.radius) / crater.rim_width;
                map.add(x as u32, y as u32, crater.rim_height * rim(t));
            }
        }
    }
}

/// Synthesize a crater heightmap: noisy base terrain, `crater_count`
/// randomly placed craters, the large crater, then a clamp to [0, 1].
pub fn synthesize(params: &SynthesisParams) -> Result<Heightmap, Error> {
    synthesize_with_base_rng(params, &mut rand::rng())
}

/// Like [`synthesize`], but drawing base noise from a caller-supplied
/// generator.
pub fn synthesize_with_base_rng(
    params: &SynthesisParams,
    base_rng: &mut impl Rng,
) -> Result<Heightmap, Error> {
    let mut map = Heightmap::filled(params.width, params.height, BASE_LEVEL)?;

    if params.base_noise > 0.0 {
        for y in 0..params.height {
            for x in 0..params.width {
                let noise = base_rng.random_range(-params.base_noise..params.base_noise);
                map.add(x, y, noise);
            }
        }
    }

    let mut crater_rng = ChaCha8Rng::seed_from_u64(params.seed);
    for _ in 0..params.crater_count {
        let crater = Crater::draw(&mut crater_rng, params.width, params.height);
        stamp_wrapped(&mut map, &crater);
    }

    let large = &params.large_crater;
    log::info!(
        "Large crater at: ({}, {}), radius: {}",
        large.cx, large.cy, large.radius
    );
    stamp_bounded(&mut map, large);

    map.clamp_unit();
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_large_crater() -> LargeCrater {
        LargeCrater {
            cx: 32,
            cy: 16,
            radius: 8.0,
            depth: 0.6,
            rim_height: 0.2,
            rim_width: 4.0,
        }
    }

    #[test]
    fn test_bowl_profile() {
        assert_eq!(bowl(0.0), 0.0);
        assert_eq!(bowl(1.0), 1.0);
        assert!((bowl(0.5) - 0.4375).abs() < 1e-6);
        // deepens monotonically toward the rim edge
        assert!(bowl(0.25) < bowl(0.5));
        assert!(bowl(0.5) < bowl(0.75));
    }

    #[test]
    fn test_rim_profile() {
        assert_eq!(rim(0.0), 1.0);
        assert_eq!(rim(1.0), 0.0);
        assert!(rim(0.5) > 0.0 && rim(0.5) < 1.0);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let params = SynthesisParams::new(0, 32, 5, 1);
        assert!(matches!(
            synthesize(&params),
            Err(Error::InvalidDimensions { width: 0, height: 32 })
        ));
    }

    #[test]
    fn test_output_size_and_range() {
        let mut params = SynthesisParams::new(64, 32, 5, 1);
        params.large_crater = small_large_crater();
        let map = synthesize(&params).unwrap();
        assert_eq!(map.width(), 64);
        assert_eq!(map.height(), 32);
        assert_eq!(map.as_slice().len(), 64 * 32);
        assert!(map.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));

        let bytes = map.quantize();
        assert_eq!(bytes.len(), 64 * 32);
    }

    #[test]
    fn test_reproducible_from_seed() {
        let mut params = SynthesisParams::new(128, 64, 10, 7);
        params.base_noise = 0.0;
        let a = synthesize(&params).unwrap();
        let b = synthesize(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reproducible_with_shared_base_noise() {
        let params = SynthesisParams::new(128, 64, 10, 7);
        let a =
            synthesize_with_base_rng(&params, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let b =
            synthesize_with_base_rng(&params, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a_params = SynthesisParams::new(128, 64, 10, 7);
        a_params.base_noise = 0.0;
        let mut b_params = a_params.clone();
        b_params.seed = 8;
        let a = synthesize(&a_params).unwrap();
        let b = synthesize(&b_params).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrapped_stamp_is_symmetric_across_edge() {
        let mut map = Heightmap::filled(64, 32, BASE_LEVEL).unwrap();
        let crater = Crater {
            cx: 0,
            cy: 16,
            radius: 8.0,
            depth: 0.3,
            rim_height: Some(0.1),
        };
        stamp_wrapped(&mut map, &crater);

        // bowl reaches across the x = 0 seam
        assert_eq!(map.get(1, 16), map.get(63, 16));
        assert_eq!(map.get(4, 16), map.get(60, 16));
        assert!(map.get(4, 16) < BASE_LEVEL);
        // rim ring wraps too
        assert_eq!(map.get(9, 16), map.get(55, 16));
        assert!(map.get(9, 16) > BASE_LEVEL);
    }

    #[test]
    fn test_bounded_stamp_does_not_wrap() {
        let mut map = Heightmap::filled(64, 32, BASE_LEVEL).unwrap();
        let mut crater = small_large_crater();
        crater.cx = 2;
        stamp_bounded(&mut map, &crater);

        assert!(map.get(2, 16) <= BASE_LEVEL);
        assert!(map.get(6, 16) < BASE_LEVEL);
        // opposite edge stays untouched
        for y in 0..32 {
            assert_eq!(map.get(63, y), BASE_LEVEL);
            assert_eq!(map.get(50, y), BASE_LEVEL);
        }
    }

    #[test]
    fn test_large_crater_depth_and_rim() {
        // unclamped stamp, default geometry
        let mut map = Heightmap::filled(1024, 512, BASE_LEVEL).unwrap();
        let crater = LargeCrater::southern(1024, 512);
        assert_eq!((crater.cx, crater.cy), (512, 384));
        stamp_bounded(&mut map, &crater);

        // center of the bowl profile is untouched; the deepest ring sits
        // just inside the rim edge
        assert_eq!(map.get(512, 384), BASE_LEVEL);
        let near_rim = map.get(512 + 149, 384);
        assert!(near_rim < BASE_LEVEL - 0.55);
        // rim is elevated just outside the edge
        assert!(map.get(512 + 151, 384) > BASE_LEVEL + 0.1);
        // profile vanishes past the rim width
        assert_eq!(map.get(512 + 171, 384), BASE_LEVEL);
    }

    #[test]
    fn test_only_large_crater_without_noise_or_field() {
        // 64x32, no random craters, noise off: every deviation from the
        // base level comes from the default large crater at (32, 24)
        let mut params = SynthesisParams::new(64, 32, 0, 1);
        params.base_noise = 0.0;
        let map = synthesize(&params).unwrap();

        // the radius-150 bowl covers the whole image, shallow near its
        // center and deeper toward the corners
        assert_eq!(map.get(32, 24), BASE_LEVEL);
        let corner = map.get(0, 0);
        assert!(corner < 0.45 && corner > 0.40);

        let bytes = map.quantize();
        assert_eq!(bytes[24 * 64 + 32], 128);
    }

    #[test]
    fn test_rimless_crater_leaves_surroundings_flat() {
        let mut map = Heightmap::filled(64, 32, BASE_LEVEL).unwrap();
        let crater = Crater {
            cx: 32,
            cy: 16,
            radius: 8.0,
            depth: 0.3,
            rim_height: None,
        };
        stamp_wrapped(&mut map, &crater);

        assert!(map.get(36, 16) < BASE_LEVEL);
        // no rim: cells between radius and radius + RIM_WIDTH stay flat
        assert_eq!(map.get(41, 16), BASE_LEVEL);
        assert_eq!(map.get(45, 16), BASE_LEVEL);
    }
}
