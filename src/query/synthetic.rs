//! Synthetic bright-star fields
//!
//! Stars are spread uniformly over the sphere with a magnitude distribution
//! that grows ~2.5x per magnitude step, like the real sky.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

use crate::catalogs::StarRecord;
use crate::coordinates::normalize_ra;

/// Brightest generated magnitude (about Sirius)
const MIN_MAGNITUDE: f64 = -1.5;
/// Faintest generated magnitude, just past naked-eye
const MAX_MAGNITUDE: f64 = 6.5;
/// Pogson ratio: star counts per magnitude step
const LOG_BASE: f64 = 2.5;

/// First synthetic source id, well clear of real Gaia ids
const FIRST_SOURCE_ID: u64 = 5_900_000_000_000_000_000;

/// Generate `count` stars from a seeded RNG
pub fn generate_bright_stars(seed: u64, count: usize) -> Vec<StarRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    let unit = Uniform::from(0.0..1.0);
    let z_dist = Uniform::from(-1.0..1.0);
    // 2.5 to 400 mas: 2.5 pc to 400 pc
    let parallax_dist = Uniform::from(2.5..400.0);

    let exp_range = LOG_BASE.powf(MAX_MAGNITUDE - MIN_MAGNITUDE) - 1.0;

    (0..count)
        .map(|i| {
            // Uniform point on the unit sphere
            let z: f64 = z_dist.sample(&mut rng);
            let phi: f64 = unit.sample(&mut rng) * 2.0 * PI;
            let dec = z.asin().to_degrees();
            let ra = normalize_ra(phi.to_degrees());

            let t: f64 = unit.sample(&mut rng) * exp_range + 1.0;
            let magnitude =
                MIN_MAGNITUDE + t.log(LOG_BASE).clamp(0.0, MAX_MAGNITUDE - MIN_MAGNITUDE);

            StarRecord::new(
                FIRST_SOURCE_ID.wrapping_add(i as u64).to_string(),
                ra,
                dec,
                parallax_dist.sample(&mut rng),
                magnitude,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let stars = generate_bright_stars(7, 2000);
        assert_eq!(stars.len(), 2000);

        for star in &stars {
            assert!((0.0..360.0).contains(&star.ra));
            assert!((-90.0..=90.0).contains(&star.dec));
            assert!(star.parallax > 0.0);
            assert!((MIN_MAGNITUDE..=MAX_MAGNITUDE).contains(&star.magnitude));
        }
    }

    #[test]
    fn test_fainter_stars_dominate() {
        let stars = generate_bright_stars(1, 5000);
        let bright = stars.iter().filter(|s| s.magnitude < 2.0).count();
        let faint = stars.iter().filter(|s| s.magnitude >= 5.0).count();
        assert!(faint > bright, "faint={} bright={}", faint, bright);
    }

    #[test]
    fn test_seed_changes_field() {
        assert_ne!(generate_bright_stars(1, 10), generate_bright_stars(2, 10));
    }
}
