use rand::{rngs::StdRng, Rng, SeedableRng};

/// A card torn loose from the layout, drifting with its own velocity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FloatingCard {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) w: f32,
    pub(crate) h: f32,
}

/// The "antigravity" toy: every card gets a random velocity and bounces off
/// the screen edges, one step per frame. The value itself is the stop
/// handle; dropping it discards the position list and the layout snaps back
/// to normal on the next frame.
pub(crate) struct DriftSim {
    cards: Vec<FloatingCard>,
}

impl DriftSim {
    /// Capture the current card rectangles (x, y, w, h) and set them loose.
    pub(crate) fn start(rects: &[(f32, f32, f32, f32)], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cards = rects
            .iter()
            .map(|&(x, y, w, h)| FloatingCard {
                x,
                y,
                vx: rng.gen_range(-2.0..2.0),
                vy: rng.gen_range(-1.0..1.0),
                w,
                h,
            })
            .collect();
        Self { cards }
    }

    pub(crate) fn cards(&self) -> &[FloatingCard] {
        &self.cards
    }

    /// One frame: integrate positions, reflect velocity at the walls and
    /// clamp back inside the bounds. Idempotent per frame, single writer.
    pub(crate) fn step(&mut self, width: f32, height: f32) {
        for c in &mut self.cards {
            c.x += c.vx;
            c.y += c.vy;

            if c.x <= 0.0 || c.x + c.w >= width {
                c.vx = -c.vx;
                c.x = c.x.clamp(0.0, (width - c.w).max(0.0));
            }
            if c.y <= 0.0 || c.y + c.h >= height {
                c.vy = -c.vy;
                c.y = c.y.clamp(0.0, (height - c.h).max(0.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_keep_their_sizes_and_count() {
        let sim = DriftSim::start(&[(1.0, 2.0, 10.0, 4.0), (5.0, 5.0, 8.0, 3.0)], 7);
        assert_eq!(sim.cards().len(), 2);
        assert_eq!(sim.cards()[0].w, 10.0);
        assert_eq!(sim.cards()[1].h, 3.0);
    }

    #[test]
    fn cards_stay_inside_the_bounds() {
        let (w, h) = (80.0, 24.0);
        let mut sim = DriftSim::start(
            &[(0.0, 0.0, 12.0, 5.0), (60.0, 18.0, 12.0, 5.0), (30.0, 10.0, 12.0, 5.0)],
            42,
        );
        for _ in 0..2000 {
            sim.step(w, h);
            for c in sim.cards() {
                assert!(c.x >= 0.0 && c.x + c.w <= w, "x={} w={}", c.x, c.w);
                assert!(c.y >= 0.0 && c.y + c.h <= h, "y={} h={}", c.y, c.h);
            }
        }
    }

    #[test]
    fn wall_contact_reflects_velocity() {
        let mut sim = DriftSim::start(&[(0.0, 5.0, 4.0, 2.0)], 1);
        // force a known velocity towards the left wall
        {
            let c = &mut sim.cards[0];
            c.vx = -1.5;
            c.vy = 0.0;
        }
        sim.step(40.0, 20.0);
        let c = sim.cards()[0];
        assert!(c.vx > 0.0);
        assert_eq!(c.x, 0.0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let rects = [(3.0, 3.0, 6.0, 2.0), (20.0, 8.0, 6.0, 2.0)];
        let mut a = DriftSim::start(&rects, 99);
        let mut b = DriftSim::start(&rects, 99);
        for _ in 0..50 {
            a.step(60.0, 20.0);
            b.step(60.0, 20.0);
        }
        for (ca, cb) in a.cards().iter().zip(b.cards()) {
            assert_eq!(ca.x, cb.x);
            assert_eq!(ca.y, cb.y);
        }
    }
}
