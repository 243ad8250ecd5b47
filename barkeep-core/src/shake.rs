use serde::Serialize;
use std::f64::consts::PI;

pub const DEFAULT_SHAKE_SECONDS: f64 = 3.0;
pub const INDICATOR_FREQUENCY_HZ: f64 = 0.75;
pub const SWEET_ZONE: (f64, f64) = (0.35, 0.65);

/// Chilling and melting multiplier applied to a container while it is shaken.
pub const SHAKE_AGITATION: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PressOutcome {
    Hit,
    Miss,
    Ignored,
}

/// Hold-to-shake session with a timing bonus.
///
/// Shaking completes once the accumulated shaking time reaches the required duration.
/// Presses are scored against an oscillating indicator and only affect `quality`.
#[derive(Debug, Clone, Serialize)]
pub struct ShakeMinigame {
    required_s: f64,
    elapsed_s: f64,
    hits: u32,
    misses: u32,
    completed: bool,
}

impl Default for ShakeMinigame {
    fn default() -> Self {
        Self::new(DEFAULT_SHAKE_SECONDS)
    }
}

impl ShakeMinigame {
    pub fn new(required_s: f64) -> Self {
        Self {
            required_s: required_s.max(0.0),
            elapsed_s: 0.0,
            hits: 0,
            misses: 0,
            completed: false,
        }
    }

    /// Returns true on the frame the session completes.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.completed || !(dt > 0.0) {
            return false;
        }
        self.elapsed_s += dt;
        if self.elapsed_s >= self.required_s {
            self.completed = true;
            return true;
        }
        false
    }

    pub fn indicator_position(&self) -> f64 {
        ((2.0 * PI * INDICATOR_FREQUENCY_HZ * self.elapsed_s).sin() + 1.0) / 2.0
    }

    pub fn press(&mut self) -> PressOutcome {
        if self.completed {
            return PressOutcome::Ignored;
        }
        let position = self.indicator_position();
        if position >= SWEET_ZONE.0 && position <= SWEET_ZONE.1 {
            self.hits += 1;
            PressOutcome::Hit
        } else {
            self.misses += 1;
            PressOutcome::Miss
        }
    }

    pub fn progress(&self) -> f64 {
        if self.required_s <= 0.0 {
            return 1.0;
        }
        (self.elapsed_s / self.required_s).min(1.0)
    }

    pub fn quality(&self) -> f64 {
        let presses = self.hits + self.misses;
        if presses == 0 {
            1.0
        } else {
            self.hits as f64 / presses as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_after_required_duration() {
        let mut shake = ShakeMinigame::new(1.0);
        let mut completions = 0;
        for _ in 0..30 {
            if shake.tick(0.05) {
                completions += 1;
            }
        }
        assert!(shake.is_complete());
        assert_eq!(completions, 1);
        assert_eq!(shake.progress(), 1.0);
    }

    #[test]
    fn press_scores_against_the_sweet_zone() {
        let mut shake = ShakeMinigame::new(10.0);
        // At t = 0 the indicator sits at the middle of its travel.
        assert_eq!(shake.press(), PressOutcome::Hit);

        // A third of a period later it is near the top.
        shake.tick(1.0 / (3.0 * INDICATOR_FREQUENCY_HZ));
        assert_eq!(shake.press(), PressOutcome::Miss);

        assert!((shake.quality() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn presses_after_completion_are_ignored() {
        let mut shake = ShakeMinigame::new(0.1);
        shake.tick(0.2);
        assert_eq!(shake.press(), PressOutcome::Ignored);
        assert_eq!(shake.quality(), 1.0);
    }
}
