//! Cooperative property tweens and delayed events.
//!
//! Nothing here owns the values being animated. A [`Tweener`] only remembers
//! where each keyed property started, where it is heading and how far along
//! it is; every [`Tweener::step`] hands the current values back to the caller,
//! which writes them wherever the property actually lives.

use serde::{Deserialize, Serialize};

/// Two targets closer than this are treated as the same destination.
const SAME_TARGET_EPS: f32 = 1e-6;

/// Easing curves applied to normalized progress in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out: fast start, gentle arrival.
    #[default]
    Power1Out,
    /// Cubic ease-in-out.
    Power2InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Track<K> {
    key: K,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    ease: Ease,
}

impl<K> Track<K> {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    fn value(&self) -> f32 {
        let t = self.progress();
        if t >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * self.ease.apply(t)
        }
    }

    fn finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Keyed set of running tweens. At most one track exists per key.
#[derive(Debug, Clone)]
pub struct Tweener<K> {
    tracks: Vec<Track<K>>,
}

impl<K> Default for Tweener<K> {
    fn default() -> Self {
        Self { tracks: Vec::new() }
    }
}

impl<K: Copy + PartialEq> Tweener<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween of `key` from `from` toward `target` over `duration` seconds.
    ///
    /// A track already heading to the same target with the same duration keeps
    /// its progress, so re-requesting every frame still arrives on time. Any
    /// other running track for `key` is redirected and restarts from `from`.
    /// A non-positive duration lands on the target at the next [`step`](Self::step).
    pub fn to(&mut self, key: K, from: f32, target: f32, duration: f32, ease: Ease) {
        let fresh = Track {
            key,
            from,
            to: target,
            elapsed: 0.0,
            duration,
            ease,
        };
        match self.tracks.iter_mut().find(|t| t.key == key) {
            Some(track) => {
                let same_target = (track.to - target).abs() <= SAME_TARGET_EPS;
                if !(same_target && track.duration == duration) {
                    *track = fresh;
                }
            }
            None => self.tracks.push(fresh),
        }
    }

    /// Drop the track for `key`; the property keeps whatever value it has now.
    pub fn cancel(&mut self, key: K) {
        self.tracks.retain(|t| t.key != key);
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn is_active(&self, key: K) -> bool {
        self.tracks.iter().any(|t| t.key == key)
    }

    /// Where the running track for `key` is heading, if any.
    pub fn target_of(&self, key: K) -> Option<f32> {
        self.tracks.iter().find(|t| t.key == key).map(|t| t.to)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Advance every track by `dt` seconds and report each new value.
    ///
    /// Finished tracks report their exact target once and are removed.
    pub fn step(&mut self, dt: f32, mut apply: impl FnMut(K, f32)) {
        for track in &mut self.tracks {
            track.elapsed += dt.max(0.0);
            apply(track.key, track.value());
        }
        self.tracks.retain(|t| !t.finished());
    }
}

/// Events scheduled to fire after a delay, in scheduling order on ties.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    clock: f64,
    next_seq: u64,
    pending: Vec<(f64, u64, E)>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            clock: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` `delay` seconds from now. Negative delays fire on the next step.
    pub fn after(&mut self, delay: f32, event: E) {
        let at = self.clock + f64::from(delay.max(0.0));
        self.pending.push((at, self.next_seq, event));
        self.next_seq += 1;
    }

    /// Advance the clock and return every event that came due, earliest first.
    pub fn step(&mut self, dt: f32) -> Vec<E> {
        self.clock += f64::from(dt.max(0.0));
        let now = self.clock + 1e-9;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _, _)| *at <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, event)| event).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Seconds elapsed since the timeline was created.
    pub fn now(&self) -> f32 {
        self.clock as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn run(tweens: &mut Tweener<u8>, value: &mut f32, dt: f32, frames: usize) {
        for _ in 0..frames {
            tweens.step(dt, |_, v| *value = v);
        }
    }

    #[test]
    fn ease_endpoints_are_exact() {
        for ease in [Ease::Linear, Ease::Power1Out, Ease::Power2InOut] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert!(ease.apply(0.5) > 0.0 && ease.apply(0.5) < 1.0);
        }
    }

    #[test]
    fn arrives_at_duration_regardless_of_frame_slicing() {
        for (dt, frames) in [(0.25_f32, 4_usize), (0.125, 8), (0.5, 2)] {
            let mut tweens = Tweener::new();
            let mut value = 2.0;
            tweens.to(0, value, 7.0, 1.0, Ease::Power1Out);

            run(&mut tweens, &mut value, dt, frames - 1);
            assert!(value < 7.0, "should not arrive early with dt={dt}");

            run(&mut tweens, &mut value, dt, 1);
            assert_eq!(value, 7.0);
            assert!(tweens.is_empty());
        }
    }

    #[test]
    fn same_target_keeps_progress() {
        let mut tweens = Tweener::new();
        let mut value = 0.0;
        tweens.to(0, value, 1.0, 1.0, Ease::Linear);
        run(&mut tweens, &mut value, 0.5, 1);
        assert_abs_diff_eq!(value, 0.5, epsilon = 1e-6);

        tweens.to(0, value, 1.0, 1.0, Ease::Linear);
        run(&mut tweens, &mut value, 0.5, 1);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn redirect_restarts_from_current_value() {
        let mut tweens = Tweener::new();
        let mut value = 0.0;
        tweens.to(0, value, 10.0, 1.0, Ease::Linear);
        run(&mut tweens, &mut value, 0.5, 1);
        assert_abs_diff_eq!(value, 5.0, epsilon = 1e-5);

        tweens.to(0, value, 3.0, 1.0, Ease::Linear);
        assert_eq!(tweens.target_of(0), Some(3.0));
        run(&mut tweens, &mut value, 0.5, 1);
        assert_abs_diff_eq!(value, 4.0, epsilon = 1e-5);
        run(&mut tweens, &mut value, 0.5, 1);
        assert_eq!(value, 3.0);
    }

    #[test]
    fn zero_duration_lands_on_next_step() {
        let mut tweens = Tweener::new();
        let mut value = 1.0;
        tweens.to(0, value, -4.0, 0.0, Ease::Power1Out);
        run(&mut tweens, &mut value, 0.0, 1);
        assert_eq!(value, -4.0);
        assert!(!tweens.is_active(0));
    }

    #[test]
    fn cancel_freezes_value() {
        let mut tweens = Tweener::new();
        let mut value = 0.0;
        tweens.to(1, value, 1.0, 1.0, Ease::Linear);
        run(&mut tweens, &mut value, 0.25, 1);
        tweens.cancel(1);
        run(&mut tweens, &mut value, 0.25, 3);
        assert_abs_diff_eq!(value, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn keys_are_independent() {
        let mut tweens = Tweener::new();
        let mut values = [0.0_f32; 2];
        tweens.to(0, 0.0, 1.0, 1.0, Ease::Linear);
        tweens.to(1, 0.0, 1.0, 2.0, Ease::Linear);
        tweens.step(1.0, |k, v| values[k as usize] = v);
        assert_eq!(values[0], 1.0);
        assert_abs_diff_eq!(values[1], 0.5, epsilon = 1e-6);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn timeline_fires_in_order_once() {
        let mut timeline = Timeline::new();
        timeline.after(0.5, "late");
        timeline.after(0.0, "now");
        timeline.after(0.5, "late-second");

        assert_eq!(timeline.step(0.1), vec!["now"]);
        assert!(timeline.step(0.3).is_empty());
        assert_eq!(timeline.step(0.1), vec!["late", "late-second"]);
        assert!(timeline.step(1.0).is_empty());
        assert!(timeline.is_empty());
    }

    #[test]
    fn timeline_delays_count_from_scheduling_time() {
        let mut timeline = Timeline::new();
        timeline.step(2.0);
        timeline.after(1.0, 7);
        assert!(timeline.step(0.5).is_empty());
        assert_eq!(timeline.step(0.5), vec![7]);
        assert_abs_diff_eq!(timeline.now(), 3.0, epsilon = 1e-6);
    }
}
