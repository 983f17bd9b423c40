use crate::constants::{OPACITY_SNAP, REFERENCE_FRAME_RATE};
use crate::easing::Easing;
use crate::error::ConfigError;

// Boundaries closer than this are treated as touching.
const RANGE_TOLERANCE: f32 = 1e-5;
// Ramp positions this close to either end of a window count as the end.
const RAMP_SNAP: f32 = 1e-4;

/// Scroll interval `[start, end]` a scene owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneRange {
    pub start: f32,
    pub end: f32,
}

impl SceneRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    /// Progress of `scroll` through this range, clamped to [0,1].
    #[inline]
    pub fn local_progress(&self, scroll: f32) -> f32 {
        let w = self.width();
        if w <= f32::EPSILON {
            return 0.0;
        }
        ((scroll - self.start) / w).clamp(0.0, 1.0)
    }
}

/// Target opacities for a contiguous scene layout.
///
/// Every internal boundary gets a cross-fade window of up to `2 * margin`
/// centred on it, narrowed where a neighbouring range is too short to hold
/// it. The outgoing scene ramps 1 -> 0 and the incoming one 0 -> 1 across the
/// window using the same easing as the camera, so the two always sum to 1.
#[derive(Clone, Debug)]
pub struct FadeSchedule {
    ranges: Vec<SceneRange>,
    margin: f32,
    /// Half-width of the window at each internal boundary. Never more than
    /// half of an adjacent interior range or all of an edge range, so windows
    /// cannot overlap and the edges stay fully owned.
    windows: Vec<f32>,
    easing: Easing,
}

impl FadeSchedule {
    pub fn new(ranges: Vec<SceneRange>, margin: f32, easing: Easing) -> Result<Self, ConfigError> {
        if ranges.is_empty() {
            return Err(ConfigError::NoScenes);
        }
        if !margin.is_finite() || margin < 0.0 {
            return Err(ConfigError::InvalidFadeMargin(margin));
        }
        easing.validate()?;
        let first = ranges[0].start;
        let last = ranges[ranges.len() - 1].end;
        if first.abs() > RANGE_TOLERANCE || (last - 1.0).abs() > RANGE_TOLERANCE {
            return Err(ConfigError::RangeBounds {
                start: first,
                end: last,
            });
        }
        for (i, r) in ranges.iter().enumerate() {
            if !(r.start.is_finite() && r.end.is_finite()) || r.end <= r.start {
                return Err(ConfigError::EmptyRange {
                    index: i,
                    start: r.start,
                    end: r.end,
                });
            }
            if i > 0 && (r.start - ranges[i - 1].end).abs() > RANGE_TOLERANCE {
                return Err(ConfigError::RangeGap {
                    index: i,
                    prev: i - 1,
                    start: r.start,
                    prev_end: ranges[i - 1].end,
                });
            }
        }
        // An interior scene narrower than a full window would let its two
        // neighbours' fades meet: three scenes visible at once.
        let last_index = ranges.len() - 1;
        for (i, r) in ranges.iter().enumerate() {
            if i == 0 || i == last_index {
                continue;
            }
            if r.width() + RANGE_TOLERANCE < 2.0 * margin {
                return Err(ConfigError::FadeOverlap {
                    index: i,
                    margin,
                    width: r.width(),
                });
            }
        }
        let windows = (1..ranges.len())
            .map(|k| {
                // Edge ranges have one boundary and may give it their full
                // width; interior ranges split theirs between two.
                let before = if k - 1 == 0 { 1.0 } else { 0.5 };
                let after = if k == last_index { 1.0 } else { 0.5 };
                margin
                    .min(ranges[k - 1].width() * before)
                    .min(ranges[k].width() * after)
            })
            .collect();
        Ok(Self {
            ranges,
            margin,
            windows,
            easing,
        })
    }

    pub fn ranges(&self) -> &[SceneRange] {
        &self.ranges
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Internal boundaries between consecutive scenes.
    pub fn boundaries(&self) -> impl Iterator<Item = f32> + '_ {
        self.ranges.iter().skip(1).map(|r| r.start)
    }

    /// 0 well before internal boundary `k`, 1 well after it, eased across
    /// the window.
    fn ramp(&self, scroll: f32, k: usize) -> f32 {
        let boundary = self.ranges[k + 1].start;
        let half = self.windows[k];
        if half <= 0.0 {
            return if scroll >= boundary { 1.0 } else { 0.0 };
        }
        let t = (scroll - (boundary - half)) / (2.0 * half);
        if t <= RAMP_SNAP {
            0.0
        } else if t >= 1.0 - RAMP_SNAP {
            1.0
        } else {
            self.easing.apply(t)
        }
    }

    /// Target opacity of scene `index` at `scroll`.
    pub fn target_opacity(&self, index: usize, scroll: f32) -> f32 {
        if index >= self.ranges.len() {
            return 0.0;
        }
        let s = if scroll.is_finite() {
            scroll.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let fade_in = if index == 0 {
            1.0
        } else {
            self.ramp(s, index - 1)
        };
        let fade_out = if index + 1 == self.ranges.len() {
            1.0
        } else {
            1.0 - self.ramp(s, index)
        };
        (fade_in * fade_out).clamp(0.0, 1.0)
    }

    /// Index of the range containing `scroll` (the later one on a boundary).
    pub fn range_index(&self, scroll: f32) -> usize {
        self.ranges
            .iter()
            .rposition(|r| scroll >= r.start)
            .unwrap_or(0)
    }
}

/// Low-pass step of displayed opacity toward its target.
///
/// `speed` is the fraction of the gap closed per reference frame (60 Hz).
/// The step is scaled by `dt` so the perceived fade speed does not depend on
/// the display's frame rate; at 60 Hz it matches a fixed per-frame lerp.
pub fn smooth_opacity(current: f32, target: f32, speed: f32, dt_sec: f32) -> f32 {
    if !current.is_finite() {
        return target;
    }
    let frames = (dt_sec.max(0.0)) * REFERENCE_FRAME_RATE;
    let keep = (1.0 - speed.clamp(0.0, 1.0)).powf(frames);
    let next = target + (current - target) * keep;
    if (next - target).abs() < OPACITY_SNAP {
        target
    } else {
        next
    }
}
