use crate::motion::{Direction, MovementState};

/// Idle time before the character sits down.
pub const LONG_IDLE_MS: f64 = 6000.0;

/// Which sprite-sheet clip is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Breathing in place.
    Idle,
    /// Walk cycle.
    Walk,
    /// Run cycle.
    Run,
    /// Sitting after a long idle.
    Sit,
}

impl Clip {
    /// Milliseconds each frame is shown.
    pub fn frame_ms(self) -> f64 {
        match self {
            Self::Idle => 1000.0,
            Self::Walk => 80.0,
            Self::Run => 60.0,
            Self::Sit => f64::INFINITY,
        }
    }

    /// Sprite-sheet frame numbers for a direction.
    pub fn frames(self, direction: Direction) -> &'static [u32] {
        let row = match direction {
            Direction::Up => 0,
            Direction::Left => 1,
            Direction::Down => 2,
            Direction::Right => 3,
        };
        match self {
            Self::Idle => &IDLE_FRAMES[row],
            Self::Walk => &WALK_FRAMES[row],
            Self::Run => &RUN_FRAMES[row],
            Self::Sit => &SIT_FRAMES[row],
        }
    }
}

const IDLE_FRAMES: [[u32; 2]; 4] = [[1, 2], [3, 4], [5, 6], [7, 8]];
const WALK_FRAMES: [[u32; 9]; 4] = [
    [1, 2, 3, 4, 5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14, 15, 16, 17, 18],
    [19, 20, 21, 22, 23, 24, 25, 26, 27],
    [28, 29, 30, 31, 32, 33, 34, 35, 36],
];
const RUN_FRAMES: [[u32; 8]; 4] = [
    [1, 2, 3, 4, 5, 6, 7, 8],
    [9, 10, 11, 12, 13, 14, 15, 16],
    [17, 18, 19, 20, 21, 22, 23, 24],
    [25, 26, 27, 28, 29, 30, 31, 32],
];
const SIT_FRAMES: [[u32; 1]; 4] = [[1], [2], [3], [4]];

/// Picks the sprite frame from movement state, facing and elapsed time.
#[derive(Debug, Clone)]
pub struct Animator {
    clip: Clip,
    direction: Direction,
    clip_ms: f64,
    idle_ms: f64,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            clip: Clip::Idle,
            direction: Direction::Down,
            clip_ms: 0.0,
            idle_ms: 0.0,
        }
    }
}

impl Animator {
    /// Advance by a render frame. Returns the sprite frame to draw.
    pub fn update(&mut self, state: MovementState, direction: Direction, dt_ms: f64) -> u32 {
        let dt_ms = dt_ms.max(0.0);
        if state == MovementState::Idle {
            self.idle_ms += dt_ms;
        } else {
            self.idle_ms = 0.0;
        }

        let clip = match state {
            MovementState::Idle if self.idle_ms >= LONG_IDLE_MS => Clip::Sit,
            MovementState::Idle => Clip::Idle,
            MovementState::Walking => Clip::Walk,
            MovementState::Running => Clip::Run,
        };

        if clip != self.clip || direction != self.direction {
            self.clip = clip;
            self.direction = direction;
            self.clip_ms = 0.0;
        } else {
            self.clip_ms += dt_ms;
        }
        self.frame()
    }

    /// Current clip.
    pub fn clip(&self) -> Clip {
        self.clip
    }

    /// Current sprite frame.
    pub fn frame(&self) -> u32 {
        let frames = self.clip.frames(self.direction);
        let index = (self.clip_ms / self.clip.frame_ms()) as usize % frames.len();
        frames[index]
    }
}
