//! Keyboard and touch input mapped to tick intents

use crate::sim::TickInput;

/// Drag distance before a touch starts steering
const AIM_THRESHOLD: f32 = 10.0;
/// Drag distance before a touch also thrusts
const THRUST_THRESHOLD: f32 = 30.0;
/// Volleys that may queue up between ticks
const MAX_QUEUED_VOLLEYS: u32 = 4;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TurnLeft,
    TurnRight,
    Thrust,
    Fire,
    Pause,
    /// Step the graphics quality preset (not a tick intent)
    CycleQuality,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(KeyAction::TurnLeft),
        "ArrowRight" | "d" | "D" => Some(KeyAction::TurnRight),
        "ArrowUp" | "w" | "W" => Some(KeyAction::Thrust),
        " " | "Spacebar" => Some(KeyAction::Fire),
        "Escape" | "p" | "P" => Some(KeyAction::Pause),
        "q" | "Q" => Some(KeyAction::CycleQuality),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchDrag {
    start: (f32, f32),
    current: (f32, f32),
}

impl TouchDrag {
    fn delta(&self) -> (f32, f32) {
        (self.current.0 - self.start.0, self.current.1 - self.start.1)
    }
}

/// Accumulates device events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    turn_left: bool,
    turn_right: bool,
    thrust: bool,
    touch: Option<TouchDrag>,
    queued_volleys: u32,
    pause_requested: bool,
    quality_cycle_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key is bound (the caller should swallow it)
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = key_action(key) else {
            return false;
        };
        match action {
            KeyAction::TurnLeft => self.turn_left = true,
            KeyAction::TurnRight => self.turn_right = true,
            KeyAction::Thrust => self.thrust = true,
            // Key repeat keeps spraying while held
            KeyAction::Fire => self.queue_volley(),
            KeyAction::Pause => self.pause_requested = true,
            KeyAction::CycleQuality => self.quality_cycle_requested = true,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) {
        match key_action(key) {
            Some(KeyAction::TurnLeft) => self.turn_left = false,
            Some(KeyAction::TurnRight) => self.turn_right = false,
            Some(KeyAction::Thrust) => self.thrust = false,
            _ => {}
        }
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.touch = Some(TouchDrag {
            start: (x, y),
            current: (x, y),
        });
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if let Some(touch) = &mut self.touch {
            touch.current = (x, y);
        }
    }

    /// Lifting the finger fires
    pub fn touch_end(&mut self) {
        if self.touch.take().is_some() {
            self.queue_volley();
        }
    }

    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Forget held keys and touches (focus lost)
    pub fn release_all(&mut self) {
        *self = Self {
            queued_volleys: 0,
            pause_requested: self.pause_requested,
            ..Self::default()
        };
    }

    /// True once per quality-cycle key press
    pub fn take_quality_cycle(&mut self) -> bool {
        std::mem::take(&mut self.quality_cycle_requested)
    }

    fn queue_volley(&mut self) {
        self.queued_volleys = (self.queued_volleys + 1).min(MAX_QUEUED_VOLLEYS);
    }

    /// Intents for the next tick; one-shot requests are consumed
    pub fn sample(&mut self) -> TickInput {
        let mut input = TickInput {
            turn_left: self.turn_left,
            turn_right: self.turn_right,
            thrust: self.thrust,
            fire: self.queued_volleys > 0,
            aim: None,
            pause: std::mem::take(&mut self.pause_requested),
        };
        self.queued_volleys = self.queued_volleys.saturating_sub(1);

        if let Some(touch) = &self.touch {
            let (dx, dy) = touch.delta();
            if dx.abs() > AIM_THRESHOLD || dy.abs() > AIM_THRESHOLD {
                input.aim = Some(dy.atan2(dx));
            }
            input.thrust |= dx.hypot(dy) > THRUST_THRESHOLD;
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_action("ArrowLeft"), Some(KeyAction::TurnLeft));
        assert_eq!(key_action("d"), Some(KeyAction::TurnRight));
        assert_eq!(key_action("W"), Some(KeyAction::Thrust));
        assert_eq!(key_action(" "), Some(KeyAction::Fire));
        assert_eq!(key_action("Escape"), Some(KeyAction::Pause));
        assert_eq!(key_action("Q"), Some(KeyAction::CycleQuality));
        assert_eq!(key_action("x"), None);
    }

    #[test]
    fn test_held_keys_persist_until_released() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowUp"));
        assert!(input.key_down("a"));
        assert!(input.sample().thrust);
        assert!(input.sample().turn_left);

        input.key_up("ArrowUp");
        let sampled = input.sample();
        assert!(!sampled.thrust);
        assert!(sampled.turn_left);
    }

    #[test]
    fn test_fire_and_pause_are_one_shot() {
        let mut input = InputState::new();
        input.key_down(" ");
        input.key_down("Escape");

        let first = input.sample();
        assert!(first.fire);
        assert!(first.pause);

        let second = input.sample();
        assert!(!second.fire);
        assert!(!second.pause);
    }

    #[test]
    fn test_quality_cycle_is_one_shot_and_not_a_tick_intent() {
        let mut input = InputState::new();
        assert!(input.key_down("q"));
        assert_eq!(input.sample(), TickInput::default());
        assert!(input.take_quality_cycle());
        assert!(!input.take_quality_cycle());
    }

    #[test]
    fn test_volleys_queue_up() {
        let mut input = InputState::new();
        for _ in 0..10 {
            input.key_down(" ");
        }
        let fired = (0..10).filter(|_| input.sample().fire).count();
        assert_eq!(fired, MAX_QUEUED_VOLLEYS as usize);
    }

    #[test]
    fn test_touch_drag_aims_and_thrusts() {
        let mut input = InputState::new();
        input.touch_start(100.0, 100.0);
        input.touch_move(105.0, 104.0);
        let small = input.sample();
        assert_eq!(small.aim, None);
        assert!(!small.thrust);

        input.touch_move(100.0, 120.0);
        let aimed = input.sample();
        let aim = aimed.aim.expect("aiming past threshold");
        assert!((aim - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(!aimed.thrust);

        input.touch_move(140.0, 100.0);
        let thrusting = input.sample();
        assert!(thrusting.thrust);
        assert_eq!(thrusting.aim, Some(0.0));

        input.touch_end();
        let released = input.sample();
        assert!(released.fire);
        assert!(!released.thrust);
        assert_eq!(released.aim, None);
    }

    #[test]
    fn test_release_all_drops_held_state() {
        let mut input = InputState::new();
        input.key_down("ArrowRight");
        input.key_down(" ");
        input.touch_start(0.0, 0.0);
        input.release_all();

        let sampled = input.sample();
        assert_eq!(sampled, TickInput::default());
    }
}
