//! Presentation collaborators.
//!
//! The simulation core never renders, plays audio, or drives hardware. It
//! calls out through the traits in this module, all of which are
//! fire-and-forget: nothing is returned except the movement actuator's
//! authoritative position. A collaborator that is not configured is `None`
//! and the step that would have used it is skipped.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Plays named animations on a combatant's model.
pub trait AnimationPlayer {
    /// Starts the named animation state.
    fn play(&mut self, animation: &str);

    /// Sets the walking locomotion flag.
    fn set_walking(&mut self, _walking: bool) {}
}

/// Applies displacement to a combatant's body.
pub trait MovementActuator {
    /// Moves from `from` by `displacement` and returns the resulting position.
    ///
    /// The actuator may constrain the motion (collision); the returned
    /// position is authoritative.
    fn move_by(&mut self, from: Vec3, displacement: Vec3) -> Vec3;
}

/// Shows a combatant's health.
pub trait HealthDisplay {
    /// Initializes the display with the maximum value.
    fn on_start_health(&mut self, max_value: i32);

    /// Updates the displayed value.
    fn set_health(&mut self, value: i32);
}

/// Controller lightbar color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl LightColor {
    /// Full green, set when a match starts.
    pub const GREEN: Self = Self::new(0, 255, 0);

    /// Full red, set when health runs low.
    pub const RED: Self = Self::new(255, 0, 0);

    /// Creates a color from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color as `0x00RRGGBB`.
    #[must_use]
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

/// Haptic and lightbar output of a game controller.
///
/// Every call is best effort. Devices without a lightbar report so through
/// [`ControllerFeedback::supports_light_color`] and are never asked to set one.
pub trait ControllerFeedback {
    /// Starts the rumble motors.
    fn set_vibration(&mut self, low: f32, high: f32);

    /// Stops the rumble motors.
    fn stop_vibration(&mut self);

    /// Whether the device has a controllable light.
    fn supports_light_color(&self) -> bool {
        false
    }

    /// Sets the light color.
    fn set_light_color(&mut self, _color: LightColor) {}
}

/// Controller families the feedback adapters know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeviceKind {
    /// PlayStation 5 pad with a lightbar
    DualSense,
    /// PlayStation 4 pad with a lightbar
    DualShock,
    /// Any other gamepad: motors only
    #[default]
    Generic,
}

impl DeviceKind {
    /// Classifies a device by its reported product name.
    #[must_use]
    pub fn from_product_name(product: &str) -> Self {
        let product = product.to_lowercase();
        if product.contains("dualsense") || product.contains("ps5") {
            Self::DualSense
        } else if product.contains("dual")
            || product.contains("wireless")
            || product.contains("playstation")
        {
            Self::DualShock
        } else {
            Self::Generic
        }
    }

    /// Whether this family exposes a lightbar.
    #[must_use]
    pub const fn supports_light_color(self) -> bool {
        matches!(self, Self::DualSense | Self::DualShock)
    }
}

/// Plays one-shot audio clips in the world.
pub trait AudioCuePlayer {
    /// Plays a clip at a world position.
    fn play_clip_at(&mut self, clip: &str, position: Vec3);
}

/// Displays the match result.
pub trait OutcomeDisplay {
    /// Shows the result text.
    fn show_result(&mut self, text: &str);
}

/// Per-combatant collaborators.
#[derive(Default)]
pub struct CombatantRig {
    /// Animation player
    pub animator: Option<Box<dyn AnimationPlayer>>,
    /// Movement actuator
    pub actuator: Option<Box<dyn MovementActuator>>,
    /// Health display
    pub health_display: Option<Box<dyn HealthDisplay>>,
    /// Controller feedback
    pub feedback: Option<Box<dyn ControllerFeedback>>,
}

impl std::fmt::Debug for CombatantRig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatantRig")
            .field("animator", &self.animator.is_some())
            .field("actuator", &self.actuator.is_some())
            .field("health_display", &self.health_display.is_some())
            .field("feedback", &self.feedback.is_some())
            .finish()
    }
}

impl CombatantRig {
    /// Creates a rig with no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the animation player.
    #[must_use]
    pub fn with_animator(mut self, animator: impl AnimationPlayer + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Sets the movement actuator.
    #[must_use]
    pub fn with_actuator(mut self, actuator: impl MovementActuator + 'static) -> Self {
        self.actuator = Some(Box::new(actuator));
        self
    }

    /// Sets the health display.
    #[must_use]
    pub fn with_health_display(mut self, display: impl HealthDisplay + 'static) -> Self {
        self.health_display = Some(Box::new(display));
        self
    }

    /// Sets the controller feedback device.
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl ControllerFeedback + 'static) -> Self {
        self.feedback = Some(Box::new(feedback));
        self
    }

    pub(crate) fn play(&mut self, animation: &str) {
        if let Some(animator) = self.animator.as_mut() {
            animator.play(animation);
        }
    }

    pub(crate) fn set_walking(&mut self, walking: bool) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_walking(walking);
        }
    }

    /// Without an actuator the displacement is applied as-is.
    pub(crate) fn move_by(&mut self, from: Vec3, displacement: Vec3) -> Vec3 {
        match self.actuator.as_mut() {
            Some(actuator) => actuator.move_by(from, displacement),
            None => from + displacement,
        }
    }

    pub(crate) fn start_health(&mut self, max_value: i32) {
        if let Some(display) = self.health_display.as_mut() {
            display.on_start_health(max_value);
        }
    }

    pub(crate) fn set_health(&mut self, value: i32) {
        if let Some(display) = self.health_display.as_mut() {
            display.set_health(value);
        }
    }

    pub(crate) fn start_vibration(&mut self, low: f32, high: f32) {
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.set_vibration(low, high);
        }
    }

    pub(crate) fn stop_vibration(&mut self) {
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.stop_vibration();
        }
    }

    /// Returns whether a light-capable device accepted the color.
    pub(crate) fn set_light(&mut self, color: LightColor) -> bool {
        match self.feedback.as_mut() {
            Some(feedback) if feedback.supports_light_color() => {
                feedback.set_light_color(color);
                true
            },
            _ => false,
        }
    }
}

/// Match-wide collaborators.
#[derive(Default)]
pub struct Stage {
    /// World audio
    pub audio: Option<Box<dyn AudioCuePlayer>>,
    /// Result screen
    pub outcome_display: Option<Box<dyn OutcomeDisplay>>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("audio", &self.audio.is_some())
            .field("outcome_display", &self.outcome_display.is_some())
            .finish()
    }
}

impl Stage {
    /// Creates a stage with no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the audio player.
    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioCuePlayer + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Sets the outcome display.
    #[must_use]
    pub fn with_outcome_display(mut self, display: impl OutcomeDisplay + 'static) -> Self {
        self.outcome_display = Some(Box::new(display));
        self
    }

    pub(crate) fn play_clip_at(&mut self, clip: &str, position: Vec3) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play_clip_at(clip, position);
        }
    }

    pub(crate) fn show_result(&mut self, text: &str) {
        if let Some(display) = self.outcome_display.as_mut() {
            display.show_result(text);
        }
    }
}

/// Recording collaborators for tests.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A collaborator call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Play(String),
        Walking(bool),
        Moved(Vec3),
        StartHealth(i32),
        Health(i32),
        Vibrate(f32, f32),
        StopVibration,
        Light(LightColor),
        Clip(String),
        Result(String),
    }

    /// Shared call log.
    #[derive(Debug, Clone, Default)]
    pub struct CallLog(Rc<RefCell<Vec<Call>>>);

    impl CallLog {
        pub fn calls(&self) -> Vec<Call> {
            self.0.borrow().clone()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.0.borrow().iter().filter(|c| pred(c)).count()
        }

        pub fn clear(&self) {
            self.0.borrow_mut().clear();
        }

        fn push(&self, call: Call) {
            self.0.borrow_mut().push(call);
        }
    }

    /// Implements every collaborator trait by recording calls.
    #[derive(Debug, Clone, Default)]
    pub struct Recorder {
        pub log: CallLog,
        pub light: bool,
    }

    impl AnimationPlayer for Recorder {
        fn play(&mut self, animation: &str) {
            self.log.push(Call::Play(animation.to_string()));
        }

        fn set_walking(&mut self, walking: bool) {
            self.log.push(Call::Walking(walking));
        }
    }

    impl MovementActuator for Recorder {
        fn move_by(&mut self, from: Vec3, displacement: Vec3) -> Vec3 {
            self.log.push(Call::Moved(displacement));
            from + displacement
        }
    }

    impl HealthDisplay for Recorder {
        fn on_start_health(&mut self, max_value: i32) {
            self.log.push(Call::StartHealth(max_value));
        }

        fn set_health(&mut self, value: i32) {
            self.log.push(Call::Health(value));
        }
    }

    impl ControllerFeedback for Recorder {
        fn set_vibration(&mut self, low: f32, high: f32) {
            self.log.push(Call::Vibrate(low, high));
        }

        fn stop_vibration(&mut self) {
            self.log.push(Call::StopVibration);
        }

        fn supports_light_color(&self) -> bool {
            self.light
        }

        fn set_light_color(&mut self, color: LightColor) {
            self.log.push(Call::Light(color));
        }
    }

    impl AudioCuePlayer for Recorder {
        fn play_clip_at(&mut self, clip: &str, _position: Vec3) {
            self.log.push(Call::Clip(clip.to_string()));
        }
    }

    impl OutcomeDisplay for Recorder {
        fn show_result(&mut self, text: &str) {
            self.log.push(Call::Result(text.to_string()));
        }
    }

    /// A rig whose collaborators all record into one log.
    pub fn recording_rig(light: bool) -> (CombatantRig, CallLog) {
        let rec = Recorder {
            log: CallLog::default(),
            light,
        };
        let rig = CombatantRig::new()
            .with_animator(rec.clone())
            .with_actuator(rec.clone())
            .with_health_display(rec.clone())
            .with_feedback(rec.clone());
        (rig, rec.log)
    }

    /// A stage whose collaborators record into one log.
    pub fn recording_stage() -> (Stage, CallLog) {
        let rec = Recorder::default();
        let stage = Stage::new()
            .with_audio(rec.clone())
            .with_outcome_display(rec.clone());
        (stage, rec.log)
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_device_kind_classification() {
        assert_eq!(
            DeviceKind::from_product_name("DualSense Wireless Controller"),
            DeviceKind::DualSense
        );
        assert_eq!(
            DeviceKind::from_product_name("Wireless Controller"),
            DeviceKind::DualShock
        );
        assert_eq!(
            DeviceKind::from_product_name("Xbox Controller"),
            DeviceKind::Generic
        );
        assert!(DeviceKind::DualSense.supports_light_color());
        assert!(!DeviceKind::Generic.supports_light_color());
    }

    #[test]
    fn test_light_color_packed() {
        assert_eq!(LightColor::RED.packed(), 0x00FF_0000);
        assert_eq!(LightColor::GREEN.packed(), 0x0000_FF00);
    }

    #[test]
    fn test_empty_rig_is_noop() {
        let mut rig = CombatantRig::new();
        rig.play("Attack1Animation");
        rig.set_health(10);
        rig.start_vibration(0.5, 0.5);
        rig.stop_vibration();
        assert!(!rig.set_light(LightColor::RED));
        assert_eq!(rig.move_by(Vec3::ONE, Vec3::X), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_light_requires_capability() {
        let (mut rig, log) = recording_rig(false);
        assert!(!rig.set_light(LightColor::RED));
        assert!(log.calls().is_empty());

        let (mut rig, log) = recording_rig(true);
        assert!(rig.set_light(LightColor::RED));
        assert_eq!(log.calls(), vec![Call::Light(LightColor::RED)]);
    }

    #[test]
    fn test_stage_routes_calls() {
        let (mut stage, log) = recording_stage();
        stage.play_clip_at("punch_1", Vec3::ZERO);
        stage.show_result("You Won!");
        assert_eq!(
            log.calls(),
            vec![
                Call::Clip("punch_1".to_string()),
                Call::Result("You Won!".to_string())
            ]
        );
    }
}
