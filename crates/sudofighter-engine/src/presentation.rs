//! Headless presentation adapters.
//!
//! Every collaborator the simulation calls out to is rendered as a tracing
//! event, so a headless run leaves a readable transcript of animations,
//! haptics, audio and the result screen.

use glam::Vec3;
use sudofighter_gameplay::{
    AnimationPlayer, AudioCuePlayer, CombatantRig, ControllerFeedback, DeviceKind, HealthDisplay,
    LightColor, MovementActuator, OutcomeDisplay, Stage,
};
use tracing::{debug, info, trace};

/// Logs animation requests.
#[derive(Debug, Clone)]
pub struct LoggedAnimator {
    name: String,
}

impl AnimationPlayer for LoggedAnimator {
    fn play(&mut self, animation: &str) {
        debug!(combatant = %self.name, animation, "Play animation");
    }

    fn set_walking(&mut self, walking: bool) {
        trace!(combatant = %self.name, walking, "Walking flag");
    }
}

/// Keeps combatants inside a square arena centered on the origin.
#[derive(Debug, Clone, Copy)]
pub struct ArenaActuator {
    half_extent: f32,
}

impl ArenaActuator {
    /// Creates an arena spanning `[-half_extent, half_extent]` on X and Z.
    #[must_use]
    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent: half_extent.abs(),
        }
    }
}

impl MovementActuator for ArenaActuator {
    fn move_by(&mut self, from: Vec3, displacement: Vec3) -> Vec3 {
        let target = from + displacement;
        let bound = Vec3::new(self.half_extent, f32::INFINITY, self.half_extent);
        target.clamp(-bound, bound)
    }
}

/// Logs health bar updates.
#[derive(Debug, Clone)]
pub struct LoggedHealthBar {
    name: String,
    max: i32,
}

impl HealthDisplay for LoggedHealthBar {
    fn on_start_health(&mut self, max_value: i32) {
        self.max = max_value;
        debug!(combatant = %self.name, max_value, "Health bar ready");
    }

    fn set_health(&mut self, value: i32) {
        info!(combatant = %self.name, "Health {}/{}", value, self.max);
    }
}

/// Logs controller feedback for a device family.
#[derive(Debug, Clone)]
pub struct LoggedController {
    name: String,
    kind: DeviceKind,
}

impl LoggedController {
    /// Creates a controller adapter for a device reported as `product`.
    #[must_use]
    pub fn for_product(name: impl Into<String>, product: &str) -> Self {
        Self {
            name: name.into(),
            kind: DeviceKind::from_product_name(product),
        }
    }

    /// Returns the detected device family.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }
}

impl ControllerFeedback for LoggedController {
    fn set_vibration(&mut self, low: f32, high: f32) {
        debug!(combatant = %self.name, low, high, "Vibration on");
    }

    fn stop_vibration(&mut self) {
        debug!(combatant = %self.name, "Vibration off");
    }

    fn supports_light_color(&self) -> bool {
        self.kind.supports_light_color()
    }

    fn set_light_color(&mut self, color: LightColor) {
        info!(combatant = %self.name, device = ?self.kind, "Light #{:06x}", color.packed());
    }
}

/// Logs world audio cues.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedAudio;

impl AudioCuePlayer for LoggedAudio {
    fn play_clip_at(&mut self, clip: &str, position: Vec3) {
        debug!(clip, ?position, "Play clip");
    }
}

/// Logs the result screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedResultScreen;

impl OutcomeDisplay for LoggedResultScreen {
    fn show_result(&mut self, text: &str) {
        info!("Result screen: {text}");
    }
}

/// Builds the full logging rig for a combatant.
///
/// `controller` is the product name of the attached pad, if any.
#[must_use]
pub fn logged_rig(name: &str, arena_half_extent: f32, controller: Option<&str>) -> CombatantRig {
    let rig = CombatantRig::new()
        .with_animator(LoggedAnimator {
            name: name.to_string(),
        })
        .with_actuator(ArenaActuator::new(arena_half_extent))
        .with_health_display(LoggedHealthBar {
            name: name.to_string(),
            max: 0,
        });
    match controller {
        Some(product) => rig.with_feedback(LoggedController::for_product(name, product)),
        None => rig,
    }
}

/// Builds the logging stage.
#[must_use]
pub fn logged_stage() -> Stage {
    Stage::new()
        .with_audio(LoggedAudio)
        .with_outcome_display(LoggedResultScreen)
}
