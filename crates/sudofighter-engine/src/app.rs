//! Headless match driver.
//!
//! Builds a match from the engine configuration, applies the persisted
//! character selection, wires the logging adapters and steps the
//! simulation at a fixed rate until a result is reached or the tick limit
//! runs out.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use sudofighter_common::{CombatantId, FighterError, FighterResult, RosterError, SchemaVersion};
use sudofighter_gameplay::{
    AttackResult, CharacterSelection, Clock, FightEvent, Match, MatchOutcome, SelectionStore,
    SimClock,
};
use tracing::{info, trace, warn};

use crate::config::EngineConfig;
use crate::presentation::{logged_rig, logged_stage};
use crate::script::ScriptedPlayer;
use crate::selection_store::TomlSelectionStore;
use crate::timing::FrameTiming;

/// Final state of one combatant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantSummary {
    /// Combatant id
    pub id: CombatantId,
    /// Display name
    pub name: String,
    /// Role label
    pub role: &'static str,
    /// Health at the end of the run
    pub current_hp: i32,
    /// Whether the combatant took part
    pub active: bool,
}

/// Result of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    /// Final outcome
    pub outcome: MatchOutcome,
    /// Simulation steps executed
    pub ticks: u64,
    /// Simulation time at the end
    pub sim_time: f32,
    /// Attack attempts that consumed a cooldown
    pub attacks_accepted: u32,
    /// Attack attempts rejected on cooldown
    pub attacks_rejected: u32,
    /// Hit reactions that applied damage
    pub hits_applied: u32,
    /// Per-combatant final state
    pub combatants: Vec<CombatantSummary>,
}

#[derive(Debug, Default)]
struct EventTally {
    accepted: u32,
    rejected: u32,
    hits: u32,
}

impl EventTally {
    fn record(&mut self, event: &FightEvent) {
        match event {
            FightEvent::AttackAccepted { .. } => self.accepted += 1,
            FightEvent::AttackRejected { .. } => self.rejected += 1,
            FightEvent::HitApplied { .. } => self.hits += 1,
            _ => {},
        }
    }
}

/// Newline-delimited JSON sink for fight events.
struct EventLog {
    writer: BufWriter<File>,
}

impl EventLog {
    fn create(config: &EngineConfig) -> FighterResult<Option<Self>> {
        let Some(path) = config.event_log_path.as_ref() else {
            return Ok(None);
        };
        let file = File::create(path)?;
        info!("Writing fight events to {}", path.display());
        Ok(Some(Self {
            writer: BufWriter::new(file),
        }))
    }

    fn write(&mut self, tick: u64, event: &FightEvent) -> FighterResult<()> {
        #[derive(Serialize)]
        struct Line<'a> {
            tick: u64,
            event: &'a FightEvent,
        }
        serde_json::to_writer(&mut self.writer, &Line { tick, event })
            .map_err(|e| FighterError::Serialization(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(mut self) -> FighterResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Builds a match with logging collaborators and the stored selection.
pub fn build_match(
    config: &EngineConfig,
    store: &mut dyn SelectionStore,
) -> FighterResult<(Match<SimClock>, CombatantId)> {
    let fight = &config.fight;
    if fight.combatants.is_empty() {
        return Err(RosterError::Empty.into());
    }
    if !SchemaVersion::FIGHT_CONFIG.can_read(&fight.schema_version) {
        return Err(FighterError::VersionMismatch {
            expected: SchemaVersion::FIGHT_CONFIG.to_string(),
            actual: fight.schema_version.to_string(),
        });
    }

    let mut fight_match = Match::with_sim_clock(fight.clone());

    let selection = CharacterSelection::from_store(fight_match.players().len(), store)
        .map_err(|_| RosterError::MissingRole("player"))?;
    let player = fight_match.apply_selection(&selection)?;
    if let Err(e) = selection.confirm(store) {
        warn!("Failed to persist selection: {e}");
    }

    let ids: Vec<CombatantId> = fight_match.roster().iter().map(|c| c.id()).collect();
    for id in ids {
        let Some(combatant) = fight_match.roster().get(id) else {
            continue;
        };
        let controller = if id == player {
            config.controller_product.as_deref()
        } else {
            None
        };
        let rig = logged_rig(combatant.name(), config.arena_half_extent, controller);
        fight_match.attach_rig(id, rig)?;
    }
    fight_match.set_stage(logged_stage());

    Ok((fight_match, player))
}

/// Runs a match to completion.
pub fn run_match(config: &EngineConfig) -> FighterResult<MatchSummary> {
    let mut store = TomlSelectionStore::new(&config.selection_path);
    let (mut fight_match, player) = build_match(config, &mut store)?;
    let mut script = ScriptedPlayer::new(config.player_script);
    let mut timing = FrameTiming::new(config.tick_rate);
    let mut log = EventLog::create(config)?;
    let mut tally = EventTally::default();
    let step = timing.fixed_dt();
    let mut ticks: u64 = 0;

    info!(
        %player,
        tick_rate = timing.tick_rate(),
        max_ticks = config.max_ticks,
        "Fight!"
    );

    'run: loop {
        let frame_dt = if config.realtime {
            timing.delta_time()
        } else {
            step
        };

        for _ in 0..timing.accumulate(frame_dt) {
            let intent = script.intent(&fight_match, player);
            let report = fight_match.tick(step, &intent);
            ticks += 1;

            for event in fight_match.events().drain() {
                tally.record(&event);
                if let Some(log) = log.as_mut() {
                    log.write(ticks, &event)?;
                }
            }
            for (attacker, result) in &report.attacks {
                if let AttackResult::OnCooldown { remaining } = result {
                    trace!(%attacker, remaining, "Attack rejected");
                }
            }

            if report.outcome.is_terminal() {
                break 'run;
            }
            if config.max_ticks > 0 && ticks >= config.max_ticks {
                warn!(ticks, "Tick limit reached without a result");
                break 'run;
            }
        }

        if config.realtime {
            timing.sleep_remainder();
        }
    }

    if let Some(log) = log {
        log.finish()?;
    }

    let combatants = fight_match
        .roster()
        .iter()
        .map(|c| CombatantSummary {
            id: c.id(),
            name: c.name().to_string(),
            role: c.role().label(),
            current_hp: c.current_hp(),
            active: c.is_active(),
        })
        .collect();

    let summary = MatchSummary {
        outcome: fight_match.outcome(),
        ticks,
        sim_time: fight_match.clock().now(),
        attacks_accepted: tally.accepted,
        attacks_rejected: tally.rejected,
        hits_applied: tally.hits,
        combatants,
    };

    fight_match.return_to_menu();
    Ok(summary)
}

/// Loads the configuration and runs one match, printing the summary.
pub fn run(config_path: Option<&str>) -> anyhow::Result<MatchSummary> {
    let config = match config_path {
        Some(path) => EngineConfig::try_load_from(path)?,
        None => EngineConfig::load(),
    };

    let summary = run_match(&config)?;

    info!(
        outcome = %summary.outcome,
        ticks = summary.ticks,
        sim_time = summary.sim_time,
        accepted = summary.attacks_accepted,
        rejected = summary.attacks_rejected,
        hits = summary.hits_applied,
        "Match finished"
    );
    for c in summary.combatants.iter().filter(|c| c.active) {
        info!("{} ({}): {} HP", c.name, c.role, c.current_hp);
    }
    match summary.outcome.result_text() {
        Some(text) => println!("{text}"),
        None => println!("No result after {} ticks", summary.ticks),
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerScript;
    use std::fs;
    use sudofighter_gameplay::{CombatantConfig, FightConfig, MemorySelectionStore};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.selection_path = dir.path().join("selection.toml");
        config.fight.seed = Some(3);
        config
    }

    #[test]
    fn test_idle_player_loses() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = config_in(&temp_dir);
        config.player_script = PlayerScript::Idle;

        let summary = run_match(&config).expect("run");

        assert_eq!(summary.outcome, MatchOutcome::PlayerLost);
        assert_eq!(summary.hits_applied, 20);
        assert_eq!(summary.combatants[0].current_hp, 0);
    }

    #[test]
    fn test_aggressive_run_resolves() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = config_in(&temp_dir);

        let summary = run_match(&config).expect("run");

        assert!(summary.outcome.is_terminal());
        assert!(summary.attacks_accepted > 0);
        assert!(summary.ticks < config.max_ticks);
    }

    #[test]
    fn test_tick_limit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = config_in(&temp_dir);
        config.player_script = PlayerScript::Idle;
        config.max_ticks = 10;

        let summary = run_match(&config).expect("run");

        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.outcome, MatchOutcome::Ongoing);
    }

    #[test]
    fn test_event_log_written() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = config_in(&temp_dir);
        let log_path = temp_dir.path().join("events.jsonl");
        config.event_log_path = Some(log_path.clone());

        run_match(&config).expect("run");

        let contents = fs::read_to_string(&log_path).expect("read log");
        let last = contents.lines().last().expect("at least one event");
        let value: serde_json::Value = serde_json::from_str(last).expect("json");
        assert!(value["event"].get("OutcomeResolved").is_some());
    }

    #[test]
    fn test_selection_persisted_and_applied() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = config_in(&temp_dir);
        config.fight.combatants.push(CombatantConfig::player("Second"));
        fs::write(&config.selection_path, "SelectedCharacterIndex = 1\n").expect("write");

        let mut store = TomlSelectionStore::new(&config.selection_path);
        let (fight_match, player) = build_match(&config, &mut store).expect("build");

        assert_eq!(player, CombatantId::new(2));
        assert!(!fight_match
            .roster()
            .get(CombatantId::new(0))
            .is_some_and(|c| c.is_active()));
        assert_eq!(store.load().expect("load"), Some(1));
    }

    #[test]
    fn test_empty_fight_rejected() {
        let mut config = EngineConfig::default();
        config.fight = FightConfig::empty();

        let result = build_match(&config, &mut MemorySelectionStore::default());
        assert!(matches!(result, Err(FighterError::Roster(RosterError::Empty))));
    }

    #[test]
    fn test_incompatible_fight_schema_rejected() {
        let mut config = EngineConfig::default();
        config.fight.schema_version = SchemaVersion::new(3, 0, 0);

        let result = build_match(&config, &mut MemorySelectionStore::default());
        assert!(matches!(result, Err(FighterError::VersionMismatch { .. })));
    }
}
