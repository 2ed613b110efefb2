//! Combatant arena.
//!
//! The roster owns every combatant of a match together with its
//! collaborators. Combatants refer to each other only by [`CombatantId`],
//! which is the index into the arena, so there are no ownership cycles
//! between fighters and their opponents.

use sudofighter_common::{CombatantId, RosterError};
use tracing::debug;

use crate::combatant::{Combatant, Role};
use crate::config::CombatantConfig;
use crate::presentation::{CombatantRig, LightColor};

/// Arena of combatants indexed by id.
#[derive(Debug, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
    rigs: Vec<CombatantRig>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster from combatant configurations, in order.
    #[must_use]
    pub fn from_configs(configs: &[CombatantConfig]) -> Self {
        let mut roster = Self::new();
        for config in configs {
            roster.spawn(config);
        }
        roster
    }

    /// Adds a combatant and returns its id.
    pub fn spawn(&mut self, config: &CombatantConfig) -> CombatantId {
        let id = CombatantId::from_index(self.combatants.len());
        self.combatants.push(Combatant::from_config(id, config));
        self.rigs.push(CombatantRig::new());
        debug!(%id, name = %config.name, role = config.role.label(), "Spawned combatant");
        id
    }

    /// Returns the number of combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Returns whether the roster has no combatants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Gets a combatant.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    /// Gets a combatant or reports which id was missing.
    pub fn try_get(&self, id: CombatantId) -> Result<&Combatant, RosterError> {
        self.get(id).ok_or(RosterError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    /// Gets a combatant's collaborators.
    pub fn rig_mut(&mut self, id: CombatantId) -> Option<&mut CombatantRig> {
        self.rigs.get_mut(id.index())
    }

    pub(crate) fn parts_mut(
        &mut self,
        id: CombatantId,
    ) -> Option<(&mut Combatant, &mut CombatantRig)> {
        let index = id.index();
        match (self.combatants.get_mut(index), self.rigs.get_mut(index)) {
            (Some(combatant), Some(rig)) => Some((combatant, rig)),
            _ => None,
        }
    }

    /// Iterates over all combatants in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    /// Ids of every combatant with the given role, in id order.
    #[must_use]
    pub fn ids_with_role(&self, role: Role) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|c| c.role() == role)
            .map(Combatant::id)
            .collect()
    }

    /// Installs collaborators for a combatant.
    ///
    /// The health display is initialized with the maximum health and a
    /// light-capable controller is switched to green.
    pub fn attach_rig(&mut self, id: CombatantId, rig: CombatantRig) -> Result<(), RosterError> {
        let max_hp = self.try_get(id)?.max_hp();
        let slot = self.rig_mut(id).ok_or(RosterError::NotFound(id))?;
        *slot = rig;
        slot.start_health(max_hp);
        slot.set_light(LightColor::GREEN);
        Ok(())
    }
}
