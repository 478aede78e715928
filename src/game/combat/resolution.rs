// Hit resolution
//
// `resolve` only reads the world and reports what overlaps; `apply` turns
// the report into damage, defeats and pickups through the owning managers.

use std::collections::HashSet;

use crate::core::math::within_reach;
use crate::game::config::CombatConfig;
use crate::game::context::SimulationContext;
use crate::game::entities::{CollectibleId, EnemyId};
use crate::game::events::{GameBus, GameEvent};

/// An enemy touching the player's body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyContact {
    pub id: EnemyId,
    pub damage: u32,
}

/// Everything that overlapped during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Enemies inside the attack hitbox that this attack has not hit yet
    pub enemy_hits: Vec<EnemyId>,
    pub body_contacts: Vec<BodyContact>,
    pub pickups: Vec<CollectibleId>,
}

impl HitReport {
    pub fn is_empty(&self) -> bool {
        self.enemy_hits.is_empty() && self.body_contacts.is_empty() && self.pickups.is_empty()
    }
}

/// What `apply` changed, for the caller's bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub enemies_hit: usize,
    pub player_damaged: bool,
    pub currency_changed: bool,
}

/// Per-session hit pipeline state
#[derive(Debug)]
pub struct HitResolver {
    config: CombatConfig,
    /// Attack the `already_hit` set belongs to
    attack_serial: Option<u64>,
    already_hit: HashSet<EnemyId>,
}

impl HitResolver {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            attack_serial: None,
            already_hit: HashSet::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Find every overlap for this tick without mutating the world
    pub fn resolve(&mut self, ctx: &SimulationContext) -> HitReport {
        let mut report = HitReport::default();
        let player = &ctx.player;

        if player.is_attacking() && self.attack_serial != Some(player.attack_serial()) {
            self.attack_serial = Some(player.attack_serial());
            self.already_hit.clear();
        }

        if let Some(hitbox) = player.attack_hitbox(&self.config) {
            report.enemy_hits = ctx
                .enemies
                .active()
                .filter(|e| !self.already_hit.contains(&e.id()))
                .filter(|e| hitbox.overlaps_padded(&e.rect(), self.config.hit_padding))
                .map(|e| e.id())
                .collect();
        }

        if !ctx.health.is_alive() {
            return report;
        }

        if !ctx.health.is_invulnerable() {
            let body = player.body_rect();
            report.body_contacts = ctx
                .enemies
                .active()
                .filter(|e| body.overlaps(&e.rect()))
                .map(|e| BodyContact {
                    id: e.id(),
                    damage: e.kind().contact_damage(),
                })
                .collect();
        }

        let center = player.body_center();
        let radius = player.body_radius();
        report.pickups = ctx
            .collectibles
            .active()
            .filter(|c| {
                within_reach(
                    center,
                    radius,
                    c.position(),
                    c.radius(),
                    self.config.collect_radius_multiplier,
                )
            })
            .map(|c| c.id())
            .collect();

        report
    }

    /// Carry out a report: hits first, then body contacts, then pickups
    /// if the player survived the contacts
    pub fn apply(
        &mut self,
        report: HitReport,
        ctx: &mut SimulationContext,
        bus: &mut GameBus,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        for id in report.enemy_hits {
            if !self.already_hit.insert(id) {
                continue;
            }
            let Some(hit) = ctx.enemies.hit(id) else {
                continue;
            };
            outcome.enemies_hit += 1;
            bus.publish(GameEvent::AttackHit {
                x: hit.position.x,
                y: hit.position.y,
                enemy_kind: hit.kind,
            });
            bus.publish(GameEvent::EnemyHit {
                id,
                x: hit.position.x,
                y: hit.position.y,
                kind: hit.kind,
                hit_points: hit.hit_points_left,
            });
            if hit.defeated {
                log::debug!("{:?} #{} defeated", hit.kind, id);
                bus.publish(GameEvent::EnemyDefeated {
                    id,
                    x: hit.position.x,
                    y: hit.position.y,
                    kind: hit.kind,
                });
            }
        }

        for contact in report.body_contacts {
            // Defeated by this tick's attack
            if !ctx.enemies.get(contact.id).is_some_and(|e| e.is_active()) {
                continue;
            }
            if ctx.health.take_damage(contact.damage, bus) {
                outcome.player_damaged = true;
            }
            ctx.enemies
                .push_back(contact.id, self.config.contact_pushback);
        }

        // Nothing is collected on the tick the player dies
        if !ctx.health.is_alive() {
            return outcome;
        }

        for id in report.pickups {
            let Some(position) = ctx.collectibles.get(id).map(|c| c.position()) else {
                continue;
            };
            let Some(value) = ctx.collectibles.collect(id) else {
                continue;
            };
            let total = ctx.wallet.add(value);
            bus.publish(GameEvent::CollectibleCollect {
                id,
                x: position.x,
                y: position.y,
                value,
            });
            bus.publish(GameEvent::CollectibleCountUpdate { total });
            outcome.currency_changed = true;
        }

        outcome
    }

    /// Forget the current attack (restart)
    pub fn reset(&mut self) {
        self.attack_serial = None;
        self.already_hit.clear();
    }
}
