// Game session: the per-tick frame driver
//
// Owns the bus and everything simulated, and advances them in a fixed
// order each tick:
//
// 0. fire due deferred updates
// 1. apply buffered action signals
// 2. advance state machines (player, invulnerability, entities)
// 3. resolve hits (read-only)
// 4. apply damage, defeats and pickups
// 5. scroll the world, checkpoint, spawn, report player movement

use glam::Vec2;

use crate::engine::input::{Action, PlayerInput};
use crate::engine::persistence::KeyValueStore;
use crate::engine::timers::TimerQueue;

use super::characters::PoseData;
use super::combat::HitResolver;
use super::config::{ConfigError, GameConfig};
use super::context::SimulationContext;
use super::entities::Wallet;
use super::events::{game_bus, GameBus, GameEvent};
use super::save::{CurrencyRecord, ProgressRecord, SaveSlot};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Running,
    GameOver,
    /// Back at the checkpoint, waiting for the settle delay
    Restarting,
}

/// Something that may move the session to another phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseTrigger {
    PlayerDied,
    RestartRequested,
    RestartSettled,
}

impl SessionPhase {
    /// The phase transition table. `None` means the trigger is rejected.
    pub fn on(self, trigger: PhaseTrigger) -> Option<SessionPhase> {
        use PhaseTrigger::*;
        use SessionPhase::*;
        match (self, trigger) {
            (Running, PlayerDied) => Some(GameOver),
            (Running | GameOver, RestartRequested) => Some(Restarting),
            (Restarting, RestartSettled) => Some(Running),
            _ => None,
        }
    }
}

/// Updates scheduled for a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    CompleteRestart,
}

/// One running game
pub struct GameSession {
    config: GameConfig,
    bus: GameBus,
    ctx: SimulationContext,
    resolver: HitResolver,
    input: PlayerInput,
    timers: TimerQueue<Deferred>,
    save: SaveSlot,
    phase: SessionPhase,
    tick: u64,
    running: bool,
}

impl GameSession {
    /// Create a session, resuming from whatever `store` holds
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let save = SaveSlot::new(store);
        let mut ctx = SimulationContext::new(&config);

        let progress = save.load_progress(ctx.health.max());
        if !progress.is_alive {
            log::info!(
                "Saved game ended in death, starting a new life at {:.0}",
                progress.checkpoint
            );
        }
        ctx.health.resume(progress.health, progress.checkpoint);
        ctx.reset_world(ctx.health.last_checkpoint());
        ctx.wallet = Wallet::new(save.load_currency().flower_count);

        log::info!(
            "Session started at offset {:.0}, health {}/{}, {} flowers",
            ctx.world_offset(),
            ctx.health.current(),
            ctx.health.max(),
            ctx.wallet.count()
        );

        Ok(Self {
            bus: game_bus(config.events.history_len),
            resolver: HitResolver::new(config.combat.clone()),
            config,
            ctx,
            input: PlayerInput::new(),
            timers: TimerQueue::new(),
            save,
            phase: SessionPhase::Running,
            tick: 0,
            running: true,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bus(&self) -> &GameBus {
        &self.bus
    }

    /// Subscribe collaborators (rendering, audio, UI) here
    pub fn bus_mut(&mut self) -> &mut GameBus {
        &mut self.bus
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Direct world access for scripted setups (tutorials, tests)
    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Player pose for renderers
    pub fn pose(&self) -> PoseData {
        self.ctx.player.pose(self.resolver.config())
    }

    pub fn press(&mut self, action: Action) {
        self.input.press(action);
    }

    pub fn release(&mut self, action: Action) {
        self.input.release(action);
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.tick += 1;
        self.bus.set_clock(self.tick);

        for deferred in self.timers.advance() {
            match deferred {
                Deferred::CompleteRestart => self.complete_restart(),
            }
        }

        // Held actions stay held; `complete_restart` resends them
        let signals = self.input.drain_signals();
        if self.phase != SessionPhase::Running {
            return;
        }
        let start_position = self.ctx.player.position();

        for signal in signals {
            self.ctx.player.apply_signal(signal, &mut self.bus);
        }

        self.ctx.player.update(&mut self.bus);
        self.ctx.health.tick();
        let offset = self.ctx.world_offset();
        let margin = self.config.world.despawn_margin;
        self.ctx.enemies.update(offset, margin);
        self.ctx.collectibles.update(offset, margin);

        let report = self.resolver.resolve(&self.ctx);

        let outcome = self.resolver.apply(report, &mut self.ctx, &mut self.bus);
        if outcome.currency_changed {
            self.persist_currency();
        }
        if !self.ctx.health.is_alive() {
            self.enter_game_over();
            return;
        }
        if outcome.player_damaged {
            self.persist_progress();
        }

        self.advance_world();

        let position = self.ctx.player.position();
        if position != start_position {
            self.bus.publish(GameEvent::PositionChange {
                x: position.x,
                y: position.y,
            });
        }
    }

    fn advance_world(&mut self) {
        if self.ctx.player.is_walking() {
            let delta = self.config.character.walk_speed;
            self.ctx.advance_world(delta);
            let offset = self.ctx.world_offset();
            self.bus.publish(GameEvent::WorldUpdate { offset, delta });

            if let Some(checkpoint) = self.ctx.health.on_world_progress(offset) {
                log::info!("Checkpoint reached at {:.0}", checkpoint);
                self.persist_progress();
                self.bus.publish(GameEvent::Checkpoint { checkpoint });
            }
        }

        let offset = self.ctx.world_offset();
        self.ctx.enemies.maybe_spawn(offset, &mut self.bus);
        self.ctx.collectibles.maybe_spawn(offset, &mut self.bus);
    }

    fn enter_game_over(&mut self) {
        let Some(next) = self.phase.on(PhaseTrigger::PlayerDied) else {
            log::debug!("Ignoring death while {:?}", self.phase);
            return;
        };
        self.phase = next;
        self.ctx.player.freeze();
        self.input.reset();
        self.persist_progress();
        log::info!("Game over at offset {:.0}", self.ctx.world_offset());
    }

    /// Go back to the last checkpoint with full health
    ///
    /// Returns false when a restart is already in progress.
    pub fn restart(&mut self) -> bool {
        let Some(next) = self.phase.on(PhaseTrigger::RestartRequested) else {
            log::debug!("Ignoring restart while {:?}", self.phase);
            return false;
        };
        self.phase = next;

        let dropped = self.timers.flush();
        if dropped > 0 {
            log::debug!("Dropped {} pending updates", dropped);
        }

        let before = self.ctx.health.current();
        let checkpoint = self.ctx.health.last_checkpoint();
        self.ctx.health.restore();
        self.ctx.reset_world(checkpoint);
        self.ctx.player.freeze();
        self.resolver.reset();
        self.input.reset();

        log::info!("Restarting at checkpoint {:.0}", checkpoint);
        self.bus.publish(GameEvent::Restart { checkpoint });
        self.bus.publish(GameEvent::HealthChange {
            current: self.ctx.health.current(),
            max: self.ctx.health.max(),
            delta: i64::from(self.ctx.health.current()) - i64::from(before),
        });
        self.persist_progress();

        self.timers
            .schedule(self.config.world.restart_settle_ticks, Deferred::CompleteRestart);
        true
    }

    fn complete_restart(&mut self) {
        let Some(next) = self.phase.on(PhaseTrigger::RestartSettled) else {
            log::debug!("Ignoring restart completion while {:?}", self.phase);
            return;
        };
        self.phase = next;
        self.ctx.player.unfreeze();
        self.input.resend_held();
        self.bus.publish(GameEvent::RestartComplete {
            offset: self.ctx.world_offset(),
        });
    }

    /// Halt ticking and drop pending deferred updates
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let dropped = self.timers.flush();
        log::info!("Session stopped at tick {} ({} updates dropped)", self.tick, dropped);
    }

    /// Resume ticking; an interrupted restart settles again from scratch
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        if self.phase == SessionPhase::Restarting {
            self.timers
                .schedule(self.config.world.restart_settle_ticks, Deferred::CompleteRestart);
        }
        log::info!("Session resumed at tick {}", self.tick);
    }

    /// Heal the player (shop items, pickups from collaborators)
    pub fn heal(&mut self, amount: u32) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        let healed = self.ctx.health.heal(amount, &mut self.bus);
        if healed {
            self.persist_progress();
        }
        healed
    }

    /// Spend collected flowers (shop purchases)
    pub fn spend_flowers(&mut self, amount: u64) -> bool {
        let spent = self.ctx.wallet.spend(amount);
        if spent {
            self.persist_currency();
        }
        spent
    }

    /// World position of the player's feet
    pub fn player_position(&self) -> Vec2 {
        self.ctx.player.position()
    }

    fn persist_progress(&mut self) {
        let health = self.ctx.health.state();
        let record = ProgressRecord {
            checkpoint: health.last_checkpoint,
            health: health.current,
            is_alive: health.is_alive,
        };
        if let Err(err) = self.save.save_progress(&record) {
            log::warn!("Failed to save progress: {}", err);
        }
    }

    fn persist_currency(&mut self) {
        let record = CurrencyRecord {
            flower_count: self.ctx.wallet.count(),
        };
        if let Err(err) = self.save.save_currency(&record) {
            log::warn!("Failed to save currency: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::persistence::{FileStore, MemoryStore};
    use crate::game::entities::{CollectibleKind, EnemyKind};
    use crate::game::events::EventKind;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Nothing spawns near the start
    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.spawn.spawn_ahead = 5000.0;
        config.events.history_len = 4096;
        config
    }

    fn session() -> GameSession {
        GameSession::new(quiet_config(), Box::new(MemoryStore::new())).unwrap()
    }

    fn count(session: &GameSession, kind: EventKind) -> usize {
        session
            .bus()
            .history()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    fn run(session: &mut GameSession, ticks: u32) {
        for _ in 0..ticks {
            session.tick();
        }
    }

    /// Leave the player on their last health point and drop a slime on them
    fn kill_player(session: &mut GameSession) {
        let x = session.player_position().x;
        let ctx = session.context_mut();
        let checkpoint = ctx.health.last_checkpoint();
        ctx.health.resume(1, checkpoint);
        let mut scratch = game_bus(0);
        ctx.enemies.spawn_at(EnemyKind::Slime, x, &mut scratch);
        session.tick();
    }

    #[test]
    fn test_phase_table() {
        use PhaseTrigger::*;
        use SessionPhase::*;
        assert_eq!(Running.on(PlayerDied), Some(GameOver));
        assert_eq!(Running.on(RestartRequested), Some(Restarting));
        assert_eq!(GameOver.on(RestartRequested), Some(Restarting));
        assert_eq!(Restarting.on(RestartSettled), Some(Running));

        assert_eq!(Restarting.on(RestartRequested), None);
        assert_eq!(GameOver.on(PlayerDied), None);
        assert_eq!(Restarting.on(PlayerDied), None);
        assert_eq!(Running.on(RestartSettled), None);
        assert_eq!(GameOver.on(RestartSettled), None);
    }

    #[test]
    fn test_walking_scrolls_world() {
        let mut session = session();
        session.press(Action::Move);
        session.tick();

        assert_eq!(session.context().world_offset(), 4.0);
        assert_eq!(session.player_position(), Vec2::new(154.0, 400.0));
        let kinds: Vec<_> = session
            .bus()
            .history()
            .iter()
            .filter(|e| e.timestamp == 1)
            .map(|e| e.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::MoveStart,
                EventKind::WorldUpdate,
                EventKind::EnemySpawn,
                EventKind::CollectibleSpawn,
                EventKind::PositionChange
            ]
        );

        session.release(Action::Move);
        session.tick();
        assert_eq!(session.context().world_offset(), 4.0);
        assert_eq!(count(&session, EventKind::WorldUpdate), 1);
    }

    #[test]
    fn test_standing_still_emits_no_world_update() {
        let mut session = session();
        run(&mut session, 10);
        assert_eq!(count(&session, EventKind::WorldUpdate), 0);
        assert_eq!(count(&session, EventKind::PositionChange), 0);
    }

    #[test]
    fn test_jump_reports_position_changes() {
        let mut session = session();
        session.press(Action::Jump);
        run(&mut session, 40);
        assert_eq!(count(&session, EventKind::JumpStart), 1);
        assert_eq!(count(&session, EventKind::JumpEnd), 1);
        // The apex tick has zero velocity and does not move
        assert_eq!(count(&session, EventKind::PositionChange), 32);
        assert_eq!(session.player_position().y, 400.0);
    }

    #[test]
    fn test_checkpoint_reached_while_walking() {
        let mut session = session();
        session.press(Action::Move);
        run(&mut session, 150);
        assert_eq!(session.context().world_offset(), 600.0);
        assert_eq!(session.context().health.last_checkpoint(), 500.0);
        assert_eq!(count(&session, EventKind::Checkpoint), 1);
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut session = session();
        kill_player(&mut session);

        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(!session.context().health.is_alive());
        assert_eq!(count(&session, EventKind::GameOver), 1);

        session.press(Action::Move);
        run(&mut session, 5);
        assert_eq!(count(&session, EventKind::MoveStart), 0);
        assert_eq!(count(&session, EventKind::GameOver), 1);
        assert!(!session.heal(1));
    }

    #[test]
    fn test_restart_returns_to_checkpoint() {
        let mut session = session();
        session.press(Action::Move);
        run(&mut session, 150);
        session.release(Action::Move);
        kill_player(&mut session);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        assert!(session.restart());
        assert_eq!(session.phase(), SessionPhase::Restarting);
        assert_eq!(session.context().world_offset(), 500.0);
        assert_eq!(session.context().health.current(), 5);
        assert!(session.context().enemies.is_empty());

        // Motion stays off until the settle delay has passed
        session.press(Action::Move);
        run(&mut session, 5);
        assert_eq!(session.context().world_offset(), 500.0);
        session.tick();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(count(&session, EventKind::RestartComplete), 1);

        assert_eq!(session.context().world_offset(), 504.0);
    }

    #[test]
    fn test_move_held_through_settle_walks_after_restart() {
        let mut session = session();
        session.restart();
        session.press(Action::Move);
        run(&mut session, 5);
        assert_eq!(session.context().world_offset(), 0.0);

        session.tick();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.context().player.is_walking());
        run(&mut session, 4);
        assert_eq!(session.context().world_offset(), 20.0);

        // A key repeat does not stop the walk
        session.press(Action::Move);
        session.tick();
        assert_eq!(session.context().world_offset(), 24.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = quiet_config();
        config.spawn.enemy_spacing = (0.0, 0.0);
        let result = GameSession::new(config, Box::new(MemoryStore::new()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut once = session();
        let mut twice = session();
        for s in [&mut once, &mut twice] {
            s.press(Action::Move);
            run(s, 130);
        }

        assert!(once.restart());
        assert!(twice.restart());
        assert!(!twice.restart());
        run(&mut once, 10);
        run(&mut twice, 10);

        assert_eq!(once.phase(), twice.phase());
        assert_eq!(once.context().world_offset(), twice.context().world_offset());
        assert_eq!(once.context().health.state(), twice.context().health.state());
        assert_eq!(once.player_position(), twice.player_position());
        assert_eq!(count(&twice, EventKind::Restart), 1);
        assert_eq!(count(&twice, EventKind::RestartComplete), 1);
    }

    #[test]
    fn test_cooldown_survives_restart() {
        let mut session = session();
        session.press(Action::Attack);
        run(&mut session, 45);
        let remaining = session.context().player.state_machine().attack_cooldown_remaining();
        assert!(remaining > 0);

        session.restart();
        assert_eq!(
            session.context().player.state_machine().attack_cooldown_remaining(),
            remaining
        );
    }

    #[test]
    fn test_stop_drops_pending_restart_completion() {
        let mut session = session();
        session.restart();
        session.stop();
        run(&mut session, 20);
        assert_eq!(session.tick_count(), 0);
        assert_eq!(session.phase(), SessionPhase::Restarting);

        session.start();
        run(&mut session, 6);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(count(&session, EventKind::RestartComplete), 1);
    }

    #[test]
    fn test_collecting_persists_currency() {
        let dir = TempDir::new().unwrap();
        let mut session =
            GameSession::new(quiet_config(), Box::new(FileStore::new(dir.path()))).unwrap();
        let x = session.player_position().x;
        let mut scratch = game_bus(0);
        session
            .context_mut()
            .collectibles
            .spawn_at(CollectibleKind::Flower, x, &mut scratch);
        session.tick();

        assert_eq!(session.context().wallet.count(), 1);
        assert_eq!(count(&session, EventKind::CollectibleCountUpdate), 1);

        let resumed =
            GameSession::new(quiet_config(), Box::new(FileStore::new(dir.path()))).unwrap();
        assert_eq!(resumed.context().wallet.count(), 1);
    }

    #[test]
    fn test_saved_death_resumes_as_new_life() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        store
            .set("progress", r#"{"checkpoint":1000,"health":0,"isAlive":false}"#)
            .unwrap();

        let session = GameSession::new(quiet_config(), Box::new(store)).unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.context().health.current(), 5);
        assert_eq!(session.context().world_offset(), 1000.0);
        assert_eq!(session.player_position().x, 1150.0);
    }

    #[test]
    fn test_failing_handler_does_not_stop_the_tick() {
        let mut session = session();
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        session
            .bus_mut()
            .subscribe(EventKind::WorldUpdate, |_, _| anyhow::bail!("renderer offline"));
        session
            .bus_mut()
            .subscribe(EventKind::WorldUpdate, move |_, _| {
                counter.set(counter.get() + 1);
                Ok(())
            });

        session.press(Action::Move);
        run(&mut session, 3);
        assert_eq!(seen.get(), 3);
        assert_eq!(session.context().world_offset(), 12.0);
    }
}
