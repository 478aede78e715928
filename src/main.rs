use anyhow::{Context, Result};
use log::{debug, info};
use std::cell::Cell;
use std::env;
use std::rc::Rc;
use std::time::Duration;

mod core;
mod engine;
mod game;

use engine::game_loop::{FrameClock, TICKS_PER_SECOND};
use engine::input::Action;
use engine::persistence::{FileStore, KeyValueStore, MemoryStore};
use game::config::GameConfig;
use game::events::{EventKind, GameEvent};
use game::session::{GameSession, SessionPhase};

/// Directory for save files; without it progress lives in memory
const SAVE_DIR_ENV: &str = "SCROLLER_SAVE_DIR";
/// Where to dump the event history as JSON at exit
const HISTORY_FILE_ENV: &str = "SCROLLER_HISTORY";

const DEFAULT_RUN_SECONDS: u64 = 20;

/// Autopilot tuning (world units / ticks)
const ATTACK_RANGE: f32 = 90.0;
const JUMP_RANGE: f32 = 70.0;
const RESTART_DELAY_TICKS: u32 = 90;
const POTION_PRICE: u64 = 10;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting scroller core demo...");

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => GameConfig::default(),
    };
    let seconds: u64 = match args.get(1) {
        Some(text) => text
            .parse()
            .with_context(|| format!("Invalid run length '{text}'"))?,
        None => DEFAULT_RUN_SECONDS,
    };

    let store: Box<dyn KeyValueStore> = match env::var(SAVE_DIR_ENV) {
        Ok(dir) => {
            info!("Saving progress to {}", dir);
            Box::new(FileStore::new(dir))
        }
        Err(_) => Box::new(MemoryStore::new()),
    };

    let mut session = GameSession::new(config, store)?;
    session.bus_mut().register_namespace("shop.");
    subscribe_event_log(&mut session);

    let defeated = Rc::new(Cell::new(0u32));
    let counter = defeated.clone();
    session
        .bus_mut()
        .subscribe(EventKind::EnemyDefeated, move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });

    let mut autopilot = Autopilot::default();
    let mut clock = FrameClock::new();
    let total_ticks = seconds * u64::from(TICKS_PER_SECOND);

    while session.tick_count() < total_ticks {
        for _ in 0..clock.begin_frame() {
            autopilot.drive(&mut session);
            session.tick();
            if session.tick_count() % u64::from(TICKS_PER_SECOND) == 0 {
                debug!("Pose: {:?} ({:.0} fps)", session.pose(), clock.fps());
            }
        }
        std::thread::sleep(Duration::from_millis(4));
    }
    session.stop();

    let ctx = session.context();
    info!(
        "Ran {} ticks: offset {:.0}, checkpoint {:.0}, health {}/{}, {} flowers, {} enemies defeated",
        session.tick_count(),
        ctx.world_offset(),
        ctx.health.last_checkpoint(),
        ctx.health.current(),
        ctx.health.max(),
        ctx.wallet.count(),
        defeated.get()
    );

    if let Ok(path) = env::var(HISTORY_FILE_ENV) {
        let json = session.bus().history().to_json()?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {path}"))?;
        info!("Event history written to {}", path);
    }

    Ok(())
}

/// Log every event; per-tick chatter goes to debug
fn subscribe_event_log(session: &mut GameSession) {
    session.bus_mut().subscribe_all(|event, _| {
        match event.kind() {
            EventKind::WorldUpdate
            | EventKind::PositionChange
            | EventKind::CooldownUpdate
            | EventKind::CollectibleSpawn => {
                debug!("[{}] {} {:?}", event.timestamp, event.name(), event.payload)
            }
            _ => info!("[{}] {} {:?}", event.timestamp, event.name(), event.payload),
        }
        Ok(())
    });
}

/// Scripted player: walks forward, swings at enemies ahead, jumps over
/// them while the attack recovers and restarts after dying
#[derive(Debug, Default)]
struct Autopilot {
    game_over_ticks: u32,
}

impl Autopilot {
    fn drive(&mut self, session: &mut GameSession) {
        match session.phase() {
            SessionPhase::GameOver => {
                self.game_over_ticks += 1;
                if self.game_over_ticks >= RESTART_DELAY_TICKS {
                    self.game_over_ticks = 0;
                    session.restart();
                }
                return;
            }
            SessionPhase::Restarting => return,
            SessionPhase::Running => {}
        }

        let ctx = session.context();
        let player_x = ctx.player.position().x;
        let nearest = ctx
            .enemies
            .active()
            .map(|e| e.position().x - player_x)
            .filter(|distance| *distance > 0.0)
            .fold(f32::INFINITY, f32::min);
        let cooling_down = ctx.player.state_machine().attack_cooldown_remaining() > 0;
        let hurt = ctx.health.current() < ctx.health.max();
        let can_buy = ctx.wallet.count() >= POTION_PRICE;

        session.press(Action::Move);
        hold(session, Action::Attack, nearest < ATTACK_RANGE && !cooling_down);
        hold(session, Action::Jump, nearest < JUMP_RANGE && cooling_down);

        if hurt && can_buy && session.spend_flowers(POTION_PRICE) {
            session.heal(1);
            session.bus_mut().publish(GameEvent::custom(
                "shop.purchase",
                serde_json::json!({ "item": "potion", "price": POTION_PRICE }),
            ));
        }
    }
}

fn hold(session: &mut GameSession, action: Action, down: bool) {
    if down {
        session.press(action);
    } else {
        session.release(action);
    }
}
