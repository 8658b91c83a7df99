// Scripted in-memory Memefi server for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;

use crate::error::{BotError, GameReply};

use super::client::MemefiApi;
use super::model::{
    BoostKind, Boss, FreeBoosts, GameConfig, SpinResult, TapBotConfig, TapRequest,
};

/// A call the bot made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchConfig,
    Taps(TapRequest),
    Boost(BoostKind),
    AdvanceBoss,
    Spin(u32),
    TapBotConfig,
    StartTapBot,
    ClaimTapBot,
}

/// Replies are served in order; the last one repeats once the rest are used.
struct Replies<T: Clone> {
    name: &'static str,
    queue: VecDeque<T>,
}

impl<T: Clone> Replies<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            queue: VecDeque::new(),
        }
    }

    fn next(&mut self) -> Result<T, BotError> {
        match self.queue.len() {
            0 => Err(BotError::Decode(format!("no scripted {} reply", self.name))),
            1 => Ok(self.queue[0].clone()),
            _ => Ok(self.queue.pop_front().expect("non-empty")),
        }
    }
}

struct Script {
    configs: Replies<GameConfig>,
    taps: Replies<GameReply<GameConfig>>,
    boosts: Replies<GameConfig>,
    bosses: Replies<GameConfig>,
    spins: Replies<SpinResult>,
    tap_bots: Replies<TapBotConfig>,
    calls: Vec<Call>,
}

pub struct ScriptedApi {
    script: Mutex<Script>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                configs: Replies::new("fetch_config"),
                taps: Replies::new("submit_taps"),
                boosts: Replies::new("activate_boost"),
                bosses: Replies::new("advance_boss"),
                spins: Replies::new("spin"),
                tap_bots: Replies::new("tap_bot"),
                calls: Vec::new(),
            }),
        }
    }

    pub fn on_fetch(self, config: GameConfig) -> Self {
        self.script.lock().unwrap().configs.queue.push_back(config);
        self
    }

    pub fn on_taps(self, config: GameConfig) -> Self {
        self.script
            .lock()
            .unwrap()
            .taps
            .queue
            .push_back(GameReply::Ok(config));
        self
    }

    pub fn on_taps_rejected(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .taps
            .queue
            .push_back(GameReply::GameError(message.to_string()));
        self
    }

    pub fn on_boost(self, config: GameConfig) -> Self {
        self.script.lock().unwrap().boosts.queue.push_back(config);
        self
    }

    pub fn on_advance(self, config: GameConfig) -> Self {
        self.script.lock().unwrap().bosses.queue.push_back(config);
        self
    }

    pub fn on_spin(self, result: SpinResult) -> Self {
        self.script.lock().unwrap().spins.queue.push_back(result);
        self
    }

    pub fn on_tap_bot(self, config: TapBotConfig) -> Self {
        self.script.lock().unwrap().tap_bots.queue.push_back(config);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn tap_requests(&self) -> Vec<TapRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Taps(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls()
            .iter()
            .filter(|c| std::mem::discriminant(*c) == std::mem::discriminant(wanted))
            .count()
    }
}

impl MemefiApi for ScriptedApi {
    async fn fetch_config(&self) -> Result<GameReply<GameConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::FetchConfig);
        s.configs.next().map(GameReply::Ok)
    }

    async fn submit_taps(&self, request: &TapRequest) -> Result<GameReply<GameConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::Taps(request.clone()));
        s.taps.next()
    }

    async fn activate_boost(&self, kind: BoostKind) -> Result<GameReply<GameConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::Boost(kind));
        let mut config = s.boosts.next()?;
        if kind == BoostKind::Turbo {
            config.free_boosts.turbo_last_activated_at = Some(Utc::now());
        }
        Ok(GameReply::Ok(config))
    }

    async fn advance_boss(&self) -> Result<GameReply<GameConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::AdvanceBoss);
        s.bosses.next().map(GameReply::Ok)
    }

    async fn spin(&self, count: u32) -> Result<GameReply<SpinResult>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::Spin(count));
        s.spins.next().map(GameReply::Ok)
    }

    async fn tap_bot_config(&self) -> Result<GameReply<TapBotConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::TapBotConfig);
        s.tap_bots.next().map(GameReply::Ok)
    }

    async fn start_tap_bot(&self) -> Result<GameReply<TapBotConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::StartTapBot);
        s.tap_bots.next().map(GameReply::Ok)
    }

    async fn claim_tap_bot(&self) -> Result<GameReply<TapBotConfig>, BotError> {
        let mut s = self.script.lock().unwrap();
        s.calls.push(Call::ClaimTapBot);
        s.tap_bots.next().map(GameReply::Ok)
    }
}

/// Snapshot with the given energy, weapon level and boss, everything else zeroed.
pub fn snapshot(energy: u64, weapon_level: u64, boss_level: u32, boss_health: u64) -> GameConfig {
    GameConfig {
        current_energy: energy,
        max_energy: 1000,
        weapon_level,
        energy_recharge_level: 0,
        current_boss: Boss {
            level: boss_level,
            current_health: boss_health,
            max_health: 10_000,
        },
        free_boosts: FreeBoosts::default(),
        ..Default::default()
    }
}
