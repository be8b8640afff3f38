//! The single owner of a pet: dispatches commands, drives the timers and
//! keeps the store in sync.

use pet_core::{normalize_name, PetConfig, PetState, Rejection, StatKind, BALL};
use pet_econ::quests::record_pet;
use pet_econ::{
    add_xp, apply_effects, buy_by_name, claim, evaluate, generate_quests, tick, use_item,
    LevelUp,
};
use persistence::{load_state, save_state, LoadSource, Store};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::clock::{utc_datetime, Clock};
use crate::command::Command;
use crate::minigame::{reward_hit, settle, MinigameSession, SecondOutcome};
use crate::notice::{ActivityLog, Notice};
use crate::schedule::Interval;
use crate::snapshot::{Extras, PetSnapshot};

const PET_EFFECTS: &[(StatKind, f64)] = &[(StatKind::Happy, 1.0)];
const PET_XP: u64 = 1;
const PLAY_EFFECTS: &[(StatKind, f64)] = &[(StatKind::Happy, 10.0), (StatKind::Energy, -5.0)];
const PLAY_XP: u64 = 3;
const NAP_STEP: &[(StatKind, f64)] = &[
    (StatKind::Energy, 8.0),
    (StatKind::Health, 2.0),
    (StatKind::Hunger, -3.0),
    (StatKind::Thirst, -3.0),
];
const WAKE_XP: u64 = 4;

const WELCOME: &str = "Bem-vinda ao Tartaruguinha!";
const WOKE: &str = "Acordou descansada!";
const SICK: &str = "Ela está muito doente! Use um Remédio 💊";

/// Result of a [`PetController::dispatch`] or [`PetController::pump`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    /// In display order: the action first, then level-ups and unlocks.
    pub notices: Vec<Notice>,
    pub unlocked: Vec<&'static str>,
    pub rejected: Option<Rejection>,
}

pub struct PetController<S: Store, C: Clock> {
    state: PetState,
    config: PetConfig,
    rng: ChaCha8Rng,
    store: S,
    clock: C,
    source: LoadSource,
    log: ActivityLog,
    last_notice: Option<Notice>,
    /// Nap steps still to run while asleep.
    nap: Option<u32>,
    minigame: Option<MinigameSession>,
    /// The sick warning was shown and health has not recovered since.
    sick_warned: bool,
    tick_timer: Interval,
    autosave_timer: Interval,
    nap_timer: Option<Interval>,
    spawn_timer: Option<Interval>,
}

impl<S: Store, C: Clock> PetController<S, C> {
    /// Load (or create) the pet, roll today's quests and save once.
    ///
    /// Time spent while the program was closed is not simulated: the tick
    /// baseline restarts at the current instant.
    pub fn start(store: S, clock: C, config: PetConfig) -> Self {
        let now = clock.now_ms();
        let (mut state, source) = load_state(&store, &config.storage_key);
        state.last_tick_ms = now;
        generate_quests(&mut state.quests, clock.today());
        let seed = config.rng_seed.unwrap_or(now.unsigned_abs());
        info!(?source, name = state.name.as_str(), seed, "pet controller started");

        let mut ctl = Self {
            tick_timer: Interval::starting_at(now, config.timing.tick_ms),
            autosave_timer: Interval::starting_at(now, config.timing.autosave_ms),
            rng: ChaCha8Rng::seed_from_u64(seed),
            state,
            config,
            store,
            clock,
            source,
            log: ActivityLog::default(),
            last_notice: None,
            nap: None,
            minigame: None,
            sick_warned: false,
            nap_timer: None,
            spawn_timer: None,
        };
        ctl.persist();
        ctl.log_line(WELCOME);
        ctl
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    pub fn minigame(&self) -> Option<&MinigameSession> {
        self.minigame.as_ref()
    }

    /// The first-run naming prompt has not been answered yet.
    pub fn needs_name(&self) -> bool {
        !self.state.seen_name_prompt
    }

    pub fn is_asleep(&self) -> bool {
        self.nap.is_some()
    }

    pub fn snapshot(&self) -> PetSnapshot {
        PetSnapshot::build(
            &self.state,
            Extras {
                asleep: self.is_asleep(),
                needs_name: self.needs_name(),
                minigame: self.minigame.as_ref().map(MinigameSession::view),
                notice: self.last_notice.clone(),
                log: self.log.iter().cloned().collect(),
            },
        )
    }

    /// Run one intent. Rejected intents leave the pet untouched and come back
    /// as a notice; accepted state changes are followed by an achievement
    /// check and a save.
    pub fn dispatch(&mut self, cmd: Command) -> Outcome {
        let now = self.clock.now_ms();
        let changes = cmd.changes_state();
        debug!(?cmd, "dispatch");
        match self.apply(cmd, now) {
            Ok(texts) => self.finish(texts, changes, changes),
            Err(rejection) => {
                debug!(%rejection, "command rejected");
                let notice = Notice::new(rejection.message());
                self.last_notice = Some(notice.clone());
                Outcome {
                    notices: vec![notice],
                    unlocked: Vec::new(),
                    rejected: Some(rejection),
                }
            }
        }
    }

    /// Fire every timer that is due at the clock's current instant, at most
    /// once each: tick, auto-save, nap step, mini-game spawner.
    pub fn pump(&mut self) -> Outcome {
        let now = self.clock.now_ms();
        let mut texts = Vec::new();
        let mut changed = false;
        let mut persist = false;

        if self.tick_timer.poll(now) {
            texts.extend(self.run_tick(now));
            changed = true;
        }
        if self.autosave_timer.poll(now) {
            debug!("autosave");
            persist = true;
        }
        let nap_due = self.nap_timer.as_mut().is_some_and(|t| t.poll(now));
        if nap_due && self.nap_step(&mut texts) {
            persist = true;
        }
        let spawn_due = self.spawn_timer.as_mut().is_some_and(|t| t.poll(now));
        if spawn_due && self.minigame_second(now, &mut texts) {
            persist = true;
        }
        if let Some(session) = self.minigame.as_mut() {
            session.expire(now);
        }
        self.finish(texts, changed || persist, persist)
    }

    fn apply(&mut self, cmd: Command, now: i64) -> Result<Vec<String>, Rejection> {
        match cmd {
            Command::Tick => Ok(self.run_tick(now)),
            Command::Resume => {
                debug!(gap_ms = now - self.state.last_tick_ms, "resumed");
                self.state.last_tick_ms = now;
                Ok(Vec::new())
            }
            Command::UseItem { name } => self.use_named(&name),
            Command::Buy { item } => {
                let item = buy_by_name(&mut self.state, &item)?;
                self.log_line(format!("Comprou {} por {}💰.", item.name, item.price));
                Ok(vec![format!("Comprou {} {}.", item.icon, item.name)])
            }
            Command::Pet => {
                apply_effects(&mut self.state.stats, PET_EFFECTS);
                let ups = add_xp(&mut self.state, PET_XP);
                record_pet(&mut self.state.quests);
                let mut texts = vec!["Carinho 🐢💚".to_string()];
                texts.extend(self.level_up_texts(&ups));
                Ok(texts)
            }
            Command::Play => {
                if self.is_asleep() {
                    return Err(Rejection::Asleep);
                }
                if self.state.inventory.qty(BALL) > 0 {
                    return self.use_named(BALL);
                }
                apply_effects(&mut self.state.stats, PLAY_EFFECTS);
                let ups = add_xp(&mut self.state, PLAY_XP);
                self.log_line("Brincou sem bola.");
                let mut texts = vec!["Brincou!".to_string()];
                texts.extend(self.level_up_texts(&ups));
                Ok(texts)
            }
            Command::Sleep => {
                if self.is_asleep() {
                    return Err(Rejection::Asleep);
                }
                self.nap = Some(self.config.timing.nap_steps.max(1));
                self.nap_timer = Some(Interval::starting_at(now, self.config.timing.nap_step_ms));
                self.log_line("Foi dormir.");
                Ok(vec!["Dormindo… Zzz".to_string()])
            }
            Command::ClaimQuest { id } => {
                let report = claim(&mut self.state, &id)?;
                self.log_line(format!(
                    "Missão concluída: +{} XP, +{}💰.",
                    report.reward.xp, report.reward.coins
                ));
                let mut texts = vec!["Recompensa coletada!".to_string()];
                texts.extend(self.level_up_texts(&report.level_ups));
                Ok(texts)
            }
            Command::StartMinigame => {
                if self.minigame.is_some() {
                    debug!("replacing running mini-game");
                }
                self.minigame = Some(MinigameSession::new(&self.config.minigame));
                self.spawn_timer = Some(Interval::starting_at(
                    now,
                    self.config.minigame.spawn_every_ms,
                ));
                info!("mini-game started");
                self.log_line("Mini-jogo começou.");
                Ok(vec!["Pegue as joaninhas!".to_string()])
            }
            Command::MinigameHit { target } => {
                let session = self.minigame.as_mut().ok_or(Rejection::NoSession)?;
                session.hit(target, now)?;
                let ups = reward_hit(&mut self.state);
                Ok(self.level_up_texts(&ups))
            }
            Command::SetName { name } => {
                let name = normalize_name(&name).ok_or(Rejection::EmptyName)?;
                self.state.name = name.clone();
                self.state.seen_name_prompt = true;
                info!(name = name.as_str(), "pet named");
                self.log_line(format!("Nome escolhido: {name}"));
                Ok(vec![format!("Olá, {name}!")])
            }
            Command::ToggleMute => {
                self.state.muted = !self.state.muted;
                debug!(muted = self.state.muted, "sound toggled");
                Ok(Vec::new())
            }
            Command::Save => {
                let text = if self.persist() {
                    "Jogo salvo!"
                } else {
                    "Não foi possível salvar."
                };
                Ok(vec![text.to_string()])
            }
        }
    }

    fn use_named(&mut self, name: &str) -> Result<Vec<String>, Rejection> {
        let report = use_item(&mut self.state, name)?;
        let item = report.item;
        self.log_line(format!("Usou {}.", item.name));
        let mut texts = vec![format!("Usou {} {}!", item.icon, item.name)];
        texts.extend(self.level_up_texts(&report.level_ups));
        Ok(texts)
    }

    fn run_tick(&mut self, now: i64) -> Vec<String> {
        let elapsed = now.saturating_sub(self.state.last_tick_ms) as f64 / 1_000.0;
        self.state.last_tick_ms = now;
        let mut texts = Vec::new();

        if generate_quests(&mut self.state.quests, self.clock.today()) {
            info!(date = ?self.state.quests.date, "daily quests rolled over");
            self.log_line("Novas missões do dia!");
        }

        let report = tick(&mut self.state, &self.config.decay, elapsed, &mut self.rng);
        if let Some(event) = report.event {
            texts.push(format!("Evento: {}", event.text()));
            self.log_line(event.text());
        }
        if !report.critical {
            self.sick_warned = false;
        } else if !self.sick_warned {
            self.sick_warned = true;
            texts.push(SICK.to_string());
            self.log_line(SICK);
        }
        texts
    }

    /// One nap step. Returns `true` when the pet woke up.
    fn nap_step(&mut self, texts: &mut Vec<String>) -> bool {
        let Some(left) = self.nap.as_mut() else {
            return false;
        };
        apply_effects(&mut self.state.stats, NAP_STEP);
        *left = left.saturating_sub(1);
        if *left > 0 {
            return false;
        }
        self.nap = None;
        self.nap_timer = None;
        let ups = add_xp(&mut self.state, WAKE_XP);
        info!("pet woke up");
        self.log_line(WOKE);
        texts.push(WOKE.to_string());
        texts.extend(self.level_up_texts(&ups));
        true
    }

    /// One spawner second. Returns `true` when the session ended.
    fn minigame_second(&mut self, now: i64, texts: &mut Vec<String>) -> bool {
        let Some(session) = self.minigame.as_mut() else {
            return false;
        };
        let SecondOutcome::Finished { score } = session.on_second(now, &mut self.rng) else {
            return false;
        };
        self.minigame = None;
        self.spawn_timer = None;
        let summary = settle(&mut self.state, score);
        self.log_line(format!("Mini-jogo: {score} pontos"));
        texts.push(format!("Mini-jogo acabou! Pontos: {score}"));
        texts.extend(self.level_up_texts(&summary.level_ups));
        true
    }

    fn level_up_texts(&mut self, ups: &[LevelUp]) -> Vec<String> {
        ups.iter()
            .map(|up| {
                let text = format!("↑ Subiu para o nível {}!", up.level);
                self.log_line(text.clone());
                text
            })
            .collect()
    }

    fn finish(&mut self, mut texts: Vec<String>, check: bool, persist: bool) -> Outcome {
        let unlocked = if check {
            evaluate(&mut self.state)
        } else {
            Vec::new()
        };
        for name in &unlocked {
            self.log_line(format!("Conquista desbloqueada: {name}"));
            texts.push(format!("Conquista: {name}"));
        }
        if persist || !unlocked.is_empty() {
            self.persist();
        }
        let notices: Vec<Notice> = texts.into_iter().map(Notice::new).collect();
        if let Some(last) = notices.last() {
            self.last_notice = Some(last.clone());
        }
        Outcome {
            notices,
            unlocked,
            rejected: None,
        }
    }

    fn persist(&mut self) -> bool {
        save_state(&mut self.store, &self.config.storage_key, &self.state)
    }

    fn log_line(&mut self, text: impl Into<String>) {
        let at = utc_datetime(self.clock.now_ms());
        self.log.push(at, text);
    }
}
