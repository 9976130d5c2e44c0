//! Tabbed arcade container
//!
//! Mounts exactly one game at a time. Switching tabs tears the current game
//! down (timers cancelled, state dropped) and mounts a freshly started one,
//! so nothing keeps ticking in the background.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PENDING_EVENTS;
use crate::games::{Cars, FlappyBird, FlappyIntent, PingPong, Snake, WhackAMole};
use crate::grid::MergeGame;
use crate::highscores::HighScores;
use crate::platform::input::{Direction, Lateral, is_jump_key};
use crate::sim::{Engine, SimEvent};
use crate::tuning::{Tuning, TuningError};

/// Arcade tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameTab {
    Snake,
    WhackAMole,
    FlappyBird,
    Merge,
    Cars,
    PingPong,
}

impl GameTab {
    pub const ALL: [GameTab; 6] = [
        GameTab::Snake,
        GameTab::WhackAMole,
        GameTab::FlappyBird,
        GameTab::Merge,
        GameTab::Cars,
        GameTab::PingPong,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GameTab::Snake => "Snake",
            GameTab::WhackAMole => "Whack-a-Mole",
            GameTab::FlappyBird => "Flappy Bird",
            GameTab::Merge => "2048",
            GameTab::Cars => "Cars",
            GameTab::PingPong => "Ping pong",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GameTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The mounted game
#[derive(Debug)]
enum ActiveGame {
    Snake(Engine<Snake>),
    Mole(Engine<WhackAMole>),
    Flappy(Engine<FlappyBird>),
    Merge(MergeGame),
    Cars(Engine<Cars>),
    Pong(Engine<PingPong>),
}

/// Run `$body` against whichever tick engine is mounted, or `$merge` against
/// the merge puzzle
macro_rules! on_active {
    ($active:expr, $e:ident => $body:expr, $m:ident => $merge:expr) => {
        match $active {
            ActiveGame::Snake($e) => $body,
            ActiveGame::Mole($e) => $body,
            ActiveGame::Flappy($e) => $body,
            ActiveGame::Cars($e) => $body,
            ActiveGame::Pong($e) => $body,
            ActiveGame::Merge($m) => $merge,
        }
    };
}

impl ActiveGame {
    fn mount(tab: GameTab, tuning: &Tuning, seed: u64) -> Result<Self, TuningError> {
        fn started<G: crate::sim::TickGame>(game: G, seed: u64) -> Engine<G> {
            let mut engine = Engine::new(game, seed);
            engine.start();
            engine
        }

        Ok(match tab {
            GameTab::Snake => ActiveGame::Snake(started(Snake::new(tuning.snake.clone()), seed)),
            GameTab::WhackAMole => {
                ActiveGame::Mole(started(WhackAMole::new(tuning.mole.clone()), seed))
            }
            GameTab::FlappyBird => {
                ActiveGame::Flappy(started(FlappyBird::new(tuning.flappy.clone()), seed))
            }
            GameTab::Merge => ActiveGame::Merge(MergeGame::new(tuning.grid.clone(), seed)?),
            GameTab::Cars => ActiveGame::Cars(started(Cars::new(tuning.cars.clone()), seed)),
            GameTab::PingPong => {
                ActiveGame::Pong(started(PingPong::new(tuning.pong.clone()), seed))
            }
        })
    }

    fn unmount(&mut self) {
        on_active!(self, e => e.stop(), _m => {});
    }
}

/// Tab container: one mounted game, per-tab session leaderboards
#[derive(Debug)]
pub struct Arcade {
    tuning: Tuning,
    seed: u64,
    /// Mount counter, folded into each game's seed
    mounts: u64,
    tab: GameTab,
    active: ActiveGame,
    highscores: [HighScores; 6],
    events: VecDeque<(GameTab, SimEvent)>,
}

impl Arcade {
    /// Build the arcade with the first tab mounted and running. The tuning
    /// is validated first, so no game is mounted with unplayable values.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let tab = GameTab::ALL[0];
        let mut arcade = Self {
            active: ActiveGame::mount(tab, &tuning, seed)?,
            tuning,
            seed,
            mounts: 1,
            tab,
            highscores: std::array::from_fn(|_| HighScores::new()),
            events: VecDeque::new(),
        };
        arcade.collect_events();
        log::info!("Arcade ready on {tab}");
        Ok(arcade)
    }

    pub fn tab(&self) -> GameTab {
        self.tab
    }

    /// Switch tabs. The current game is stopped and dropped; the new one
    /// starts from its initial state. Re-selecting the current tab is a no-op.
    /// On error the current game stays mounted.
    pub fn select(&mut self, tab: GameTab) -> Result<(), TuningError> {
        if tab == self.tab {
            return Ok(());
        }
        let seed = self.seed.wrapping_add(self.mounts);
        let next = ActiveGame::mount(tab, &self.tuning, seed)?;
        self.mounts += 1;

        self.active.unmount();
        log::info!("Unmounted {}", self.tab);
        self.active = next;
        self.tab = tab;
        self.collect_events();
        log::info!("Mounted {tab}");
        Ok(())
    }

    /// Forward elapsed wall time to the mounted game. Returns ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let fired = on_active!(&mut self.active, e => e.advance(elapsed), _m => 0);
        self.collect_events();
        fired
    }

    /// Route a key press to the mounted game. Returns true when the game
    /// accepted it.
    pub fn key_down(&mut self, key: &str) -> bool {
        let accepted = match &mut self.active {
            ActiveGame::Snake(e) => Direction::from_key(key).is_some_and(|d| e.handle_input(d)),
            ActiveGame::Merge(game) => match Direction::from_arrow_key(key) {
                Some(d) => {
                    let before = game.score();
                    let outcome = game.apply_move(d);
                    if outcome.accepted {
                        self.note_merge_move(before);
                    }
                    outcome.accepted
                }
                None => false,
            },
            ActiveGame::Cars(e) => Lateral::from_key(key).is_some_and(|side| e.handle_input(side)),
            ActiveGame::Pong(e) => Lateral::from_key(key).is_some_and(|side| e.handle_input(side)),
            ActiveGame::Flappy(e) => is_jump_key(key) && e.handle_input(FlappyIntent::Flap),
            ActiveGame::Mole(_) => false,
        };
        if !accepted {
            log::trace!("{} ignored key {key:?}", self.tab);
        }
        self.collect_events();
        accepted
    }

    /// Pointer click on the play field (flap)
    pub fn click(&mut self) -> bool {
        let accepted = match &mut self.active {
            ActiveGame::Flappy(e) => e.handle_input(FlappyIntent::Flap),
            _ => false,
        };
        self.collect_events();
        accepted
    }

    /// Pointer click on a board cell (whack)
    pub fn click_cell(&mut self, cell: usize) -> bool {
        let accepted = match &mut self.active {
            ActiveGame::Mole(e) => e.handle_input(cell),
            _ => false,
        };
        self.collect_events();
        accepted
    }

    /// Restart the mounted game from its initial state
    pub fn restart(&mut self) {
        on_active!(&mut self.active, e => e.restart(), m => {
            m.restart();
            self.push_event(SimEvent::Started);
        });
        self.collect_events();
    }

    pub fn score(&self) -> u64 {
        on_active!(&self.active, e => e.score(), m => m.score())
    }

    pub fn is_game_over(&self) -> bool {
        on_active!(&self.active, e => e.is_game_over(), m => m.is_game_over())
    }

    /// Periodic callbacks held by the mounted game (the merge puzzle has none)
    pub fn active_timers(&self) -> usize {
        on_active!(&self.active, e => e.active_timers(), _m => 0)
    }

    /// Snapshot of the mounted game as JSON, for the presentation layer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        on_active!(&self.active, e => serde_json::to_string(&e.snapshot()), m => {
            serde_json::to_string(&m.snapshot())
        })
    }

    pub fn highscores(&self, tab: GameTab) -> &HighScores {
        &self.highscores[tab.index()]
    }

    /// Take queued events from every game mounted since the last drain
    pub fn drain_events(&mut self) -> Vec<(GameTab, SimEvent)> {
        self.events.drain(..).collect()
    }

    fn note_merge_move(&mut self, before: u64) {
        let ActiveGame::Merge(game) = &self.active else {
            return;
        };
        let total = game.score();
        let game_over = game.is_game_over();
        let moves = u64::from(game.snapshot().moves);

        if total > before {
            self.push_event(SimEvent::Scored {
                points: total - before,
                total,
            });
        }
        if game_over {
            self.push_event(SimEvent::GameOver { score: total });
            self.record(total, moves, 0);
        }
    }

    /// Pull events out of the mounted engine, recording finished runs
    fn collect_events(&mut self) {
        let (events, ticks, run_ms) = on_active!(&mut self.active, e => {
            (e.drain_events(), e.ticks(), e.run_time().as_millis() as u64)
        }, _m => return);

        for event in events {
            if let SimEvent::GameOver { score } = event {
                self.record(score, ticks, run_ms);
            }
            self.push_event(event);
        }
    }

    fn record(&mut self, score: u64, ticks: u64, elapsed_ms: u64) {
        let tab = self.tab;
        if let Some(rank) = self.highscores[tab.index()].add_score(score, ticks, elapsed_ms) {
            log::info!("{tab} high score {score} ranked #{rank}");
        }
    }

    fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back((self.tab, event));
    }
}
