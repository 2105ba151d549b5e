// Live game loop: alternates agents, toggles coin visibility and applies the
// moves chosen by the searcher to the real game state

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::{check_placement, starting_agents, Agent, Agents};
use crate::board::Board;
use crate::config::{Config, Strategy};
use crate::error::SetupError;
use crate::game_log::{GameLog, LogEntry};
use crate::greedy;
use crate::moves::{apply_move, collect_starting_coins};
use crate::search::{turn_seed, SearchResult, Searcher};
use crate::types::{opponent, Coord, Direction, VisibilityChange};

/// Receives fire-and-forget notifications about live state changes, e.g. to
/// drive a renderer or a physical simulation. All methods default to no-ops.
pub trait GameObserver {
    fn coin_collected(&mut self, _agent: usize, _at: Coord) {}

    fn coin_visibility_changed(&mut self, _change: &VisibilityChange) {}

    fn agent_moved(&mut self, _agent: usize, _to: Coord, _facing: Direction) {}
}

/// Result of a single call to `Game::play_turn`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved {
        agent: usize,
        direction: Direction,
        score_delta: u32,
        collected: bool,
    },
    /// The agent had no legal move
    Passed { agent: usize },
    /// No coins left, or the round limit was reached
    Finished,
}

/// Final result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    /// Moves actually applied (passes are not counted)
    pub rounds: u32,
    pub scores: [u32; 2],
    /// `None` on a draw
    pub winner: Option<usize>,
    /// True if the game stopped at `max_rounds` with coins still on the board
    pub round_limit_hit: bool,
}

pub struct Game {
    config: Config,
    board: Board,
    agents: Agents,
    to_move: usize,
    rounds: u32,
    turns: u32,
    seed: u64,
    rng: StdRng,
    observers: Vec<Box<dyn GameObserver>>,
    log: GameLog,
}

impl Game {
    /// Starts a game seeded from `config.game.seed`
    pub fn new(config: Config) -> Result<Self, SetupError> {
        let seed = config.game.seed;
        Self::with_seed(config, seed)
    }

    /// Starts a game on a random board with agents at opposite corners
    ///
    /// Agents that start on a visible coin collect it immediately.
    pub fn with_seed(config: Config, seed: u64) -> Result<Self, SetupError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::random(config.board.size, config.board.coin_probability, &mut rng);
        let mut agents = starting_agents(config.board.size);

        for index in collect_starting_coins(&mut board, &mut agents) {
            info!("Player {} starts on a coin", Agent::label(index));
        }

        Ok(Self::assemble(config, board, agents, rng, seed))
    }

    /// Starts a game from an explicit position; agent 0 moves first
    ///
    /// Both agents must stand on the board, on different cells.
    pub fn with_board(
        config: Config,
        board: Board,
        agents: Agents,
        seed: u64,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        check_placement(&board, &agents)?;
        let rng = StdRng::seed_from_u64(seed);
        Ok(Self::assemble(config, board, agents, rng, seed))
    }

    fn assemble(config: Config, board: Board, agents: Agents, rng: StdRng, seed: u64) -> Self {
        let log = GameLog::new(config.debug.enabled, &config.debug.log_file_path);

        Game {
            config,
            board,
            agents,
            to_move: 0,
            rounds: 0,
            turns: 0,
            seed,
            rng,
            observers: Vec::new(),
            log,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agents(&self) -> &Agents {
        &self.agents
    }

    pub fn to_move(&self) -> usize {
        self.to_move
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_finished(&self) -> bool {
        self.board.remaining_coin_count() == 0 || self.turns >= self.config.game.max_rounds
    }

    /// Plays one turn for the agent to move
    ///
    /// The live board's visibility is toggled first, then the search runs on
    /// the toggled state and its move is applied. A boxed-in agent passes.
    pub fn play_turn(&mut self) -> TurnOutcome {
        if self.is_finished() {
            return TurnOutcome::Finished;
        }

        if self.config.game.toggle_visibility {
            let changes = self
                .board
                .toggle_visibility(&mut self.rng, self.config.board.visibility_toggle_probability);
            debug!("{} coins changed visibility", changes.len());
            for change in &changes {
                for observer in self.observers.iter_mut() {
                    observer.coin_visibility_changed(change);
                }
            }
        }

        let agent = self.to_move;
        let round = self.turns + 1;
        let strategy = self.config.game.strategies[agent];
        let result = self.choose_move(agent, round, strategy);

        if self.log.is_enabled() {
            let entry = LogEntry::new(
                round,
                agent,
                result.best_move,
                self.board.clone(),
                self.agents,
            )
            .with_seed(self.seed)
            .with_strategy(strategy);
            self.log.record(&entry);
        }

        let outcome = match result.best_move {
            Some(direction) => self.apply_live_move(agent, direction),
            None => {
                info!("Player {} has no legal move and passes", Agent::label(agent));
                TurnOutcome::Passed { agent }
            }
        };

        self.turns += 1;
        self.to_move = opponent(agent);
        outcome
    }

    /// Runs the agent's strategy on the live state
    ///
    /// Minimax ties are broken with an RNG seeded by `turn_seed`, so the replay
    /// tool can reproduce every choice.
    fn choose_move(&self, agent: usize, round: u32, strategy: Strategy) -> SearchResult {
        match strategy {
            Strategy::Minimax => {
                let rng = StdRng::seed_from_u64(turn_seed(self.seed, round));
                let mut searcher = Searcher::new(self.config.search, self.config.scoring, rng);
                searcher.best_move(&self.board, &self.agents, agent)
            }
            Strategy::Greedy => greedy::choose_move(&self.board, &self.agents, agent),
        }
    }

    fn apply_live_move(&mut self, agent: usize, direction: Direction) -> TurnOutcome {
        let transition = match apply_move(
            &self.board,
            &self.agents,
            agent,
            direction,
            &self.config.scoring,
        ) {
            Ok(transition) => transition,
            Err(e) => {
                error!("Search chose an unplayable move: {}", e);
                return TurnOutcome::Passed { agent };
            }
        };

        self.board = transition.board;
        self.agents = transition.agents;
        self.rounds += 1;

        let mover = self.agents[agent];
        for observer in self.observers.iter_mut() {
            observer.agent_moved(agent, mover.position, direction);
            if transition.collected {
                observer.coin_collected(agent, mover.position);
            }
        }

        if transition.collected {
            info!(
                "Round {}: Player {} moves {} and collects a coin (+{}, total {}, streak {})",
                self.rounds,
                Agent::label(agent),
                direction,
                transition.score_delta,
                mover.score,
                mover.streak
            );
        } else {
            info!(
                "Round {}: Player {} moves {}",
                self.rounds,
                Agent::label(agent),
                direction
            );
        }

        TurnOutcome::Moved {
            agent,
            direction,
            score_delta: transition.score_delta,
            collected: transition.collected,
        }
    }

    /// Plays until no coins remain or the round limit is reached
    pub fn play(&mut self) -> GameSummary {
        while self.play_turn() != TurnOutcome::Finished {}
        self.summary()
    }

    pub fn summary(&self) -> GameSummary {
        let scores = [self.agents[0].score, self.agents[1].score];
        let winner = match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        };

        GameSummary {
            rounds: self.rounds,
            scores,
            winner,
            round_limit_hit: self.board.remaining_coin_count() > 0,
        }
    }
}
