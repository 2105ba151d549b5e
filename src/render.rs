// Text rendering of the board for the command line game

use std::fmt::Write;

use crate::agent::{Agent, Agents};
use crate::board::Board;
use crate::types::CoinState;

const EMPTY_SYMBOL: char = ' ';
const VISIBLE_SYMBOL: char = '●';
const HIDDEN_SYMBOL: char = '○';

/// Draws the grid with coins and agents, one bordered row per board row
pub fn render_board(board: &Board, agents: &Agents) -> String {
    let size = board.size();
    let separator = format!("+{}\n", "---+".repeat(size));
    let mut symbols: Vec<char> = board
        .iter()
        .map(|(_, state)| match state {
            CoinState::Empty => EMPTY_SYMBOL,
            CoinState::Visible => VISIBLE_SYMBOL,
            CoinState::Hidden => HIDDEN_SYMBOL,
        })
        .collect();

    for (index, agent) in agents.iter().enumerate() {
        if board.in_bounds(agent.position) {
            let idx = agent.position.row as usize * size + agent.position.col as usize;
            symbols[idx] = Agent::label(index);
        }
    }

    let mut out = separator.clone();
    for row in symbols.chunks(size.max(1)) {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
        out.push_str(&separator);
    }
    out
}

/// Board plus coins left and each agent's score and streak
pub fn render_status(board: &Board, agents: &Agents) -> String {
    let mut out = render_board(board, agents);
    let _ = writeln!(out, "Coins left: {}", board.remaining_coin_count());
    for (index, agent) in agents.iter().enumerate() {
        let _ = writeln!(
            out,
            "Player {} score: {} (streak {})",
            Agent::label(index),
            agent.score,
            agent.streak
        );
    }
    out
}
