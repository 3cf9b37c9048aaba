use std::fmt::Write as _;

use client_core::{
    share::{format_clock, ranking_badge},
    Challenge, SessionPhase, SessionSnapshot, VerificationResult,
};
use shared::{domain::CellPos, protocol::HistoryEntry};

const RULE: &str = "  +-------+-------+-------+";

pub fn render_board(snapshot: &SessionSnapshot, selection: Option<CellPos>) -> String {
    let mut out = String::new();
    out.push_str("    1 2 3   4 5 6   7 8 9\n");
    for row in 0..9 {
        if row % 3 == 0 {
            out.push_str(RULE);
            out.push('\n');
        }
        let _ = write!(out, "{} |", row + 1);
        for col in 0..9 {
            let selected = selection == CellPos::new(row, col);
            let value = snapshot.user_grid[row][col];
            let glyph = match value {
                0 if !snapshot.notes[row][col].is_empty() => '+',
                0 => '.',
                digit => char::from(b'0' + digit),
            };
            let trailer = if value != 0 && !snapshot.is_fixed(row, col) {
                '\''
            } else {
                ' '
            };
            if selected {
                let _ = write!(out, "[{glyph}]");
            } else {
                let _ = write!(out, " {glyph}{trailer}");
            }
            if col % 3 == 2 {
                out.push('|');
            }
        }
        out.push('\n');
    }
    out.push_str(RULE);
    out.push('\n');

    if let Some(pos) = selection {
        let notes = &snapshot.notes[pos.row][pos.col];
        if !notes.is_empty() {
            let listed: Vec<String> = notes.iter().map(u8::to_string).collect();
            let _ = writeln!(
                out,
                "notes at r{}c{}: {}",
                pos.row + 1,
                pos.col + 1,
                listed.join(" ")
            );
        }
    }
    out
}

pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let mode = if snapshot.note_mode { "notes" } else { "digits" };
    match snapshot.phase {
        SessionPhase::Active => format!(
            "{}  time {}  mode {mode}",
            snapshot.date_key,
            format_clock(snapshot.elapsed_seconds)
        ),
        SessionPhase::Completed => format!(
            "{}  solved in {}",
            snapshot.date_key,
            format_clock(snapshot.completion_seconds.unwrap_or(snapshot.elapsed_seconds))
        ),
        SessionPhase::Expired => format!(
            "{}  {}",
            snapshot.date_key,
            snapshot
                .expired_reason
                .as_deref()
                .unwrap_or("session expired")
        ),
    }
}

pub fn render_result(result: &VerificationResult, share_link: Option<&str>) -> String {
    let mut out = format!("Puzzle solved in {}!\n", format_clock(result.elapsed_seconds));
    if let Some(ranking) = result.ranking {
        let _ = writeln!(
            out,
            "Rank {} of {} ({:.0}th percentile)  {}",
            ranking.rank,
            ranking.total,
            ranking.percentile,
            ranking_badge(ranking.percentile)
        );
    }
    if let Some(link) = share_link {
        let _ = writeln!(out, "Challenge a friend: {link}");
    }
    out
}

pub fn render_challenge(challenge: &Challenge) -> String {
    match challenge.top_label() {
        Some(top) => format!(
            "A friend solved today's puzzle in {} ({top}). Can you beat it?",
            challenge.time_label()
        ),
        None => format!(
            "A friend solved today's puzzle in {}. Can you beat it?",
            challenge.time_label()
        ),
    }
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "no past puzzles\n".into();
    }
    let mut out = String::new();
    for entry in entries {
        let difficulty = entry.difficulty.map(|d| d.as_str()).unwrap_or("-");
        let outcome = if entry.completed == 1 {
            format!(
                "solved in {}",
                format_clock(entry.completion_time.unwrap_or(entry.elapsed_time))
            )
        } else {
            format!("unfinished after {}", format_clock(entry.elapsed_time))
        };
        let _ = writeln!(out, "{}  {difficulty:<6}  {outcome}", entry.date);
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
