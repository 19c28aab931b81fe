//! Hand history persistence.
//!
//! One JSON line per hand under `logs/hands/<hand_id>.jsonl`: the recorded
//! history plus a UTC RFC 3339 timestamp. Logging sits outside the decision
//! path; failures are reported to the caller and never abort a session.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::SystemTime;

use serde_json::{json, Map, Value};

use crate::error::BotError;
use crate::poker::card::Street;
use crate::state::HandHistory;

const ALL_STREETS: [Street; 5] = [
    Street::PreFlop,
    Street::Flop,
    Street::Turn,
    Street::River,
    Street::Showdown,
];

/// Appends finished hands to per-hand JSONL files.
#[derive(Debug, Clone)]
pub struct HandLogger {
    directory: PathBuf,
}

impl HandLogger {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Append one line describing the finished hand.
    pub fn log_hand(&self, history: &HandHistory) -> Result<(), BotError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(format!("{}.jsonl", history.hand_id));

        let mut boards = Map::new();
        for street in ALL_STREETS {
            if let Some(cards) = history.board_by_street.get(&street) {
                boards.insert(
                    street.wire_name().to_string(),
                    serde_json::to_value(cards)?,
                );
            }
        }

        let mut actions = Map::new();
        for street in ALL_STREETS {
            let records: Vec<Value> = history
                .actions
                .get(&street)
                .map(|records| {
                    records
                        .iter()
                        .map(|r| {
                            json!({
                                "seat": r.seat,
                                "action": r.action,
                                "amount": r.amount,
                                "timestamp": r.timestamp,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            actions.insert(street.wire_name().to_string(), Value::Array(records));
        }

        let payload = json!({
            "hand_id": history.hand_id,
            "button": history.button,
            "start_stacks": history.start_stacks,
            "board_by_street": boards,
            "payouts": history.payouts,
            "eliminations": history.eliminations,
            "showdowns": history.showdowns,
            "actions": actions,
            "timestamp": humantime::format_rfc3339(SystemTime::now()).to_string(),
        });

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{payload}")?;
        Ok(())
    }
}
