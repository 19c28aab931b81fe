//! The session driver.
//!
//! Connects to the game server, sends the hello handshake, and dispatches
//! inbound frames to the tracker, opponent model, and decision engine. One
//! logical task drives the stream; there is exactly one in-flight decision
//! per connection. A decision failure on an `act` frame degrades to a safe
//! fallback action instead of dropping the connection.

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::engine::{build_context, sanitize, Decision, DecisionEngine};
use crate::error::BotError;
use crate::hand_log::HandLogger;
use crate::model::OpponentModel;
use crate::poker::card::Street;
use crate::protocol::{
    id_string, Action, ActRequest, ClientMessage, EventKind, GameEvent, ServerMessage,
};
use crate::state::GameStateTracker;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Flow {
    Continue,
    Stop,
}

/// Safe action for a request we could not fully understand: check, else
/// call, else the first legal action (at `min_raise_to` for a raise), else
/// fold.
fn fallback_from_value(payload: &Value) -> Decision {
    let legal: Vec<&str> = payload
        .get("legal")
        .and_then(Value::as_array)
        .map(|actions| actions.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if legal.contains(&"CHECK") {
        return Decision::new(Action::Check, None);
    }
    if legal.contains(&"CALL") {
        return Decision::new(Action::Call, None);
    }
    if let Some(first) = legal.first() {
        if let Ok(action) = serde_json::from_value::<Action>(Value::from(*first)) {
            let amount = if action == Action::RaiseTo {
                payload
                    .get("min_raise_to")
                    .and_then(Value::as_u64)
                    .map(|a| a as u32)
            } else {
                None
            };
            return Decision::new(action, amount);
        }
    }
    Decision::new(Action::Fold, None)
}

/// The playing agent: tracker + opponent model + engine wired to a websocket.
pub struct HoldemBot {
    team: String,
    bot_label: Option<String>,
    display_name: String,
    tracker: GameStateTracker,
    model: OpponentModel,
    engine: DecisionEngine,
    equity_rng: StdRng,
    hand_logger: HandLogger,
}

impl HoldemBot {
    pub fn new(team: String, bot_label: Option<String>) -> Self {
        Self::with_rng(team, bot_label, StdRng::from_entropy(), DecisionEngine::new())
    }

    /// Fully seeded bot for reproducible tests.
    pub fn with_seed(team: String, bot_label: Option<String>, seed: u64) -> Self {
        Self::with_rng(
            team,
            bot_label,
            StdRng::seed_from_u64(seed),
            DecisionEngine::with_seed(seed.wrapping_add(1)),
        )
    }

    fn with_rng(
        team: String,
        bot_label: Option<String>,
        equity_rng: StdRng,
        engine: DecisionEngine,
    ) -> Self {
        let display_name = match &bot_label {
            Some(label) => format!("{team} ({label})"),
            None => team.clone(),
        };
        Self {
            team,
            bot_label,
            display_name,
            tracker: GameStateTracker::new(),
            model: OpponentModel::new(),
            engine,
            equity_rng,
            hand_logger: HandLogger::new("logs/hands"),
        }
    }

    /// Connect, play until `match_end` or transport close, then return.
    pub async fn connect_and_play(&mut self, url: &str) -> Result<(), BotError> {
        let (mut ws, _) = connect_async(url).await?;
        let hello = ClientMessage::Hello {
            v: 1,
            team: self.team.clone(),
            bot: self.bot_label.clone(),
        };
        ws.send(Message::Text(serde_json::to_string(&hello)?)).await?;
        info!("[connect] {url} as {}", self.display_name);

        while let Some(frame) = ws.next().await {
            match frame? {
                Message::Text(text) => {
                    if let Flow::Stop = self.handle_frame(&text, &mut ws).await? {
                        break;
                    }
                }
                Message::Ping(payload) => ws.send(Message::Pong(payload)).await?,
                Message::Close(_) => break,
                _ => {}
            }
        }
        Ok(())
    }

    async fn handle_frame(&mut self, text: &str, ws: &mut WsStream) -> Result<Flow, BotError> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                warn!("[protocol] ignoring unparseable frame: {err}");
                return Ok(Flow::Continue);
            }
        };

        match serde_json::from_value::<ServerMessage>(value.clone()) {
            Ok(message) => self.dispatch(message, ws).await,
            Err(err) => {
                if value.get("type").and_then(Value::as_str) == Some("act") {
                    warn!("[act] malformed request, falling back: {err}");
                    let decision = fallback_from_value(&value);
                    let hand_id = value.get("hand_id").cloned().unwrap_or(Value::Null);
                    self.send_action(ws, hand_id, decision).await?;
                } else {
                    warn!("[protocol] ignoring malformed frame: {err}");
                }
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(
        &mut self,
        message: ServerMessage,
        ws: &mut WsStream,
    ) -> Result<Flow, BotError> {
        match message {
            ServerMessage::Welcome { seat, config } => {
                info!("[welcome] seat={seat:?}");
                if let Some(seat) = seat {
                    self.tracker.set_seat(seat);
                }
                if let Some(config) = config {
                    self.tracker.update_table_config(&config);
                }
                let display_name = self.display_name.clone();
                self.tracker.register_seat(seat, Some(&display_name));
            }
            ServerMessage::Lobby { players } => {
                for player in players {
                    self.tracker.register_seat(player.seat, player.team.as_deref());
                }
            }
            ServerMessage::StartHand {
                hand_id,
                button,
                stacks,
            } => {
                self.tracker.start_hand(&hand_id, button, &stacks);
                info!(
                    "[hand {}] start | button={}",
                    id_string(&hand_id),
                    self.tracker.seat_label(button)
                );
            }
            ServerMessage::Event(event) => self.handle_event(&event),
            ServerMessage::Act(request) => {
                let decision = self.decide(&request);
                debug!(
                    "[action] hand={} {:?} amount={:?}",
                    id_string(&request.hand_id),
                    decision.action,
                    decision.amount
                );
                self.send_action(ws, request.hand_id.clone(), decision).await?;
            }
            ServerMessage::EndHand { hand_id, stacks } => {
                if let Some(history) = self.tracker.finalize_hand() {
                    if let Err(err) = self.hand_logger.log_hand(&history) {
                        warn!("[hand {}] failed to persist history: {err}", history.hand_id);
                    }
                }
                info!("[hand {}] end | stacks={stacks:?}", id_string(&hand_id));
            }
            ServerMessage::MatchEnd { winner } => {
                info!("[match] winner={winner:?}");
                return Ok(Flow::Stop);
            }
            ServerMessage::AbStatus { bot, state } => {
                info!("[practice] waiting for partner | bot={bot:?} state={state:?}");
            }
            ServerMessage::Error(payload) => warn!("[error] {payload}"),
        }
        Ok(Flow::Continue)
    }

    /// Route one event into the tracker, then feed the opponent model for
    /// non-hero seats.
    fn handle_event(&mut self, event: &GameEvent) {
        self.tracker.handle_event(event);

        let Some(seat) = event.seat else {
            return;
        };
        if Some(seat) == self.tracker.seat {
            return;
        }
        match event.ev {
            EventKind::Bet | EventKind::Raise | EventKind::Call => {
                let aggressive = matches!(event.ev, EventKind::Bet | EventKind::Raise);
                if self.tracker.street == Street::PreFlop {
                    self.model.observe_preflop(seat, true, aggressive);
                } else {
                    self.model.observe_postflop_action(seat, aggressive);
                }
            }
            EventKind::Showdown => self.model.observe_showdown(seat, false),
            EventKind::PotAward => self.model.observe_showdown(seat, true),
            _ => {}
        }
    }

    fn decide(&mut self, request: &ActRequest) -> Decision {
        let ctx = build_context(
            &mut self.tracker,
            &mut self.model,
            request,
            &mut self.equity_rng,
        );
        let decision = self.engine.decide(&ctx);
        sanitize(&ctx, decision)
    }

    async fn send_action(
        &mut self,
        ws: &mut WsStream,
        hand_id: Value,
        decision: Decision,
    ) -> Result<(), BotError> {
        let frame = ClientMessage::Action {
            v: 1,
            hand_id,
            action: decision.action,
            amount: decision.amount,
        };
        ws.send(Message::Text(serde_json::to_string(&frame)?)).await?;
        Ok(())
    }
}
