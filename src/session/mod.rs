//! A single game from title screen to final score.
//!
//! Two loops run side by side: the input listener turns key presses into
//! intents in an [`IntentMailbox`], and the simulation driver ticks the world
//! on a fixed timer or as soon as an intent arrives. Only the driver touches
//! the world. When either loop stops the session, both exit and the teardown
//! plays the death flash, the captions and records the score.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::{Stream, StreamExt};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, info, warn};

use crate::game::{Action, DeathCause, TickOutcome, WorldState, palette};
use crate::input::{InputHandler, IntentMailbox, KeyAction, StopSignal};
use crate::ranking::{RankingLedger, ScoreOutcome};
use crate::render::{Canvas, LARGE_TITLE, TerminalCanvas};

pub const TITLE: &str = "Snake";
pub const GAME_OVER: &str = "Game over!!";
pub const HIGHSCORE: &str = "Highscore!!";
const CAPTION_SIZE: u16 = 10;

/// How a session ended
#[derive(Debug)]
pub struct SessionSummary {
    pub outcome: TickOutcome,
    pub death_cause: Option<DeathCause>,
    pub score: i64,
    pub ticks: u64,
    pub ranking: ScoreOutcome,
}

pub struct Session {
    world: WorldState,
    ranking: RankingLedger,
    player: String,
    show_title: bool,
}

impl Session {
    pub fn new(world: WorldState, ranking: RankingLedger, player: impl Into<String>) -> Self {
        Self {
            world,
            ranking,
            player: player.into(),
            show_title: true,
        }
    }

    pub fn skip_title(mut self, skip: bool) -> Self {
        self.show_title = !skip;
        self
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn ranking(&self) -> &RankingLedger {
        &self.ranking
    }

    /// Play in the current terminal
    pub async fn run(&mut self) -> Result<SessionSummary> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let mut canvas = TerminalCanvas::new(terminal, self.world.config().pixel_scale);
        let result = self.play(&mut canvas, EventStream::new()).await;

        cleanup_terminal(canvas.terminal_mut());

        result
    }

    /// Run the whole session against any canvas and key event source
    pub async fn play<C, S>(&mut self, canvas: &mut C, events: S) -> Result<SessionSummary>
    where
        C: Canvas,
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        let dwell = self.world.config().title_duration;

        if self.show_title {
            show_caption(canvas, TITLE, LARGE_TITLE, dwell).await;
        }

        info!(player = %self.player, "session started");

        let mailbox = IntentMailbox::new();
        let stop = StopSignal::new();

        let world = &mut self.world;
        let driver = async {
            let result = drive(world, &mut *canvas, &mailbox, &stop).await;
            stop.stop();
            result
        };
        let listener = listen_for_input(events, &mailbox, &stop);

        // Teardown only starts once the listener is gone
        let (outcome, ()) = tokio::join!(driver, listener);
        let outcome = outcome?;

        Ok(self.teardown(canvas, outcome).await)
    }

    async fn teardown<C: Canvas>(
        &mut self,
        canvas: &mut C,
        outcome: TickOutcome,
    ) -> SessionSummary {
        let config = self.world.config().clone();

        for frame in 0..config.death_flash_count {
            let color = if frame % 2 == 0 {
                palette::HUNGRY
            } else {
                palette::FOOD
            };
            self.world.set_head_color(color);
            paint_world(&self.world, canvas);
            sleep(config.death_flash_interval).await;
        }

        show_caption(canvas, GAME_OVER, CAPTION_SIZE, config.title_duration).await;

        let score = self.world.score();
        let ranking = self.ranking.record_score(&self.player, score);
        info!(
            player = %self.player,
            score,
            accepted = ranking.accepted,
            highscore = ranking.is_highscore,
            "session finished"
        );

        if ranking.is_highscore {
            show_caption(canvas, HIGHSCORE, CAPTION_SIZE, config.title_duration).await;
        }

        show_caption(canvas, &score.to_string(), CAPTION_SIZE, config.title_duration).await;

        SessionSummary {
            outcome,
            death_cause: self.world.organism().death_cause(),
            score,
            ticks: self.world.ticks(),
            ranking,
        }
    }
}

/// Tick the world until the snake dies or the session is stopped.
///
/// A waiting intent is applied on the next timer tick, or immediately when it
/// arrives, which also restarts the timer.
pub async fn drive<C: Canvas>(
    world: &mut WorldState,
    canvas: &mut C,
    mailbox: &IntentMailbox,
    stop: &StopSignal,
) -> Result<TickOutcome> {
    let mut timer = interval(world.config().tick_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    timer.tick().await;

    paint_world(world, canvas);

    while world.outcome() == TickOutcome::Alive {
        let action = tokio::select! {
            _ = stop.stopped() => break,
            _ = timer.tick() => Action::from(mailbox.take()),
            _ = mailbox.posted() => match mailbox.take() {
                Some(direction) => {
                    timer.reset();
                    Action::Move(direction)
                }
                None => continue,
            },
        };

        world.tick(action).context("Simulation tick failed")?;
        paint_world(world, canvas);
    }

    Ok(world.outcome())
}

/// Forward key presses to the mailbox until quit, stream end, or stop
pub async fn listen_for_input<S>(mut events: S, mailbox: &IntentMailbox, stop: &StopSignal)
where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    let handler = InputHandler::new();

    loop {
        tokio::select! {
            _ = stop.stopped() => break,
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handler.handle_key_event(key) {
                        KeyAction::Move(direction) => {
                            debug!(?direction, "intent");
                            mailbox.post(direction);
                        }
                        KeyAction::Quit => {
                            info!("quit requested");
                            stop.stop();
                            break;
                        }
                        KeyAction::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(%err, "input stream failed");
                    stop.stop();
                    break;
                }
                None => {
                    stop.stop();
                    break;
                }
            },
        }
    }
}

/// Draw the board. A failed frame is logged and skipped.
fn paint_world<C: Canvas>(world: &WorldState, canvas: &mut C) {
    let snapshot = world.snapshot();
    if let Err(err) = canvas.paint_cells(&snapshot.grid, &snapshot.cells) {
        warn!(?err, "failed to draw frame");
    }
}

async fn show_caption<C: Canvas>(canvas: &mut C, text: &str, size: u16, dwell: Duration) {
    if let Err(err) = canvas.paint_title(text, size) {
        warn!(?err, text, "failed to draw caption");
    }
    sleep(dwell).await;
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) {
    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        tracing::error!(?err, "failed to leave alternate screen");
    }
    if let Err(err) = terminal.show_cursor() {
        tracing::error!(?err, "failed to show cursor");
    }
}
