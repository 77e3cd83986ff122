use anyhow::Result;
use ecogrid_core::{Chance, SeedRequest, Session, SimConfig, SimRng};
use ecogrid_data::{Census, GridSnapshot};
use std::io::Write;

/// How each grid is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `|PH C|` rows followed by a census line.
    #[default]
    Text,
    /// One JSON object per tick.
    Json,
}

/// Headless runner: seeds a session and prints every tick.
pub struct App<C: Chance = SimRng> {
    pub session: Session<C>,
    pub format: OutputFormat,
}

impl App<SimRng> {
    pub fn new(config: SimConfig, format: OutputFormat) -> Result<Self> {
        Ok(Self::with_session(Session::new(config)?, format))
    }
}

impl<C: Chance + Send> App<C> {
    pub fn with_session(session: Session<C>, format: OutputFormat) -> Self {
        Self { session, format }
    }

    /// Seeds the grid and advances up to `ticks` ticks, stopping early once
    /// nothing is alive. Returns the final census.
    pub fn run<W: Write>(&mut self, request: &SeedRequest, ticks: u64, out: &mut W) -> Result<Census> {
        let snapshot = self.session.reset_and_seed(request)?;
        self.emit(out, 0, &snapshot)?;

        for _ in 0..ticks {
            let snapshot = self.session.advance_tick();
            let tick = self.session.tick();
            self.emit(out, tick, &snapshot)?;
            if snapshot.census().living() == 0 {
                tracing::info!(tick, "Grid is empty, stopping early");
                break;
            }
        }

        let metrics = self.session.metrics();
        tracing::info!(
            ticks = self.session.tick(),
            births = metrics.births(),
            deaths = metrics.deaths(),
            meals = metrics.meals(),
            moves = metrics.moves(),
            elapsed_ms = metrics.elapsed().as_millis() as u64,
            "Headless run finished"
        );
        Ok(self.session.census())
    }

    fn emit<W: Write>(&self, out: &mut W, tick: u64, snapshot: &GridSnapshot) -> Result<()> {
        let census = snapshot.census();
        match self.format {
            OutputFormat::Text => {
                writeln!(out, "tick {tick}")?;
                write!(out, "{snapshot}")?;
                writeln!(out, "{census}")?;
            }
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "tick": tick,
                    "census": census,
                    "grid": snapshot,
                });
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
