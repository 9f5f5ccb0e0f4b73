//! Host demos for the Click catalog
//!
//! Each binary in `src/bin` wires one board to a [`MockBoard`], scripts the
//! device side of its bus, then runs the board's `init` once and its `task`
//! for a bounded number of iterations.
//!
//! Run with: `RUST_LOG=debug cargo run -p demo --bin ambient2`

#![allow(missing_docs)]

use anyhow::anyhow;
use embedded_hal::delay::DelayNs;
use platform::mocks::MockBoard;
use tracing_subscriber::EnvFilter;

/// One board's application state, built by `init` and advanced by `task`.
pub trait App: Sized {
    /// Name used in log lines.
    const NAME: &'static str;
    /// Pause between two `task` calls.
    const PERIOD_MS: u32 = 1000;

    /// Open the board and run its power-on sequence.
    fn init(board: &mut MockBoard) -> clicks::Result<Self>;

    /// One superloop iteration. `board` gives access to the simulated
    /// device side.
    fn task(&mut self, board: &mut MockBoard) -> clicks::Result<()>;
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second install (tests, repeated runs) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run `A` for `iterations` superloop passes.
pub fn run<A: App>(board: &mut MockBoard, iterations: u32) -> anyhow::Result<()> {
    init_tracing();
    tracing::info!(app = A::NAME, "application init");
    let mut app = A::init(board).map_err(|err| anyhow!("{} init: {err}", A::NAME))?;
    let mut delay = board.delay_handle();

    for iteration in 0..iterations {
        app.task(board)
            .map_err(|err| anyhow!("{} task {iteration}: {err}", A::NAME))?;
        delay.delay_ms(A::PERIOD_MS);
    }

    tracing::info!(
        app = A::NAME,
        iterations,
        simulated_ms = board.delay_handle().elapsed_ms(),
        "done"
    );
    Ok(())
}
