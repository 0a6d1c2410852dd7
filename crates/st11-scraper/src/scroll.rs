//! Incremental scrolling that forces lazy-loaded card images into the DOM.
//!
//! The page grows as it is scrolled, so the loop advances a virtual
//! position in fixed steps, pauses for content to materialize, and stops
//! when a full pass ends with the document height unchanged. A hard round
//! cap bounds the loop on pages whose height never stabilizes.
//!
//! The stop/restart decision lives in [`ScrollState`], a pure struct, so
//! the termination bound is testable without a browser; the async driver
//! only evaluates scroll script and sleeps.

use std::time::Duration;

use chromiumoxide::Page;
use tokio_util::sync::CancellationToken;

use crate::error::ScraperError;
use crate::events::EventSender;

/// Tunables for one scroll run, taken from `AppConfig`.
#[derive(Debug, Clone, Copy)]
pub struct ScrollSettings {
    /// Pixels advanced per round.
    pub step_px: u32,
    /// Pause after each advance.
    pub pause: Duration,
    /// Hard cap on rounds.
    pub max_rounds: u32,
}

impl ScrollSettings {
    #[must_use]
    pub fn new(step_px: u32, pause: Duration, max_rounds: u32) -> Self {
        Self {
            step_px,
            pause,
            max_rounds,
        }
    }
}

/// Decision after observing the document height at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    /// Position has not yet reached the known bottom; keep advancing.
    Continue,
    /// Bottom reached but the page grew; position reset to 0 for another
    /// full pass over the newly revealed content.
    Restart,
    /// Bottom reached and the height is stable; the loop is done.
    Stop,
}

/// Pure scroll-loop state: position, tracked height, and the round budget.
#[derive(Debug)]
pub struct ScrollState {
    step_px: u64,
    max_rounds: u32,
    rounds: u32,
    position: u64,
    last_height: u64,
}

impl ScrollState {
    #[must_use]
    pub fn new(step_px: u32, max_rounds: u32, initial_height: u64) -> Self {
        Self {
            step_px: u64::from(step_px),
            max_rounds,
            rounds: 0,
            position: 0,
            last_height: initial_height,
        }
    }

    /// Begins the next round: advances the virtual position by one step
    /// and returns the new target, or `None` once the round cap is spent.
    pub fn next_position(&mut self) -> Option<u64> {
        if self.rounds >= self.max_rounds {
            return None;
        }
        self.rounds += 1;
        self.position += self.step_px;
        Some(self.position)
    }

    /// Feeds the document height measured after the pause and decides how
    /// the loop proceeds. On [`ScrollStep::Restart`] the tracked height is
    /// updated and the position resets to 0.
    pub fn observe_height(&mut self, new_height: u64) -> ScrollStep {
        if self.position < new_height {
            return ScrollStep::Continue;
        }
        if new_height == self.last_height {
            return ScrollStep::Stop;
        }
        self.last_height = new_height;
        self.position = 0;
        ScrollStep::Restart
    }

    /// Rounds performed so far.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

/// Drives the live page until the height stabilizes, the round cap is
/// reached, or the token is cancelled (checked before every round; a
/// cancelled loop exits quietly, not as an error).
///
/// The only effect is on the page itself — lazy content is now loaded.
/// Returns the number of rounds performed.
///
/// # Errors
///
/// Returns [`ScraperError::Cdp`] if script evaluation against the page
/// fails.
pub async fn scroll_until_stable(
    page: &Page,
    settings: ScrollSettings,
    cancel: &CancellationToken,
    events: &EventSender,
) -> Result<u32, ScraperError> {
    let initial_height = document_height(page).await?;
    let mut state = ScrollState::new(settings.step_px, settings.max_rounds, initial_height);

    loop {
        if cancel.is_cancelled() {
            tracing::info!(rounds = state.rounds(), "scroll loop cancelled");
            break;
        }
        let Some(position) = state.next_position() else {
            tracing::warn!(
                max_rounds = settings.max_rounds,
                "scroll round cap reached before the page height stabilized"
            );
            break;
        };

        page.evaluate(format!("window.scrollTo(0, {position})"))
            .await?;
        tokio::time::sleep(settings.pause).await;

        let height = document_height(page).await?;
        events.log(format!(
            "scrolling... ({position}/{height}px) [{}/{} rounds]",
            state.rounds(),
            settings.max_rounds
        ));

        if state.observe_height(height) == ScrollStep::Stop {
            tracing::debug!(rounds = state.rounds(), height, "page height stable");
            break;
        }
    }

    Ok(state.rounds())
}

async fn document_height(page: &Page) -> Result<u64, ScraperError> {
    page.evaluate("document.body.scrollHeight")
        .await?
        .into_value::<u64>()
        .map_err(ScraperError::Snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the pure loop against a height oracle, returning (rounds, stopped_by_cap).
    fn simulate(step: u32, max_rounds: u32, mut height_at: impl FnMut(u32) -> u64) -> (u32, bool) {
        let mut state = ScrollState::new(step, max_rounds, height_at(0));
        loop {
            let Some(_position) = state.next_position() else {
                return (state.rounds(), true);
            };
            let height = height_at(state.rounds());
            if state.observe_height(height) == ScrollStep::Stop {
                return (state.rounds(), false);
            }
        }
    }

    #[test]
    fn stops_when_height_is_stable() {
        // Fixed-height page of 2400px with 800px steps: three rounds to the
        // bottom, stop on the third because the height never changed.
        let (rounds, capped) = simulate(800, 100, |_| 2400);
        assert_eq!(rounds, 3);
        assert!(!capped);
    }

    #[test]
    fn restarts_from_top_when_page_grows() {
        // Page grows once: 1600 → 3200 revealed during the second round.
        let (rounds, capped) = simulate(800, 100, |round| if round <= 1 { 1600 } else { 3200 });
        // Rounds 1-4 walk down to 3200 and restart (height grew past the
        // tracked 1600); rounds 5-8 walk the full page again and stop at
        // the now-stable bottom.
        assert_eq!(rounds, 8);
        assert!(!capped);
    }

    #[test]
    fn terminates_at_cap_when_height_grows_forever() {
        // Adversarial page: height always one step ahead of the position.
        let (rounds, capped) = simulate(800, 100, |round| u64::from(round + 2) * 800);
        assert_eq!(rounds, 100);
        assert!(capped);
    }

    #[test]
    fn terminates_within_cap_for_any_growth_pattern() {
        // A few arbitrary growth curves; the loop must never exceed the cap.
        for pattern in [0u64, 1, 7, 131] {
            let (rounds, _) = simulate(800, 100, |round| 1000 + u64::from(round) * pattern);
            assert!(rounds <= 100, "pattern {pattern} ran {rounds} rounds");
        }
    }

    #[test]
    fn zero_cap_performs_no_rounds() {
        let (rounds, capped) = simulate(800, 0, |_| 5000);
        assert_eq!(rounds, 0);
        assert!(capped);
    }
}
