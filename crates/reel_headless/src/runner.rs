//! Scenario runner that drives a viewport controller through scripted input.

use anyhow::Result;
use reel_core::events::{CardPositionReport, ScrollSample};
use reel_viewport::{ContentItem, Effect, ItemId, Update, ViewportConfig, ViewportController};

use crate::assert::{
    evaluate_active_index, evaluate_effect_count, evaluate_header_opacity, evaluate_overlay_open,
    evaluate_pull, evaluate_refreshing, AssertionResult,
};
use crate::report::{HeadlessReport, RunTotals};
use crate::runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::scenario::{HeadlessScenario, ScenarioStep};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against a default-configured controller.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    run_scenario_with_config(input, ViewportConfig::default(), HeadlessRunConfig::default())
}

/// Execute scenario JSON with explicit controller and runtime configuration.
pub fn run_scenario_with_config(
    input: &str,
    config: ViewportConfig,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, config, runtime_cfg)
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    config: ViewportConfig,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    let viewport = ViewportController::new(config)?;
    ScenarioRunner::new(viewport, runtime_cfg).run(scenario)
}

/// Owns the controller under test and everything it emitted.
#[derive(Debug)]
pub struct ScenarioRunner {
    viewport: ViewportController,
    runtime_cfg: HeadlessRunConfig,
    effects: Vec<Effect>,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl ScenarioRunner {
    pub fn new(viewport: ViewportController, runtime_cfg: HeadlessRunConfig) -> Self {
        Self {
            viewport,
            runtime_cfg,
            effects: Vec::new(),
            elapsed_frames: 0,
            elapsed_ms: 0,
        }
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Every effect emitted so far, in order
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn run(&mut self, scenario: &HeadlessScenario) -> Result<RunOutcome> {
        for (step_index, step) in scenario.steps.iter().enumerate() {
            tracing::debug!("step {}: {:?}", step_index, step);
            if let Some((assertion, result)) = self.step(step)? {
                if let AssertionResult::Failed { code, message } = result {
                    tracing::warn!("step {} failed: {}", step_index, message);
                    let report =
                        HeadlessReport::failed(assertion, step_index, code, message, self.totals())
                            .with_scenario(scenario.name.clone());
                    return Ok(RunOutcome::Failed { report });
                }
            }
        }

        Ok(RunOutcome::Passed {
            report: HeadlessReport::passed(self.totals()).with_scenario(scenario.name.clone()),
        })
    }

    /// Apply one step; assertions return their name and result
    fn step(&mut self, step: &ScenarioStep) -> Result<Option<(&'static str, AssertionResult)>> {
        if let Some(checked) = self.check(step) {
            return Ok(Some(checked));
        }
        self.input(step)?;
        Ok(None)
    }

    fn check(&self, step: &ScenarioStep) -> Option<(&'static str, AssertionResult)> {
        let state = self.viewport.state();
        let checked = match step {
            ScenarioStep::AssertActiveIndex { index } => {
                ("assert_active_index", evaluate_active_index(*index, state))
            }
            ScenarioStep::AssertPull {
                state: expected,
                distance,
            } => ("assert_pull", evaluate_pull(*expected, *distance, state)),
            ScenarioStep::AssertHeaderOpacity { value, tolerance } => (
                "assert_header_opacity",
                evaluate_header_opacity(*value, *tolerance, state),
            ),
            ScenarioStep::AssertEffectCount { effect, count } => (
                "assert_effect_count",
                evaluate_effect_count(*effect, *count, &self.effects),
            ),
            ScenarioStep::AssertOverlayOpen { open } => {
                ("assert_overlay_open", evaluate_overlay_open(*open, state))
            }
            ScenarioStep::AssertRefreshing { refreshing } => {
                ("assert_refreshing", evaluate_refreshing(*refreshing, state))
            }
            _ => return None,
        };
        Some(checked)
    }

    fn input(&mut self, step: &ScenarioStep) -> Result<()> {
        let update = match step {
            ScenarioStep::SetItems { count } => self.viewport.set_items(
                (0..*count)
                    .map(|i| ContentItem::new(format!("item-{i}")))
                    .collect(),
            ),
            ScenarioStep::Scroll { offset, dragging } => self
                .viewport
                .on_scroll(ScrollSample::new(*offset, *dragging)),
            ScenarioStep::Drag { translation } => self.viewport.on_drag_changed(*translation),
            ScenarioStep::Release => self.viewport.on_drag_ended(),
            ScenarioStep::Layout { cards } => {
                let reports: Vec<_> = cards
                    .iter()
                    .map(|(index, center_y)| CardPositionReport::new(*index, *center_y))
                    .collect();
                self.viewport.report_layout(&reports)
            }
            ScenarioStep::Position { index, center_y } => self
                .viewport
                .report_position(CardPositionReport::new(*index, *center_y)),
            ScenarioStep::CardHidden { index } => self.viewport.card_hidden(*index),
            ScenarioStep::ViewportCenter { y } => self.viewport.set_viewport_center(*y),
            ScenarioStep::ScrollToTop { id } => self.viewport.scroll_to_top(&ItemId::new(id.as_str())),
            ScenarioStep::Refresh => self.viewport.refresh(),
            ScenarioStep::ScrollSettled => self.viewport.scroll_settled(),
            ScenarioStep::SetQuery { text } => self.viewport.set_search_query(text.as_str()),
            ScenarioStep::Submit { query: Some(query) } => self.viewport.submit_search(query.as_str()),
            ScenarioStep::Submit { query: None } => self.viewport.submit_current_search(),
            ScenarioStep::Cancel => self.viewport.cancel_search(),
            ScenarioStep::Wait { ms } => {
                let tick_ms = self.runtime_cfg.tick_ms;
                let mut remaining_ms = *ms;
                return self.run_frames(wait_frames(*ms, tick_ms), || {
                    let step_ms = remaining_ms.min(tick_ms);
                    remaining_ms = remaining_ms.saturating_sub(step_ms);
                    step_ms
                });
            }
            ScenarioStep::Tick { frames } => {
                let tick_ms = self.runtime_cfg.tick_ms;
                return self.run_frames(*frames, || tick_ms);
            }
            _ => return Ok(()),
        };
        self.record(update);
        Ok(())
    }

    fn run_frames<A>(&mut self, frames: u32, mut advance_ms: A) -> Result<()>
    where
        A: FnMut() -> u64,
    {
        if frames == 0 {
            return Ok(());
        }

        let mut cfg = self.runtime_cfg;
        cfg.max_frames = frames;
        let mut updates = Vec::with_capacity(frames as usize);
        let viewport = &mut self.viewport;
        let elapsed_frames = &mut self.elapsed_frames;
        let elapsed_ms = &mut self.elapsed_ms;
        HeadlessRuntime::run(cfg, |_| {
            let step_ms = advance_ms();
            *elapsed_frames = elapsed_frames.saturating_add(1);
            *elapsed_ms = elapsed_ms.saturating_add(step_ms);
            updates.push(viewport.tick(step_ms as f32 / 1000.0));
        })?;

        for update in updates {
            self.record(update);
        }
        Ok(())
    }

    fn record(&mut self, update: Update) {
        self.effects.extend(update.effects);
    }

    fn totals(&self) -> RunTotals {
        RunTotals {
            elapsed_frames: self.elapsed_frames,
            elapsed_ms: self.elapsed_ms,
            effects_emitted: self.effects.len(),
            final_active_index: self.viewport.active_index(),
        }
    }
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}
