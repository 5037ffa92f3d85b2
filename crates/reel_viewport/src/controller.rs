//! Viewport orchestrator
//!
//! [`ViewportController`] owns every component of the feed interaction and
//! is the only thing the host talks to. Each input method:
//!
//! 1. routes the input to the components that care about it,
//! 2. turns their discrete outcomes into [`Effect`]s,
//! 3. rebuilds the [`ViewportState`] snapshot and notifies observers if it
//!    changed,
//!
//! and returns both as an [`Update`]. Delayed work (refresh completion,
//! input re-enable, haptic cooldown, resolver resume) goes through a timer
//! queue advanced by [`ViewportController::tick`]; every timer carries a
//! generation and is ignored if the state it was scheduled for is gone.

use reel_core::events::{CardPositionReport, DragPhase, InputEvent, ScrollSample};
use reel_core::observe::{ObserverId, Observers};
use reel_core::timer::{TimerId, TimerQueue};

use crate::config::ViewportConfig;
use crate::effects::{Effect, Effects, Impact, Update};
use crate::error::ConfigError;
use crate::haptics::HapticGate;
use crate::header::HeaderAnimator;
use crate::item::{ContentItem, ItemId};
use crate::pull::{PullGestureController, PullOutcome, PullOutcomes};
use crate::resolver::CenterIndexResolver;
use crate::search::{SearchOutcome, SearchOverlayController};
use crate::state::ViewportState;
use crate::visibility::{CardVisibility, CardVisibilityMapper};

/// Delayed work scheduled on the controller's timer queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scheduled {
    RefreshFinished { generation: u64 },
    InputReenabled { generation: u64 },
    ResolverResumed { generation: u64 },
    HapticReset { generation: u64 },
}

#[derive(Debug)]
pub struct ViewportController {
    config: ViewportConfig,
    header: HeaderAnimator,
    resolver: CenterIndexResolver,
    visibility: CardVisibilityMapper,
    pull: PullGestureController,
    search: SearchOverlayController,
    haptics: HapticGate,
    timers: TimerQueue<Scheduled>,
    observers: Observers<ViewportState>,
    items: Vec<ContentItem>,
    last_sample: ScrollSample,
    active_index: usize,
    refreshing: bool,
    refresh_generation: u64,
    input_generation: u64,
    hold_generation: u64,
    hold_timer: Option<TimerId>,
    /// Last published snapshot
    snapshot: ViewportState,
}

impl ViewportController {
    /// Create a controller after validating `config`
    pub fn new(config: ViewportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ViewportConfig) -> Self {
        let mut controller = Self {
            header: HeaderAnimator::new(&config.header),
            resolver: CenterIndexResolver::new(&config.resolver),
            visibility: CardVisibilityMapper::new(&config.visibility),
            pull: PullGestureController::new(config.pull.clone()),
            search: SearchOverlayController::new(),
            haptics: HapticGate::new(&config.haptics),
            timers: TimerQueue::new(),
            observers: Observers::new(),
            items: Vec::new(),
            last_sample: ScrollSample::default(),
            active_index: 0,
            refreshing: false,
            refresh_generation: 0,
            input_generation: 0,
            hold_generation: 0,
            hold_timer: None,
            snapshot: ViewportState::default(),
            config,
        };
        controller.snapshot = controller.build_snapshot();
        controller
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Last published snapshot
    pub fn state(&self) -> &ViewportState {
        &self.snapshot
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Virtual time in seconds, advanced by [`tick`](Self::tick)
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    /// Check whether the pull indicator is still animating
    pub fn is_animating(&self) -> bool {
        self.pull.is_snapping_back()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Run `observer` whenever the snapshot changes
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ViewportState) + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Visibility tier of one card, None if the index is not in the feed
    pub fn visibility(&self, index: usize) -> Option<CardVisibility> {
        (index < self.items.len()).then(|| self.visibility.for_index(index, self.active_index))
    }

    /// Visibility tier of every card, in feed order
    pub fn visibilities(&self) -> Vec<CardVisibility> {
        (0..self.items.len())
            .map(|index| self.visibility.for_index(index, self.active_index))
            .collect()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Reduce one raw host event
    pub fn handle(&mut self, event: InputEvent) -> Update {
        match event {
            InputEvent::Scroll(sample) => self.on_scroll(sample),
            InputEvent::Drag(DragPhase::Changed { translation_y }) => {
                self.on_drag_changed(translation_y)
            }
            InputEvent::Drag(DragPhase::Ended) => self.on_drag_ended(),
            InputEvent::Position(report) => self.report_position(report),
            InputEvent::Layout(reports) => self.report_layout(&reports),
            InputEvent::CardHidden(index) => self.card_hidden(index),
            InputEvent::ViewportCenter(center_y) => self.set_viewport_center(center_y),
            InputEvent::Refresh => self.refresh(),
            InputEvent::ScrollSettled => self.scroll_settled(),
        }
    }

    pub fn on_scroll(&mut self, sample: ScrollSample) -> Update {
        let mut effects = Effects::new();
        self.last_sample = sample;
        let outcomes = self.pull.on_scroll(sample);
        self.apply_pull_outcomes(outcomes, &mut effects);
        self.publish(effects)
    }

    pub fn on_drag_changed(&mut self, translation_y: f32) -> Update {
        let mut effects = Effects::new();
        let outcomes = self.pull.on_drag_changed(translation_y);
        self.apply_pull_outcomes(outcomes, &mut effects);
        self.publish(effects)
    }

    pub fn on_drag_ended(&mut self) -> Update {
        let mut effects = Effects::new();
        let outcomes = self.pull.on_drag_ended();
        self.apply_pull_outcomes(outcomes, &mut effects);
        self.publish(effects)
    }

    /// Apply a full layout pass of every on-screen card
    pub fn report_layout(&mut self, reports: &[CardPositionReport]) -> Update {
        let mut effects = Effects::new();
        if self.resolver.apply_layout(reports, self.items.len()) {
            self.resolve(&mut effects);
        }
        self.publish(effects)
    }

    /// Apply a single card's report without touching the others
    ///
    /// For hosts that observe cards individually instead of in layout
    /// passes; nothing is forgotten.
    pub fn report_position(&mut self, report: CardPositionReport) -> Update {
        let mut effects = Effects::new();
        if self.resolver.report(report, self.items.len()) {
            self.resolve(&mut effects);
        }
        self.publish(effects)
    }

    /// Forget a card that scrolled out of the rendered range
    pub fn card_hidden(&mut self, index: usize) -> Update {
        let mut effects = Effects::new();
        if self.resolver.forget(index) {
            self.resolve(&mut effects);
        }
        self.publish(effects)
    }

    /// Update the host-supplied viewport center
    pub fn set_viewport_center(&mut self, center_y: f32) -> Update {
        let mut effects = Effects::new();
        if self.resolver.set_viewport_center(center_y) {
            self.resolve(&mut effects);
        }
        self.publish(effects)
    }

    /// Replace the feed's content
    ///
    /// Reports for indices past the new end are dropped. The active index is
    /// clamped into range, or left alone while the feed is empty.
    pub fn set_items(&mut self, items: Vec<ContentItem>) -> Update {
        let mut effects = Effects::new();
        self.items = items;
        let count = self.items.len();
        self.resolver.retain_below(count);
        if count > 0 && self.active_index >= count {
            self.change_active(count - 1, &mut effects);
        }
        self.resolve(&mut effects);
        self.publish(effects)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Ask the host to scroll `item_id` to the top
    ///
    /// The active index moves to the first card immediately, before the
    /// host confirms the scroll. Resolution is held until the scroll settles
    /// (or the input re-enable delay passes) so mid-animation layout passes
    /// do not pull the index back. The pull state is not touched.
    pub fn scroll_to_top(&mut self, item_id: &ItemId) -> Update {
        let mut effects = Effects::new();
        self.scroll_to_top_into(item_id.clone(), &mut effects);
        self.publish(effects)
    }

    /// External refresh trigger: scroll to the first card and mark the feed
    /// refreshing until the refresh delay passes
    pub fn refresh(&mut self) -> Update {
        let mut effects = Effects::new();
        self.refreshing = true;
        self.refresh_generation += 1;
        tracing::debug!("refresh #{} started", self.refresh_generation);
        effects.push(Effect::RefreshStarted);

        if let Some(first) = self.items.first().map(|item| item.id.clone()) {
            self.scroll_to_top_into(first, &mut effects);
        }
        self.timers.schedule(
            self.config.timing.refresh_delay,
            Scheduled::RefreshFinished {
                generation: self.refresh_generation,
            },
        );
        self.publish(effects)
    }

    /// Host confirmation that a programmatic scroll finished
    pub fn scroll_settled(&mut self) -> Update {
        let mut effects = Effects::new();
        if let Some(timer) = self.hold_timer.take() {
            self.timers.cancel(timer);
        }
        if self.resolver.is_held() {
            self.resolver.release();
            self.resolve(&mut effects);
        }
        self.publish(effects)
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) -> Update {
        self.search.set_query(text);
        self.publish(Effects::new())
    }

    /// Hand `query` to the search collaborator and close the overlay
    pub fn submit_search(&mut self, query: impl Into<String>) -> Update {
        let outcome = self.search.submit(query);
        self.finish_search(outcome)
    }

    /// Submit whatever the live session's query text currently holds
    pub fn submit_current_search(&mut self) -> Update {
        let outcome = self.search.submit_current();
        self.finish_search(outcome)
    }

    /// Close the overlay without searching
    pub fn cancel_search(&mut self) -> Update {
        let mut effects = Effects::new();
        if let Some(outcome) = self.search.cancel() {
            self.close_overlay(outcome, &mut effects);
        }
        self.publish(effects)
    }

    /// Advance animations and fire due timers
    pub fn tick(&mut self, dt: f32) -> Update {
        let mut effects = Effects::new();
        self.pull.tick(dt);
        for timer in self.timers.advance(dt) {
            self.fire(timer, &mut effects);
        }
        self.publish(effects)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn scroll_to_top_into(&mut self, item_id: ItemId, effects: &mut Effects) {
        if !self.items.is_empty() {
            self.change_active(0, effects);
        }
        effects.push(Effect::ScrollToItem(item_id));

        self.resolver.hold();
        self.hold_generation += 1;
        if let Some(timer) = self.hold_timer.take() {
            self.timers.cancel(timer);
        }
        self.hold_timer = Some(self.timers.schedule(
            self.config.timing.input_reenable_delay,
            Scheduled::ResolverResumed {
                generation: self.hold_generation,
            },
        ));
    }

    fn finish_search(&mut self, outcome: Option<SearchOutcome>) -> Update {
        let mut effects = Effects::new();
        if let Some(outcome) = outcome {
            if let SearchOutcome::Committed(query) = &outcome {
                effects.push(Effect::Search(query.clone()));
            }
            self.close_overlay(outcome, &mut effects);
        }
        self.publish(effects)
    }

    fn close_overlay(&mut self, outcome: SearchOutcome, effects: &mut Effects) {
        effects.push(Effect::SearchClosed(outcome));
        let outcomes = self.pull.dismiss();
        self.apply_pull_outcomes(outcomes, effects);
    }

    fn fire(&mut self, timer: Scheduled, effects: &mut Effects) {
        match timer {
            Scheduled::RefreshFinished { generation } => {
                if self.refreshing && generation == self.refresh_generation {
                    tracing::debug!("refresh #{} finished", generation);
                    self.refreshing = false;
                    effects.push(Effect::RefreshFinished);
                } else {
                    tracing::trace!("stale refresh timer #{}", generation);
                }
            }
            Scheduled::InputReenabled { generation } => {
                if generation == self.input_generation && !self.pull.input_enabled() {
                    let outcomes = self.pull.set_input_enabled(true);
                    self.apply_pull_outcomes(outcomes, effects);
                }
            }
            Scheduled::ResolverResumed { generation } => {
                if generation == self.hold_generation && self.resolver.is_held() {
                    self.hold_timer = None;
                    self.resolver.release();
                    self.resolve(effects);
                }
            }
            Scheduled::HapticReset { generation } => {
                self.haptics.reset(generation);
            }
        }
    }

    fn apply_pull_outcomes(&mut self, outcomes: PullOutcomes, effects: &mut Effects) {
        for outcome in outcomes {
            match outcome {
                PullOutcome::Started | PullOutcome::Reset => {}
                PullOutcome::Armed => {
                    if let Some(impact) = self.config.haptics.arm_impact {
                        self.play_haptic(impact, false, effects);
                    }
                }
                PullOutcome::Activated => {
                    self.play_haptic(self.config.haptics.activation_impact, true, effects);
                    if self.search.open() {
                        effects.push(Effect::FocusSearchInput);
                    }
                }
                PullOutcome::Dismissed => {
                    // The closing overlay must not re-trigger a pull
                    self.pull.set_input_enabled(false);
                    self.input_generation += 1;
                    self.timers.schedule(
                        self.config.timing.input_reenable_delay,
                        Scheduled::InputReenabled {
                            generation: self.input_generation,
                        },
                    );
                }
            }
        }
    }

    /// Activation impacts are `required` and ignore the cooldown
    fn play_haptic(&mut self, impact: Impact, required: bool, effects: &mut Effects) {
        let played = if required {
            self.haptics.fire_required(impact)
        } else {
            self.haptics.fire(impact)
        };
        if let Some(generation) = played {
            effects.push(Effect::Haptic(impact));
            self.timers.schedule(
                self.config.timing.haptic_reset,
                Scheduled::HapticReset { generation },
            );
        }
    }

    fn resolve(&mut self, effects: &mut Effects) {
        if self.items.is_empty() {
            return;
        }
        if let Some(transition) = self.resolver.resolve(self.active_index) {
            self.change_active(transition.to, effects);
        }
    }

    fn change_active(&mut self, to: usize, effects: &mut Effects) {
        let to = to.min(self.items.len().saturating_sub(1));
        if to == self.active_index {
            return;
        }
        tracing::debug!("active card {} -> {}", self.active_index, to);
        effects.push(Effect::ActiveIndexChanged {
            from: self.active_index,
            to,
        });
        self.active_index = to;
    }

    fn build_snapshot(&self) -> ViewportState {
        let pull_state = self.pull.state();
        ViewportState {
            active_index: self.active_index,
            item_count: self.items.len(),
            header: self.header.frame(self.last_sample.offset_from_top),
            pull_state,
            pull_indicator_distance: self.pull.indicator_distance(),
            pull_indicator_activated: pull_state.is_activated(),
            search_query: self.search.session().map(|s| s.query().to_string()),
            is_refreshing: self.refreshing,
        }
    }

    fn publish(&mut self, effects: Effects) -> Update {
        let state = self.build_snapshot();
        if state != self.snapshot {
            self.snapshot = state.clone();
            self.observers.notify(&self.snapshot);
        }
        Update { state, effects }
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::build(ViewportConfig::default())
    }
}
