//! # Bevy Jalali Picker
//!
//! Jalali (Persian solar Hijri) calendar conversion and a date picker plugin
//! for the Bevy game engine.
//!
//! The conversion core lives in [`calendar`], [`grid`] and [`timestamp`] and
//! is usable without Bevy. The plugin keeps the picker's view state in the
//! [`JalaliDatePicker`] resource and exchanges values with the rest of the app
//! as canonical timestamps (`YYYY-MM-DDTHH:mm:ss.mmm`, local wall time).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_jalali_picker::{JalaliPickerPlugin, TimestampChanged};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(JalaliPickerPlugin::default())
//!         .add_systems(Update, store_publish_date)
//!         .run();
//! }
//!
//! fn store_publish_date(mut changes: MessageReader<TimestampChanged>) {
//!     for change in changes.read() {
//!         println!("publish date is now {}", change.timestamp);
//!     }
//! }
//! ```

pub mod calendar;
pub mod error;
pub mod grid;
pub mod timestamp;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use calendar::{
    gregorian_to_jalali, is_leap_jalali_year, jalali_to_gregorian, month_length, Calendar,
    GregorianCalendar, GregorianDate, JalaliCalendar, JalaliDate, Month,
};
pub use error::CalendarError;
pub use grid::{build_grid, CalendarCell, MonthGrid};
pub use timestamp::{from_timestamp, to_timestamp, TimeOfDay};

use calendar::{MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};

/// Message fired whenever the user edits the picked date or time
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct TimestampChanged {
    /// The new value as a canonical timestamp
    pub timestamp: String,
}

/// Message that loads an external value into the picker and opens it
///
/// A missing or unparsable timestamp opens the picker on the current date.
#[derive(Message, Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPickerValue {
    pub timestamp: Option<String>,
}

/// Picker settings, loadable from RON or any other serde format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Earliest year month navigation may reach
    pub min_year: i32,
    /// Latest year month navigation may reach
    pub max_year: i32,
    /// Minutes moved by one press of the minute stepper
    pub minute_step: u32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            min_year: MIN_SUPPORTED_YEAR,
            max_year: MAX_SUPPORTED_YEAR,
            minute_step: 1,
        }
    }
}

/// The main plugin for the Jalali date picker.
///
/// Add this plugin to your Bevy app to get the [`JalaliDatePicker`] resource
/// and its messages.
#[derive(Default)]
pub struct JalaliPickerPlugin {
    pub config: PickerConfig,
}

impl JalaliPickerPlugin {
    pub fn with_config(config: PickerConfig) -> Self {
        Self { config }
    }
}

impl Plugin for JalaliPickerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(JalaliDatePicker::new(self.config.clone()))
            .add_message::<SetPickerValue>()
            .add_message::<TimestampChanged>()
            .add_systems(Update, (apply_external_values, emit_timestamp_changes).chain());
    }
}

/// Resource holding the view state of one picker session.
///
/// The selected date and time are what the picker reports; the visible month
/// only changes what the grid shows. Every edit of the selection queues a
/// [`TimestampChanged`] message.
#[derive(Resource, Debug, Clone)]
pub struct JalaliDatePicker {
    config: PickerConfig,
    selected: JalaliDate,
    time: TimeOfDay,
    grid: MonthGrid,
    open: bool,
    pending: Vec<String>,
}

impl Default for JalaliDatePicker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

impl JalaliDatePicker {
    /// Creates a closed picker showing the current date
    pub fn new(config: PickerConfig) -> Self {
        let min_year = config.min_year.clamp(MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR);
        let max_year = config.max_year.clamp(min_year, MAX_SUPPORTED_YEAR);
        let config = PickerConfig {
            min_year,
            max_year,
            minute_step: config.minute_step.max(1),
        };
        let (selected, time) = timestamp::now();
        Self {
            config,
            selected,
            time,
            grid: build_grid(selected.year, selected.month),
            open: false,
            pending: Vec::new(),
        }
    }

    /// Creates a picker preloaded with a timestamp, falling back to today
    pub fn with_value(mut self, timestamp: Option<&str>) -> Self {
        self.load(timestamp);
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// The selected Jalali date
    pub fn value(&self) -> JalaliDate {
        self.selected
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// The grid of the month currently on screen
    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    /// Visible (year, month)
    pub fn view(&self) -> (i32, u32) {
        (self.grid.year, self.grid.month)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `day` of the visible month is the selected date
    pub fn is_selected(&self, day: u32) -> bool {
        self.selected
            == JalaliDate {
                year: self.grid.year,
                month: self.grid.month,
                day,
            }
    }

    /// The current selection as a canonical timestamp
    pub fn timestamp(&self) -> Result<String, CalendarError> {
        to_timestamp(self.selected, self.time)
    }

    /// Open the picker on an external value.
    ///
    /// The view jumps to the month of the value, clamped into the configured
    /// years. Nothing is emitted.
    pub fn open(&mut self, timestamp: Option<&str>) {
        self.load(timestamp);
        self.open = true;
        debug!(date = %self.selected, time = %self.time, "picker opened");
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Select a day of the visible month.
    pub fn select_day(&mut self, day: u32) -> Result<(), CalendarError> {
        let (year, month) = self.view();
        self.selected = JalaliDate::new(year, month, day)?;
        self.queue_change();
        Ok(())
    }

    /// Show the next month. Returns `false` at the configured upper bound.
    pub fn next_month(&mut self) -> bool {
        let (year, month) = grid::next_month(self.grid.year, self.grid.month);
        self.show(year, month)
    }

    /// Show the previous month. Returns `false` at the configured lower bound.
    pub fn previous_month(&mut self) -> bool {
        let (year, month) = grid::previous_month(self.grid.year, self.grid.month);
        self.show(year, month)
    }

    /// Select today's date and show its month. The time is kept.
    pub fn go_to_today(&mut self) {
        self.selected = timestamp::today();
        self.show_selection();
        self.queue_change();
    }

    pub fn increment_hour(&mut self) {
        self.time.increment_hour();
        self.queue_change();
    }

    pub fn decrement_hour(&mut self) {
        self.time.decrement_hour();
        self.queue_change();
    }

    pub fn increment_minute(&mut self) {
        self.time.step_minutes(self.config.minute_step as i32);
        self.queue_change();
    }

    pub fn decrement_minute(&mut self) {
        self.time.step_minutes(-(self.config.minute_step as i32));
        self.queue_change();
    }

    /// Take the timestamps queued since the last call, oldest first
    pub fn drain_changes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    fn load(&mut self, timestamp: Option<&str>) {
        let (selected, time) = timestamp::from_timestamp_or_today(timestamp);
        self.selected = selected;
        self.time = time;
        self.show_selection();
    }

    /// Show the month of the selection, or the nearest month inside the
    /// configured years when the selection lies outside them.
    fn show_selection(&mut self) {
        let JalaliDate { year, month, .. } = self.selected;
        let (year, month) = if year < self.config.min_year {
            (self.config.min_year, 1)
        } else if year > self.config.max_year {
            (self.config.max_year, 12)
        } else {
            (year, month)
        };
        self.grid = build_grid(year, month);
    }

    fn show(&mut self, year: i32, month: u32) -> bool {
        if !(self.config.min_year..=self.config.max_year).contains(&year) {
            return false;
        }
        self.grid = build_grid(year, month);
        debug!(year, month, "picker month changed");
        true
    }

    fn queue_change(&mut self) {
        match self.timestamp() {
            Ok(timestamp) => self.pending.push(timestamp),
            Err(error) => warn!(%error, "picker selection has no timestamp"),
        }
    }
}

/// System that loads externally supplied values into the picker
fn apply_external_values(
    mut values: MessageReader<SetPickerValue>,
    mut picker: ResMut<JalaliDatePicker>,
) {
    for value in values.read() {
        picker.open(value.timestamp.as_deref());
    }
}

/// System that turns queued picker edits into [`TimestampChanged`] messages
fn emit_timestamp_changes(
    mut picker: ResMut<JalaliDatePicker>,
    mut changes: MessageWriter<TimestampChanged>,
) {
    if !picker.has_changes() {
        return;
    }
    for timestamp in picker.drain_changes() {
        changes.write(TimestampChanged { timestamp });
    }
}

/// Commands extension trait for driving the picker
pub trait PickerCommands {
    /// Open the picker on an external value
    ///
    /// # Examples
    /// ```no_run
    /// # use bevy::prelude::*;
    /// # use bevy_jalali_picker::PickerCommands;
    /// fn edit_post(mut commands: Commands) {
    ///     commands.open_jalali_picker(Some("2024-03-20T08:30:00.000".to_string()));
    /// }
    /// ```
    fn open_jalali_picker(&mut self, timestamp: Option<String>);
}

impl PickerCommands for Commands<'_, '_> {
    fn open_jalali_picker(&mut self, timestamp: Option<String>) {
        self.queue(move |world: &mut World| {
            world
                .resource_mut::<JalaliDatePicker>()
                .open(timestamp.as_deref());
        });
    }
}
