//! The geo list widget: a state/county form, the list of selected entries
//! and the glue between them and the geo endpoints.
//!
//! The widget never performs I/O. Operations return [`Effect`]s; network
//! outcomes come back through [`GeoListWidget::apply_completion`]. The screen
//! is drawn from the [`GeoStore`] alone.

use crate::api::{ApiCompletion, ApiReply, ApiRequest, Registration};
use crate::config::{HOVER_HIGHLIGHT, RemovalPolicy};
use crate::core::geo::{GeoEntry, GeoId, NewEntry};
use crate::core::store::GeoStore;
use crate::core::suggestions::SuggestionList;
use crate::error::ApiError;
use crate::runtime::effect::Effect;
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseKind};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::text_field::{FieldEdit, TextField};
use crate::widgets::traits::{DrawOutput, Drawable, Interactive};

const STATE_ROW: usize = 1;
const COUNTY_ROW: usize = 2;
const FIRST_ENTRY_ROW: usize = 5;
const LABEL_WIDTH: usize = 6;
const REMOVE_LINK: &str = "[remove]";
const MENU_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    State,
    County,
    Entry(GeoId),
}

#[derive(Debug, Clone)]
pub struct GeoListOptions {
    pub known_states: SuggestionList,
    pub removal_policy: RemovalPolicy,
    pub highlight: Color,
}

impl Default for GeoListOptions {
    fn default() -> Self {
        Self {
            known_states: SuggestionList::us_states(),
            removal_policy: RemovalPolicy::default(),
            highlight: HOVER_HIGHLIGHT,
        }
    }
}

/// Screen position of an entry's removal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkArea {
    pub id: GeoId,
    pub row: u16,
    pub start_col: u16,
    pub end_col: u16,
}

impl LinkArea {
    fn contains(&self, col: u16, row: u16) -> bool {
        row == self.row && (self.start_col..self.end_col).contains(&col)
    }
}

pub struct GeoListWidget {
    state: TextField,
    county: TextField,
    known_states: SuggestionList,
    store: GeoStore,
    /// State whose county list is loaded or in flight.
    counties_for: Option<String>,
    pending_registration: Option<GeoId>,
    focus: Focus,
    hovered: Option<GeoId>,
    alert: Option<String>,
    removal_policy: RemovalPolicy,
    highlight: Color,
}

impl GeoListWidget {
    pub fn new(options: GeoListOptions) -> Self {
        Self {
            state: TextField::new("state", "State")
                .with_placeholder("start typing a state")
                .with_suggestions(options.known_states.clone()),
            county: TextField::new("county", "County").with_enabled(false),
            known_states: options.known_states,
            store: GeoStore::new(),
            counties_for: None,
            pending_registration: None,
            focus: Focus::State,
            hovered: None,
            alert: None,
            removal_policy: options.removal_policy,
            highlight: options.highlight,
        }
    }

    pub fn store(&self) -> &GeoStore {
        &self.store
    }

    pub fn state_field(&self) -> &TextField {
        &self.state
    }

    pub fn county_field(&self) -> &TextField {
        &self.county
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn hovered(&self) -> Option<GeoId> {
        self.hovered
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_registering(&self) -> bool {
        self.pending_registration.is_some()
    }

    // -- form ---------------------------------------------------------------

    pub fn set_state_value(&mut self, value: impl Into<String>) -> Vec<Effect> {
        self.state.set_value(value);
        self.autocomplete_state()
    }

    pub fn set_county_value(&mut self, value: impl Into<String>) -> Vec<Effect> {
        if !self.county.is_enabled() {
            return Vec::new();
        }
        self.county.set_value(value);
        vec![Effect::RequestRender]
    }

    /// Gates the county field on the state field holding a known state, and
    /// fetches that state's counties once.
    pub fn autocomplete_state(&mut self) -> Vec<Effect> {
        let value = self.state.value().to_string();

        if !self.known_states.contains(&value) {
            self.county.set_enabled(false);
            self.county.clear();
            self.county.set_suggestions(SuggestionList::default());
            self.counties_for = None;
            if self.focus == Focus::County {
                self.focus = Focus::State;
            }
            return vec![Effect::RequestRender];
        }

        self.county.set_enabled(true);
        if self.counties_for.as_deref() == Some(value.as_str()) {
            return vec![Effect::RequestRender];
        }

        if self.counties_for.is_some() {
            // Switched straight to another known state.
            self.county.clear();
        }
        self.county.set_suggestions(SuggestionList::default());
        self.counties_for = Some(value.clone());
        tracing::debug!(state = %value, "fetching counties");
        vec![
            Effect::Request(ApiRequest::Counties { state: value }),
            Effect::RequestRender,
        ]
    }

    /// Completes the focused field from its suggestions.
    pub fn accept_completion(&mut self) -> Vec<Effect> {
        match self.focus {
            Focus::State if self.state.accept_suggestion() => self.autocomplete_state(),
            Focus::County if self.county.accept_suggestion() => vec![Effect::RequestRender],
            _ => Vec::new(),
        }
    }

    /// Sends a registration for the form's values under the next free id.
    pub fn submit(&mut self) -> Vec<Effect> {
        if let Some(pending) = self.pending_registration {
            tracing::debug!(%pending, "registration already in flight, ignoring submit");
            return Vec::new();
        }

        let id = self.store.next_id();
        let county = self
            .county
            .is_enabled()
            .then(|| self.county.value().to_string());
        let entry = NewEntry::new(self.state.value(), county, id);
        tracing::info!(%id, state = %entry.state, county = ?entry.county, "registering geo");

        self.pending_registration = Some(id);
        vec![
            Effect::Request(ApiRequest::Register(entry)),
            Effect::RequestRender,
        ]
    }

    fn clear_form(&mut self) {
        self.state.clear();
        self.county.clear();
        self.county.set_enabled(false);
        self.county.set_suggestions(SuggestionList::default());
        self.counties_for = None;
        self.focus = Focus::State;
    }

    // -- list ---------------------------------------------------------------

    /// Hides the entry at once and asks the server to drop it.
    pub fn remove(&mut self, id: GeoId) -> Vec<Effect> {
        if !self.store.get(id).is_some_and(GeoEntry::is_visible) {
            return Vec::new();
        }

        if self.focus == Focus::Entry(id) {
            self.focus = self.neighbour_focus(id);
        }
        self.store.hide(id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        tracing::info!(%id, "removing geo");

        vec![
            Effect::Request(ApiRequest::Drop { id }),
            Effect::RequestRender,
        ]
    }

    pub fn hover_enter(&mut self, id: GeoId) -> bool {
        if self.hovered == Some(id) || !self.store.get(id).is_some_and(GeoEntry::is_visible) {
            return false;
        }
        self.hovered = Some(id);
        true
    }

    pub fn hover_leave(&mut self, id: GeoId) -> bool {
        if self.hovered != Some(id) {
            return false;
        }
        self.hovered = None;
        true
    }

    pub fn link_style(&self, id: GeoId) -> Style {
        let style = Style::new().color(Color::Blue).underline();
        if self.hovered == Some(id) {
            style.background(self.highlight)
        } else {
            style
        }
    }

    pub fn dismiss_alert(&mut self) -> Vec<Effect> {
        match self.alert.take() {
            Some(_) => vec![Effect::RequestRender],
            None => Vec::new(),
        }
    }

    // -- completions --------------------------------------------------------

    pub fn apply_completion(&mut self, completion: ApiCompletion) -> Vec<Effect> {
        match (completion.request, completion.outcome) {
            (ApiRequest::Register(entry), Ok(ApiReply::Registered(registration))) => {
                self.registration_confirmed(entry, registration)
            }
            (ApiRequest::Register(entry), Err(err)) => self.registration_failed(&entry, &err),
            (ApiRequest::Drop { id }, Ok(_)) => {
                tracing::debug!(%id, "geo dropped");
                Vec::new()
            }
            (ApiRequest::Drop { id }, Err(err)) => self.removal_failed(id, &err),
            (ApiRequest::Counties { state }, Ok(ApiReply::Counties(counties))) => {
                self.counties_loaded(state, counties)
            }
            (ApiRequest::Counties { state }, Err(err)) => {
                tracing::warn!(%state, error = %err, "county list unavailable");
                if self.counties_for.as_deref() == Some(state.as_str()) {
                    self.counties_for = None;
                }
                Vec::new()
            }
            (request, Ok(reply)) => {
                tracing::warn!(?request, ?reply, "reply does not match request");
                Vec::new()
            }
        }
    }

    fn registration_confirmed(&mut self, entry: NewEntry, registration: Registration) -> Vec<Effect> {
        self.pending_registration = None;
        let id = registration.id;
        let geo = GeoEntry::new(id, entry.state, entry.county)
            .with_markup(registration.markup)
            .with_label(registration.label);

        // The server may hand a dropped id out again; the hidden entry makes way.
        if self.store.get(id).is_some_and(|existing| !existing.is_visible()) {
            tracing::debug!(%id, "replacing hidden entry with reissued id");
            self.store.remove(id);
        }

        if let Err(err) = self.store.add(geo) {
            tracing::warn!(%id, error = %err, "server returned an id that is still listed");
            self.alert = Some(format!("Error: {err}"));
            return vec![Effect::RequestRender];
        }

        tracing::debug!(%id, "geo registered");
        self.clear_form();
        vec![Effect::RequestRender]
    }

    fn registration_failed(&mut self, entry: &NewEntry, err: &ApiError) -> Vec<Effect> {
        self.pending_registration = None;
        tracing::warn!(id = %entry.id, error = %err, "registration failed");
        self.alert = Some(format!("Error: {}", err.response_text()));
        vec![Effect::RequestRender]
    }

    fn removal_failed(&mut self, id: GeoId, err: &ApiError) -> Vec<Effect> {
        match self.removal_policy {
            RemovalPolicy::FireAndForget => {
                tracing::warn!(%id, error = %err, "removal failed, entry stays hidden");
                Vec::new()
            }
            RemovalPolicy::Rollback => {
                tracing::warn!(%id, error = %err, "removal failed, showing entry again");
                if self.store.restore(id) {
                    vec![Effect::RequestRender]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn counties_loaded(&mut self, state: String, counties: Vec<String>) -> Vec<Effect> {
        let current = self.counties_for.as_deref() == Some(state.as_str())
            && self.state.value() == state;
        if !current {
            tracing::debug!(%state, "discarding stale county list");
            return Vec::new();
        }
        tracing::debug!(%state, count = counties.len(), "county list installed");
        self.county.set_suggestions(SuggestionList::new(counties));
        vec![Effect::RequestRender]
    }

    // -- focus --------------------------------------------------------------

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::State];
        if self.county.is_enabled() {
            order.push(Focus::County);
        }
        order.extend(self.store.list().map(|entry| Focus::Entry(entry.id)));
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let len = order.len();
        let current = order.iter().position(|focus| *focus == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.focus = order[next];
    }

    fn neighbour_focus(&self, leaving: GeoId) -> Focus {
        let order = self.focus_order();
        let Some(pos) = order.iter().position(|focus| *focus == Focus::Entry(leaving)) else {
            return Focus::State;
        };
        order
            .get(pos + 1)
            .or_else(|| pos.checked_sub(1).and_then(|prev| order.get(prev)))
            .copied()
            .unwrap_or(Focus::State)
    }

    fn edit_focused(&mut self, key: KeyEvent) -> Vec<Effect> {
        let (edit, is_state) = match self.focus {
            Focus::State => (self.state.handle_key(key), true),
            Focus::County => (self.county.handle_key(key), false),
            Focus::Entry(_) => return Vec::new(),
        };
        match edit {
            FieldEdit::Ignored => Vec::new(),
            FieldEdit::Moved => vec![Effect::RequestRender],
            FieldEdit::Edited if is_state => self.autocomplete_state(),
            FieldEdit::Edited => vec![Effect::RequestRender],
        }
    }

    // -- layout -------------------------------------------------------------

    fn entry_prefix(&self, entry: &GeoEntry) -> String {
        let marker = if self.focus == Focus::Entry(entry.id) { ">" } else { " " };
        format!("  {marker} {}  ", entry.label)
    }

    pub fn link_areas(&self) -> Vec<LinkArea> {
        let link_width = REMOVE_LINK.len() as u16;
        self.store
            .list()
            .enumerate()
            .map(|(idx, entry)| {
                let start_col = Span::new(self.entry_prefix(entry)).width() as u16;
                LinkArea {
                    id: entry.id,
                    row: (FIRST_ENTRY_ROW + idx) as u16,
                    start_col,
                    end_col: start_col.saturating_add(link_width),
                }
            })
            .collect()
    }

    pub fn link_at(&self, col: u16, row: u16) -> Option<GeoId> {
        self.link_areas()
            .into_iter()
            .find(|area| area.contains(col, row))
            .map(|area| area.id)
    }

    fn menu_line(&self) -> SpanLine {
        let field = match self.focus {
            Focus::State => &self.state,
            Focus::County => &self.county,
            Focus::Entry(_) => return Vec::new(),
        };
        if !field.is_enabled() || field.value().trim().is_empty() {
            return Vec::new();
        }
        let matches = field.suggestions().top_matches(field.value(), MENU_SIZE);
        if matches.is_empty() || matches == [field.value()] {
            return Vec::new();
        }
        vec![Span::styled(
            format!("{}{}", " ".repeat(LABEL_WIDTH + 4), matches.join(" · ")),
            Style::new().color(Color::DarkGrey),
        )]
    }
}

impl Drawable for GeoListWidget {
    fn draw(&self) -> DrawOutput {
        let mut lines: Vec<SpanLine> = Vec::new();

        let mut title = vec![Span::styled("Geo list", Style::new().color(Color::Cyan).bold())];
        if self.is_registering() {
            title.push(Span::styled(
                "  registering…",
                Style::new().color(Color::DarkGrey),
            ));
        }
        lines.push(title);
        lines.push(self.state.draw(self.focus == Focus::State, LABEL_WIDTH));
        lines.push(self.county.draw(self.focus == Focus::County, LABEL_WIDTH));
        lines.push(self.menu_line());
        lines.push(vec![Span::styled(
            format!("Selected ({})", self.store.visible_len()),
            Style::new().bold(),
        )]);

        if self.store.visible_len() == 0 {
            lines.push(vec![Span::styled(
                "    (none yet)",
                Style::new().color(Color::DarkGrey),
            )]);
        }
        for entry in self.store.list() {
            let prefix_style = if self.focus == Focus::Entry(entry.id) {
                Style::new().bold()
            } else {
                Style::new()
            };
            lines.push(vec![
                Span::styled(self.entry_prefix(entry), prefix_style),
                Span::styled(REMOVE_LINK, self.link_style(entry.id)),
            ]);
        }

        if let Some(alert) = &self.alert {
            lines.push(Vec::new());
            lines.push(vec![Span::styled(
                format!("! {alert}"),
                Style::new().color(Color::Red).bold(),
            )]);
            lines.push(vec![Span::styled(
                "  Enter to dismiss",
                Style::new().color(Color::DarkGrey),
            )]);
        }

        let cursor = match (&self.alert, self.focus) {
            (None, Focus::State) => Some(field_cursor(&self.state, STATE_ROW)),
            (None, Focus::County) => Some(field_cursor(&self.county, COUNTY_ROW)),
            _ => None,
        };

        DrawOutput { lines, cursor }
    }

    fn hint(&self) -> Option<String> {
        let hint = match self.focus {
            Focus::State | Focus::County => "Tab complete/next  Enter add  Esc quit",
            Focus::Entry(_) => "Enter/Del remove  Tab next  Esc quit",
        };
        Some(hint.to_string())
    }
}

fn field_cursor(field: &TextField, row: usize) -> CursorPos {
    CursorPos {
        col: (LABEL_WIDTH + 4 + field.cursor_col()) as u16,
        row: row as u16,
    }
}

impl Interactive for GeoListWidget {
    fn on_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key == KeyEvent::ctrl('c') {
            return vec![Effect::Exit];
        }

        // The alert is modal.
        if self.alert.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => self.dismiss_alert(),
                _ => Vec::new(),
            };
        }

        match (self.focus, key.code) {
            (_, KeyCode::Esc) => vec![Effect::Exit],
            (_, KeyCode::BackTab) | (_, KeyCode::Up) => {
                self.move_focus(false);
                vec![Effect::RequestRender]
            }
            (_, KeyCode::Tab) if !key.modifiers.contains(KeyModifiers::SHIFT) => {
                let effects = self.accept_completion();
                if !effects.is_empty() {
                    return effects;
                }
                self.move_focus(true);
                vec![Effect::RequestRender]
            }
            (_, KeyCode::Tab) => {
                self.move_focus(false);
                vec![Effect::RequestRender]
            }
            (_, KeyCode::Down) => {
                self.move_focus(true);
                vec![Effect::RequestRender]
            }
            (Focus::Entry(id), KeyCode::Enter | KeyCode::Delete) => self.remove(id),
            (Focus::State | Focus::County, KeyCode::Enter) => self.submit(),
            _ => self.edit_focused(key),
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) -> Vec<Effect> {
        if self.alert.is_some() {
            return Vec::new();
        }
        let target = self.link_at(event.col, event.row);

        match event.kind {
            MouseKind::Moved => {
                if self.hovered == target {
                    return Vec::new();
                }
                if let Some(previous) = self.hovered {
                    self.hover_leave(previous);
                }
                if let Some(id) = target {
                    self.hover_enter(id);
                }
                vec![Effect::RequestRender]
            }
            MouseKind::LeftDown => match target {
                Some(id) => self.remove(id),
                None if event.row as usize == STATE_ROW => {
                    self.focus = Focus::State;
                    vec![Effect::RequestRender]
                }
                None if event.row as usize == COUNTY_ROW && self.county.is_enabled() => {
                    self.focus = Focus::County;
                    vec![Effect::RequestRender]
                }
                None => Vec::new(),
            },
        }
    }
}
