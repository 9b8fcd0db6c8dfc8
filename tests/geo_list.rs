use geolist::api::{self, ApiCompletion, ApiRequest, GeoApi, Registration};
use geolist::config::RemovalPolicy;
use geolist::core::geo::{GeoId, NewEntry};
use geolist::core::suggestions::SuggestionList;
use geolist::error::ApiError;
use geolist::runtime::effect::Effect;
use geolist::ui::style::Color;
use geolist::widgets::{GeoListOptions, GeoListWidget};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers requests from queued outcomes and records what it was asked.
#[derive(Default)]
struct ScriptedApi {
    registrations: Mutex<VecDeque<Result<String, ApiError>>>,
    drops: Mutex<VecDeque<Result<(), ApiError>>>,
    counties: Mutex<VecDeque<Result<Vec<String>, ApiError>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedApi {
    fn register_with(&self, outcome: Result<&str, ApiError>) {
        lock(&self.registrations).push_back(outcome.map(str::to_string));
    }

    fn drop_with(&self, outcome: Result<(), ApiError>) {
        lock(&self.drops).push_back(outcome);
    }

    fn counties_with(&self, counties: &[&str]) {
        lock(&self.counties).push_back(Ok(counties.iter().map(|c| c.to_string()).collect()));
    }

    fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.log).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("scripted api lock")
}

fn unscripted() -> ApiError {
    ApiError::Transport("no scripted reply".to_string())
}

impl GeoApi for ScriptedApi {
    fn register(&self, entry: &NewEntry) -> Result<Registration, ApiError> {
        lock(&self.log).push(ApiRequest::Register(entry.clone()));
        let markup = lock(&self.registrations).pop_front().unwrap_or(Err(unscripted()))?;
        Ok(Registration::from_fragment(entry.id, markup))
    }

    fn drop_geo(&self, id: GeoId) -> Result<(), ApiError> {
        lock(&self.log).push(ApiRequest::Drop { id });
        lock(&self.drops).pop_front().unwrap_or(Err(unscripted()))
    }

    fn counties(&self, state: &str) -> Result<Vec<String>, ApiError> {
        lock(&self.log).push(ApiRequest::Counties {
            state: state.to_string(),
        });
        lock(&self.counties).pop_front().unwrap_or(Err(unscripted()))
    }
}

fn widget(policy: RemovalPolicy) -> GeoListWidget {
    GeoListWidget::new(GeoListOptions {
        known_states: SuggestionList::us_states(),
        removal_policy: policy,
        highlight: Color::Yellow,
    })
}

fn requests(effects: &[Effect]) -> Vec<ApiRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Request(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

/// Runs every request in `effects` against `api`, feeding completions back.
fn settle(widget: &mut GeoListWidget, api: &ScriptedApi, effects: Vec<Effect>) {
    let mut queue: VecDeque<ApiRequest> = requests(&effects).into();
    while let Some(request) = queue.pop_front() {
        let completion = api::execute(api, request);
        queue.extend(requests(&widget.apply_completion(completion)));
    }
}

fn id(raw: u64) -> GeoId {
    GeoId::new(raw).expect("positive id")
}

fn add(widget: &mut GeoListWidget, api: &ScriptedApi, state: &str, fragment: &str) {
    widget.set_state_value(state);
    api.register_with(Ok(fragment));
    let effects = widget.submit();
    settle(widget, api, effects);
}

#[test]
fn unknown_state_keeps_county_disabled_without_fetching() {
    let mut widget = widget(RemovalPolicy::default());
    let effects = widget.set_state_value("new york");
    assert!(requests(&effects).is_empty());
    assert!(!widget.county_field().is_enabled());
    assert_eq!(widget.county_field().value(), "");
}

#[test]
fn known_state_fetches_counties_exactly_once() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());

    api.counties_with(&["Albany County", "Bronx County"]);
    let effects = widget.set_state_value("New York");
    assert_eq!(
        requests(&effects),
        [ApiRequest::Counties {
            state: "New York".to_string()
        }]
    );
    settle(&mut widget, &api, effects);
    assert!(widget.county_field().is_enabled());
    assert_eq!(widget.county_field().suggestions().items().len(), 2);

    assert!(requests(&widget.set_state_value("New York")).is_empty());
    assert_eq!(api.requests().len(), 1);
}

#[test]
fn stale_county_list_is_discarded() {
    let mut widget = widget(RemovalPolicy::default());
    widget.set_state_value("Ohio");
    widget.set_state_value("Iowa");

    let stale = ApiCompletion::new(
        ApiRequest::Counties {
            state: "Ohio".to_string(),
        },
        Ok(api::ApiReply::Counties(vec!["Adams County".to_string()])),
    );
    assert!(widget.apply_completion(stale).is_empty());
    assert!(widget.county_field().suggestions().is_empty());
}

#[test]
fn failed_county_fetch_is_retried_on_next_edit() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    let effects = widget.set_state_value("Ohio");
    settle(&mut widget, &api, effects);
    assert!(widget.county_field().is_enabled());
    assert!(widget.alert().is_none());

    let retry = widget.set_state_value("Ohio");
    assert_eq!(requests(&retry).len(), 1);
}

#[test]
fn successful_registration_appends_one_entry_and_clears_form() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());

    api.counties_with(&["Kent County"]);
    let effects = widget.set_state_value("Delaware");
    settle(&mut widget, &api, effects);
    widget.set_county_value("Kent County");

    api.register_with(Ok(
        r##"<li id="1">Kent County, Delaware <a href="#">remove</a></li>"##,
    ));
    let effects = widget.submit();
    match requests(&effects).as_slice() {
        [ApiRequest::Register(entry)] => {
            assert_eq!(entry.id, id(1));
            assert_eq!(entry.county.as_deref(), Some("Kent County"));
        }
        other => panic!("unexpected requests: {other:?}"),
    }
    settle(&mut widget, &api, effects);

    let entries: Vec<_> = widget.store().list().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Kent County, Delaware");
    assert_eq!(widget.state_field().value(), "");
    assert_eq!(widget.county_field().value(), "");
    assert!(!widget.county_field().is_enabled());
}

#[test]
fn failed_registration_alerts_with_server_text() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    widget.set_state_value("Texas");
    api.register_with(Err(ApiError::Rejected {
        status: 400,
        body: "Texas is already selected".to_string(),
    }));
    let effects = widget.submit();
    settle(&mut widget, &api, effects);

    assert_eq!(widget.store().len(), 0);
    assert_eq!(widget.alert(), Some("Error: Texas is already selected"));
    assert_eq!(widget.state_field().value(), "Texas");
    assert!(!widget.is_registering());
}

#[test]
fn next_id_counts_hidden_entries() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);
    add(&mut widget, &api, "Utah", r#"<li id="2">Utah</li>"#);

    api.drop_with(Ok(()));
    let effects = widget.remove(id(2));
    settle(&mut widget, &api, effects);
    assert_eq!(widget.store().all().count(), 2);

    widget.set_state_value("Iowa");
    match requests(&widget.submit()).as_slice() {
        [ApiRequest::Register(entry)] => assert_eq!(entry.id, id(3)),
        other => panic!("unexpected requests: {other:?}"),
    }
}

#[test]
fn reissued_id_of_a_dropped_entry_is_appended() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);
    add(&mut widget, &api, "Iowa", r#"<li id="2">Iowa</li>"#);

    api.drop_with(Ok(()));
    let effects = widget.remove(id(1));
    settle(&mut widget, &api, effects);

    add(&mut widget, &api, "Utah", r#"<li id="1">Utah</li>"#);

    assert_eq!(widget.alert(), None);
    let labels: Vec<&str> = widget
        .store()
        .list()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(labels, ["Iowa", "Utah"]);
    assert_eq!(widget.store().len(), 2);
    assert_eq!(widget.state_field().value(), "");
}

#[test]
fn reissued_id_of_a_visible_entry_alerts() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);
    add(&mut widget, &api, "Utah", r#"<li id="1">Utah</li>"#);

    assert_eq!(widget.alert(), Some("Error: entry 1 already exists"));
    assert_eq!(widget.store().visible_len(), 1);
}

#[test]
fn server_issued_id_is_kept() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    add(&mut widget, &api, "Ohio", r#"<li id="42">Ohio</li>"#);
    assert!(widget.store().get(id(42)).is_some());
    assert_eq!(widget.store().next_id(), id(43));
}

#[test]
fn removal_hides_immediately_and_stays_hidden_on_failure() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::FireAndForget);
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);

    let effects = widget.remove(id(1));
    assert_eq!(requests(&effects), [ApiRequest::Drop { id: id(1) }]);
    assert_eq!(widget.store().visible_len(), 0);

    settle(&mut widget, &api, effects);
    assert_eq!(widget.store().visible_len(), 0);
    assert_eq!(widget.store().len(), 1);
    assert!(widget.alert().is_none());
}

#[test]
fn rollback_policy_restores_entry_when_removal_fails() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::Rollback);
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);

    api.drop_with(Err(ApiError::Rejected {
        status: 500,
        body: "database is locked".to_string(),
    }));
    let effects = widget.remove(id(1));
    settle(&mut widget, &api, effects);
    assert_eq!(widget.store().visible_len(), 1);
}

#[test]
fn removing_a_hidden_entry_twice_sends_one_request() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);
    assert_eq!(requests(&widget.remove(id(1))).len(), 1);
    assert!(widget.remove(id(1)).is_empty());
}

#[test]
fn hover_sets_and_clears_highlight() {
    let api = ScriptedApi::default();
    let mut widget = widget(RemovalPolicy::default());
    add(&mut widget, &api, "Ohio", r#"<li id="1">Ohio</li>"#);

    assert_eq!(widget.link_style(id(1)).background, None);
    assert!(widget.hover_enter(id(1)));
    assert_eq!(widget.link_style(id(1)).background, Some(Color::Yellow));
    assert!(widget.hover_leave(id(1)));
    assert_eq!(widget.link_style(id(1)).background, None);
    assert!(!widget.hover_leave(id(1)));
}
