use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => match state.start() {
            Some(request) => vec![Effect::FetchJobs(request)],
            None => Vec::new(),
        },
        Msg::KeywordInput(raw) => {
            let ticket = state.set_raw_keyword(raw);
            vec![Effect::ScheduleDebounce(ticket)]
        }
        Msg::DebounceElapsed { ticket } => match state.fire_debounce(ticket) {
            Some(keyword) => state.apply_keyword(&keyword, false),
            None => Vec::new(),
        },
        Msg::ExplicitSearch => {
            let mut effects = Vec::new();
            if state.cancel_debounce() {
                effects.push(Effect::CancelDebounce);
            }
            let keyword = state.raw_keyword().to_string();
            effects.extend(state.apply_keyword(&keyword, true));
            effects
        }
        Msg::CategorySelected(category) => {
            // Local-only: a category change never re-queries the service.
            state.set_category(&category);
            Vec::new()
        }
        Msg::IndustrySelected(industry) => {
            state.set_industry(&industry);
            Vec::new()
        }
        Msg::LocationSelected(location) => {
            state.set_location(&location);
            Vec::new()
        }
        Msg::PageSelected(page) => {
            state.select_page(page);
            Vec::new()
        }
        Msg::FetchCompleted { seq, outcome } => {
            state.apply_fetch(seq, outcome);
            Vec::new()
        }
        Msg::Shutdown => state.shutdown(),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
