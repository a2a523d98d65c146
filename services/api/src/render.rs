use crate::infra::{dispatcher, fresh_model};
use clap::Args;
use consent_form::config::AppConfig;
use consent_form::error::AppError;
use consent_form::workflows::consent::engine::load_json;
use consent_form::workflows::consent::{
    render_form, render_page, Activity, ConsentDispatcher, ConsentEffect, ConsentEvent,
    ConsentModel, GenerateStandardsRequest,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct RenderArgs {
    /// Activity to select before rendering
    #[arg(long)]
    pub(crate) activity: Option<String>,
    /// Property selection payload (JSON) as sent by the map integration
    #[arg(long)]
    pub(crate) property: Option<PathBuf>,
    /// Standards list (JSON) as returned by the rules engine
    #[arg(long)]
    pub(crate) standards: Option<PathBuf>,
    /// Print the full HTML page instead of the form fragment
    #[arg(long)]
    pub(crate) page: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RequestArgs {
    /// Activity to request standards for
    #[arg(long)]
    pub(crate) activity: Option<String>,
    /// Property selection payload (JSON) as sent by the map integration
    #[arg(long)]
    pub(crate) property: Option<PathBuf>,
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        activity,
        property,
        standards,
        page,
    } = args;

    let config = AppConfig::load()?;
    let dispatcher = dispatcher(&config.consent);
    let mut model = fresh_model(&config.consent);

    let mut events = selection_events(activity, property)?;
    if let Some(path) = standards {
        events.push(ConsentEvent::ReceiveStandards(load_json(path)?));
    }
    replay(&dispatcher, &mut model, events);

    let markup = if page {
        render_page(&model)
    } else {
        render_form(&model)
    };
    println!("{}", markup.into_string());
    Ok(())
}

pub(crate) fn run_request(args: RequestArgs) -> Result<(), AppError> {
    let RequestArgs { activity, property } = args;

    let config = AppConfig::load()?;
    let dispatcher = dispatcher(&config.consent);
    let mut model = fresh_model(&config.consent);

    replay(&dispatcher, &mut model, selection_events(activity, property)?);

    match generate(&dispatcher, &mut model) {
        Some(request) => match serde_json::to_string_pretty(&request) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Request payload unavailable: {}", err),
        },
        None => {
            for message in model.errors.messages() {
                println!("{}", message);
            }
        }
    }

    Ok(())
}

fn selection_events(
    activity: Option<String>,
    property: Option<PathBuf>,
) -> Result<Vec<ConsentEvent>, AppError> {
    let mut events = Vec::new();
    if let Some(activity) = activity {
        events.push(ConsentEvent::SelectActivity(Activity::new(activity)));
    }
    if let Some(path) = property {
        events.push(ConsentEvent::SelectMapProperty(load_json(path)?));
    }
    Ok(events)
}

fn replay(dispatcher: &ConsentDispatcher, model: &mut ConsentModel, events: Vec<ConsentEvent>) {
    for event in events {
        for effect in dispatcher.update(model, event) {
            if let ConsentEffect::Diagnostic(err) = effect {
                eprintln!("warning: {}", err);
            }
        }
    }
}

/// Run the generate step offline, returning the request the rules engine
/// would receive.
fn generate(
    dispatcher: &ConsentDispatcher,
    model: &mut ConsentModel,
) -> Option<GenerateStandardsRequest> {
    dispatcher
        .update(model, ConsentEvent::GenerateStandards)
        .into_iter()
        .find_map(|effect| match effect {
            ConsentEffect::RequestStandards(request) => Some(request),
            _ => None,
        })
}
