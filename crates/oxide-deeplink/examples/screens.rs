//! Screen Navigation - Deep-Link Example
//!
//! This example wires a small app together the way a navigation layer would:
//! - Screens declare their deep links with `#[derive(Route)]`
//! - The route table is built once at startup
//! - A launcher maps handler ids to screen constructors
//!
//! Run with: cargo run --example screens

use std::collections::HashMap;

use oxide_deeplink::{Dispatcher, Launcher, ParameterSet, Routable, Route, RouteMatch, route_table};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

// =============================================================================
// SCREENS
// =============================================================================

trait Screen {
    fn render(&self) -> String;
}

/// Entry screen with a button that opens the second screen.
#[derive(Route)]
#[route("demo://main_activity")]
struct MainActivity;

impl Screen for MainActivity {
    fn render(&self) -> String {
        "[ Start ]".to_string()
    }
}

/// Shows the `name` passed in the deep link.
#[derive(Route)]
#[route("demo://second_activity")]
struct SecondActivity {
    name: String,
}

impl Screen for SecondActivity {
    fn render(&self) -> String {
        format!("Hello, {}", self.name)
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

type Factory = fn(&ParameterSet) -> anyhow::Result<Box<dyn Screen>>;

struct Navigator {
    factories: HashMap<&'static str, Factory>,
    stack: Vec<Box<dyn Screen>>,
}

impl Navigator {
    fn new() -> Self {
        let mut factories: HashMap<&'static str, Factory> = HashMap::new();
        factories.insert(MainActivity::HANDLER_ID, open_main);
        factories.insert(SecondActivity::HANDLER_ID, open_second);
        Self {
            factories,
            stack: Vec::new(),
        }
    }
}

fn open_main(_params: &ParameterSet) -> anyhow::Result<Box<dyn Screen>> {
    Ok(Box::new(MainActivity))
}

fn open_second(params: &ParameterSet) -> anyhow::Result<Box<dyn Screen>> {
    Ok(Box::new(SecondActivity {
        name: params.require("name")?.to_string(),
    }))
}

impl Launcher for Navigator {
    type Error = anyhow::Error;

    fn launch(&mut self, target: &RouteMatch<'_>) -> anyhow::Result<()> {
        let factory = self
            .factories
            .get(target.handler().as_str())
            .ok_or_else(|| anyhow::anyhow!("no screen registered for {}", target.handler()))?;
        let screen = factory(target.params())?;
        info!(handler = %target.handler(), rendered = %screen.render(), "Opened screen");
        self.stack.push(screen);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dispatcher = Dispatcher::new(route_table![MainActivity, SecondActivity]?);
    let mut navigator = Navigator::new();

    for url in [
        "demo://main_activity",
        "demo://second_activity?name=xingping",
        "demo://unknown_activity",
        "second_activity",
    ] {
        let opened = dispatcher.open(url, &mut navigator)?;
        info!(url, opened, "Dispatched");
    }

    info!(depth = navigator.stack.len(), "Navigation finished");
    Ok(())
}
