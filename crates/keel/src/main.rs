mod cli;
mod heartbeat;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use keel_core::component::ComponentRegistry;
use keel_core::components::{ConfigComponent, LoggingComponent};
use keel_core::config::{AppSettings, ConfigData};
use keel_core::planner::build_plan;
use keel_core::{Application, Component};

use cli::{CliArgs, Commands};
use heartbeat::HeartbeatComponent;

/// The component set this binary ships. Embedders of keel-core assemble
/// their own.
fn components() -> Vec<Arc<dyn Component>> {
    vec![
        Arc::new(LoggingComponent::new()),
        Arc::new(ConfigComponent::new()),
        Arc::new(HeartbeatComponent::new(Duration::from_secs(10))),
    ]
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = CliArgs::parse();
    let command = args.command.take().unwrap_or(Commands::Run);
    let result = match command {
        Commands::Run => run(&args).await,
        Commands::Plan => plan(),
        Commands::CheckConfig => check_config(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &CliArgs) -> Result<(), String> {
    let mut app = Application::new("keel", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        app.with_config_path(path).map_err(|e| e.to_string())?;
    }
    if let Some(timeout) = args.shutdown_timeout {
        app.with_shutdown_timeout(timeout);
    }
    for component in components() {
        app.with_component(component).map_err(|e| e.to_string())?;
    }
    app.run().await.map_err(|e| e.to_string())
}

fn plan() -> Result<(), String> {
    let mut registry = ComponentRegistry::new();
    for component in components() {
        let deps = component.dependencies();
        registry.add(component, deps).map_err(|e| e.to_string())?;
    }
    let plan = build_plan(&registry).map_err(|e| e.to_string())?;

    println!("initialization order:");
    for name in plan.init_order() {
        let category = registry
            .get(name)
            .map(|c| c.category().to_string())
            .unwrap_or_default();
        println!("  {:<16} [{}]", name, category);
    }
    println!("shutdown order is the reverse.");
    Ok(())
}

fn check_config(args: &CliArgs) -> Result<(), String> {
    let path = args
        .config
        .as_ref()
        .ok_or_else(|| "check-config requires --config <path>".to_string())?;
    let data = ConfigData::load(path).map_err(|e| e.to_string())?;
    let settings = AppSettings::from_config(&data).map_err(|e| e.to_string())?;

    println!("{} is valid", path.display());
    if let Some(name) = &settings.name {
        println!("  app.name:             {}", name);
    }
    if let Some(version) = &settings.version {
        println!("  app.version:          {}", version);
    }
    println!("  app.env:              {}", settings.env);
    if let Some(timeout) = settings.shutdown_timeout {
        println!("  app.shutdown_timeout: {:?}", timeout);
    }
    Ok(())
}
