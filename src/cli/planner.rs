//! Planner commands: list and create.

use crate::error::Result;
use crate::model::ViewType;
use crate::output::{emit_success, HumanOutput};

use super::Context;

pub async fn list(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let planners = client.planners().await?;

    let mut human = HumanOutput::new(format!("{} planner(s)", planners.len()));
    for planner in &planners {
        human.push_detail(format!(
            "#{} {} ({})",
            planner.id, planner.name, planner.view_type
        ));
    }
    if planners.is_empty() {
        human.push_next_step("daisy planner new <name> --view daily");
    }

    emit_success(ctx.options, "planner ls", &planners, Some(&human))
}

pub async fn create(ctx: &Context, name: &str, view: &str) -> Result<()> {
    let view_type: ViewType = view.parse()?;
    let client = ctx.client()?;
    let planner = client.create_planner(name, view_type).await?;

    let mut human = HumanOutput::new(format!("Created planner {}", planner.name));
    human.push_summary("id", planner.id.to_string());
    human.push_summary("view", planner.view_type.to_string());
    human.push_next_step(format!("daisy task add {} \"...\"", planner.name));

    emit_success(ctx.options, "planner new", &planner, Some(&human))
}
