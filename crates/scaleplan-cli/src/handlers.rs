//! Command handlers.
//!
//! Each mutating command loads the plan into the store, applies one edit and
//! pushes it before printing the result.

use std::{io, path::Path, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use scaleplan_core::{
    analyzer,
    codec::{self, CodecMode},
    display::{Components, MetricReferences, Metrics, OperationStatus, PlanSummaries},
    params::{CreatePlan, PlanItemPatch, RegisterComponent, RegisterMetric},
    repository::{ComponentRegistry, MetricRegistry},
    PlanStateStore, PlanView, ScalingPlanError, SqliteRepository,
};

use crate::{
    cli::{
        AnalyzeArgs, ApplyArgs, ComponentCommands, ExportArgs, GraphArgs, ItemCommands,
        MetricCommands, PlanCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    store: PlanStateStore,
    registry: Arc<SqliteRepository>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        store: PlanStateStore,
        registry: Arc<SqliteRepository>,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            store,
            registry,
            renderer,
        }
    }

    pub async fn handle_plan_command(mut self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::List => self.list_plans().await,
            PlanCommands::Create(args) => self.create_plan(&args.into()).await,
            PlanCommands::Show(args) => self.show_plan(&args.id).await,
            PlanCommands::Graph(args) => self.show_graph(&args).await,
            PlanCommands::Export(args) => self.export_plan(&args).await,
            PlanCommands::Apply(args) => self.apply_plan(&args).await,
            PlanCommands::Delete(args) => self.delete_plan(&args.id).await,
        }
    }

    pub async fn handle_item_command(mut self, command: ItemCommands) -> Result<()> {
        match command {
            ItemCommands::Add(args) => {
                self.load(&args.plan).await?;
                let id = self.store.add_plan_item()?;
                self.push_and_report(format!("Added item {id} to plan {}", args.plan))
                    .await
            }
            ItemCommands::Update(args) => {
                let patch = PlanItemPatch::from(&args);
                if patch.is_empty() {
                    bail!("Nothing to update for item {}", args.item);
                }
                self.load(&args.plan).await?;
                self.store.update_plan_item(&args.item, &patch)?;
                self.push_and_report(format!("Updated item {} of plan {}", args.item, args.plan))
                    .await
            }
            ItemCommands::Remove(args) => {
                self.load(&args.plan).await?;
                self.store.remove_plan_item(&args.item)?;
                self.push_and_report(format!(
                    "Removed item {} from plan {}",
                    args.item, args.plan
                ))
                .await
            }
        }
    }

    pub async fn handle_metric_command(self, command: MetricCommands) -> Result<()> {
        match command {
            MetricCommands::Register(args) => {
                let id = args.id.clone();
                self.registry
                    .register_metric(RegisterMetric::from(args).into())
                    .await?;
                self.renderer
                    .render(&OperationStatus::success(format!("Registered metric {id}")).to_string());
            }
            MetricCommands::List => {
                let metrics = self.registry.list_metrics().await?;
                self.renderer
                    .render(&format!("# Metrics\n\n{}", Metrics(metrics)));
            }
        }
        Ok(())
    }

    pub async fn handle_component_command(self, command: ComponentCommands) -> Result<()> {
        match command {
            ComponentCommands::Register(args) => {
                let id = args.id.clone();
                self.registry
                    .register_component(RegisterComponent::from(args).into())
                    .await?;
                self.renderer.render(
                    &OperationStatus::success(format!("Registered scaling component {id}"))
                        .to_string(),
                );
            }
            ComponentCommands::List => {
                let components = self.registry.list_components().await?;
                self.renderer.render(&format!(
                    "# Scaling Components\n\n{}",
                    Components(components)
                ));
            }
        }
        Ok(())
    }

    pub fn analyze(&self, args: &AnalyzeArgs) -> Result<()> {
        let references = analyzer::analyze(&args.expression);
        if args.json {
            self.renderer.raw(&serde_json::to_string_pretty(&references)?);
        } else {
            self.renderer.render(&format!(
                "# Metric References\n\n{}",
                MetricReferences(references)
            ));
        }
        Ok(())
    }

    pub async fn list_plans(&self) -> Result<()> {
        let summaries = self.store.list_plans().await?;
        self.renderer
            .render(&format!("# Scaling Plans\n\n{}", PlanSummaries(summaries)));
        Ok(())
    }

    async fn create_plan(&mut self, params: &CreatePlan) -> Result<()> {
        self.store.create_plan(params).await?;
        let view = self.store.push().await?;
        self.renderer.render(&format!(
            "{}\n{view}",
            OperationStatus::success(format!("Created plan {}", params.id))
        ));
        Ok(())
    }

    async fn show_plan(&mut self, id: &str) -> Result<()> {
        let view = self.load(id).await?;
        self.renderer.render(&view.to_string());
        Ok(())
    }

    async fn show_graph(&mut self, args: &GraphArgs) -> Result<()> {
        let view = self.load(&args.id).await?;
        if args.json {
            self.renderer
                .raw(&serde_json::to_string_pretty(view.graph.as_ref())?);
        } else {
            self.renderer
                .render(&format!("# Dependencies of {}\n\n{}", args.id, view.graph));
        }
        Ok(())
    }

    async fn export_plan(&mut self, args: &ExportArgs) -> Result<()> {
        let view = self.load(&args.id).await?;
        let yaml = if args.persistence {
            codec::to_yaml(&view.document, CodecMode::Persistence)?
        } else {
            self.store.yaml_code()?
        };
        self.renderer.raw(&yaml);
        Ok(())
    }

    async fn apply_plan(&mut self, args: &ApplyArgs) -> Result<()> {
        let (source, text) = read_source(&args.file)?;
        self.load(&args.id).await?;
        self.store
            .apply_yaml_code(&text)
            .map_err(|e| located(&source, e))?;
        self.push_and_report(format!("Applied {source} to plan {}", args.id))
            .await
    }

    async fn delete_plan(&mut self, id: &str) -> Result<()> {
        if !self.store.delete_plan(id).await? {
            return Err(ScalingPlanError::PlanNotFound { id: id.to_string() }.into());
        }
        self.renderer
            .render(&OperationStatus::success(format!("Deleted plan {id}")).to_string());
        Ok(())
    }

    async fn load(&mut self, id: &str) -> Result<PlanView> {
        self.store
            .load(id)
            .await
            .with_context(|| format!("Failed to load plan {id}"))
    }

    async fn push_and_report(&mut self, message: String) -> Result<()> {
        let view = self.store.push().await.context("Failed to save plan")?;
        self.renderer.render(&format!(
            "{}\n{view}",
            OperationStatus::success(message)
        ));
        Ok(())
    }
}

/// Reads a YAML file, or standard input for `-`.
fn read_source(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let text = io::read_to_string(io::stdin()).context("Failed to read standard input")?;
        return Ok(("<stdin>".to_string(), text));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((path.display().to_string(), text))
}

/// Formats parse failures as `source:line:column: message`.
fn located(source: &str, error: ScalingPlanError) -> anyhow::Error {
    match error.annotation() {
        Some(annotation) => anyhow!(
            "{source}:{}:{}: {}",
            annotation.line,
            annotation.column,
            annotation.message
        ),
        None => error.into(),
    }
}
