use anyhow::Result;
use clap::{Args, Subcommand};
use pocketledger_lib::export::ExportDefaults;
use pocketledger_lib::types::{CreateBudget, UpdateBudget};
use pocketledger_lib::validation;
use pocketledger_lib::{BudgetQuery, BudgetSortBy, SortDirection};

use super::export::{self, ExportArgs};
use super::{parse_sort_field, print_page, require_id, Context, ListArgs};
use crate::output::{build_budget_rows, emit};

const SORT_FIELDS: &str = "month, amount, spent";

#[derive(Subcommand)]
pub enum BudgetsCommand {
    /// List monthly budgets
    List(ListBudgetsArgs),
    /// Set a budget for a category and month
    Create(CreateBudgetArgs),
    /// Change a budget
    Update(UpdateBudgetArgs),
    /// Delete a budget
    Remove {
        /// Budget ID
        id: String,
    },
    /// Export budgets to XLSX or a printable document
    Export(ExportBudgetsArgs),
}

#[derive(Args)]
pub struct BudgetFilters {
    /// Only this month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,

    /// Only these category IDs (comma-separated)
    #[arg(long)]
    pub category: Option<String>,
}

impl BudgetFilters {
    fn apply(&self, mut query: BudgetQuery) -> Result<BudgetQuery> {
        if let Some(ref month) = self.month {
            query = query.with_month(&validation::validate_month(month)?);
        }
        if let Some(ref categories) = self.category {
            for id in categories.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                query = query.with_category_id(id);
            }
        }
        Ok(query)
    }
}

#[derive(Args)]
pub struct ListBudgetsArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[command(flatten)]
    pub filters: BudgetFilters,
}

#[derive(Args)]
pub struct CreateBudgetArgs {
    /// Category ID
    #[arg(long)]
    pub category: String,

    /// Month (YYYY-MM)
    #[arg(long)]
    pub month: String,

    /// Budgeted amount, e.g. 400.00
    #[arg(long)]
    pub amount: String,
}

#[derive(Args)]
pub struct UpdateBudgetArgs {
    /// Budget ID
    pub id: String,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub month: Option<String>,

    #[arg(long)]
    pub amount: Option<String>,
}

#[derive(Args)]
pub struct ExportBudgetsArgs {
    #[command(flatten)]
    pub export: ExportArgs,

    #[command(flatten)]
    pub filters: BudgetFilters,
}

pub async fn run(cmd: &BudgetsCommand, ctx: &Context) -> Result<()> {
    match cmd {
        BudgetsCommand::List(args) => list(args, ctx).await,
        BudgetsCommand::Create(args) => create(args, ctx).await,
        BudgetsCommand::Update(args) => update(args, ctx).await,
        BudgetsCommand::Remove { id } => {
            ctx.resolve(ctx.client.remove_budget(id).await)?;
            eprintln!("Removed budget {}", id);
            Ok(())
        }
        BudgetsCommand::Export(args) => export_budgets(args, ctx).await,
    }
}

async fn list(args: &ListBudgetsArgs, ctx: &Context) -> Result<()> {
    let query = args.list.build_query(BudgetQuery::default(), SORT_FIELDS)?;
    let query = args.filters.apply(query)?;

    let page = ctx.resolve(ctx.client.list_budgets(&query).await)?;
    print_page(&args.list, ctx, "budgets", page, build_budget_rows)
}

async fn create(args: &CreateBudgetArgs, ctx: &Context) -> Result<()> {
    let payload = CreateBudget {
        category_id: require_id(&args.category, "category")?,
        month: validation::validate_month(&args.month)?,
        amount: validation::validate_positive_amount(&args.amount)?,
    };
    let budget = ctx.resolve(ctx.client.create_budget(&payload).await)?;
    let items = std::slice::from_ref(&budget);
    emit(&ctx.format, items, build_budget_rows(items, ctx.locale))
}

async fn update(args: &UpdateBudgetArgs, ctx: &Context) -> Result<()> {
    let payload = UpdateBudget {
        category_id: args
            .category
            .as_deref()
            .map(|id| require_id(id, "category"))
            .transpose()?,
        month: args.month.as_deref().map(validation::validate_month).transpose()?,
        amount: args
            .amount
            .as_deref()
            .map(validation::validate_positive_amount)
            .transpose()?,
    };
    let budget = ctx.resolve(ctx.client.update_budget(&args.id, &payload).await)?;
    let items = std::slice::from_ref(&budget);
    emit(&ctx.format, items, build_budget_rows(items, ctx.locale))
}

async fn export_budgets(args: &ExportBudgetsArgs, ctx: &Context) -> Result<()> {
    let base = args.filters.apply(BudgetQuery::default())?;
    let sort_field = args
        .export
        .sort_by
        .as_deref()
        .map(|field| parse_sort_field::<BudgetSortBy>(field, SORT_FIELDS))
        .transpose()?;
    let defaults = ExportDefaults {
        rows_quantity: 20,
        sort_field: Some(BudgetSortBy::Month),
        sort_direction: SortDirection::Desc,
    };
    let client = &ctx.client;
    export::run(&args.export, ctx, "budgets", "Budgets", defaults, sort_field, |req| {
        let query = req.apply(base.clone());
        async move { client.list_budgets(&query).await }
    })
    .await
}
