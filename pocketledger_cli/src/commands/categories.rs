use anyhow::Result;
use clap::{Args, Subcommand};
use pocketledger_lib::export::ExportDefaults;
use pocketledger_lib::types::{CreateCategory, UpdateCategory};
use pocketledger_lib::validation;
use pocketledger_lib::{CategoryQuery, CategorySortBy, SortDirection};

use super::export::{self, ExportArgs};
use super::{parse_sort_field, print_page, Context, ListArgs};
use crate::output::{build_category_rows, emit};

const SORT_FIELDS: &str = "name, kind";

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    List(ListCategoriesArgs),
    /// Add a category
    Create(CreateCategoryArgs),
    /// Change a category
    Update(UpdateCategoryArgs),
    /// Delete a category
    Remove {
        /// Category ID
        id: String,
    },
    /// Export categories to XLSX or a printable document
    Export(ExportCategoriesArgs),
}

#[derive(Args)]
pub struct ListCategoriesArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Filter by kind: income (i) or expense (e)
    #[arg(long)]
    pub kind: Option<String>,
}

#[derive(Args)]
pub struct CreateCategoryArgs {
    #[arg(long)]
    pub name: String,

    /// income or expense
    #[arg(long, default_value = "expense")]
    pub kind: String,

    /// Hex color, e.g. #22aa55
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct UpdateCategoryArgs {
    /// Category ID
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub kind: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ExportCategoriesArgs {
    #[command(flatten)]
    pub export: ExportArgs,

    /// Filter by kind before exporting
    #[arg(long)]
    pub kind: Option<String>,
}

pub async fn run(cmd: &CategoriesCommand, ctx: &Context) -> Result<()> {
    match cmd {
        CategoriesCommand::List(args) => list(args, ctx).await,
        CategoriesCommand::Create(args) => create(args, ctx).await,
        CategoriesCommand::Update(args) => update(args, ctx).await,
        CategoriesCommand::Remove { id } => {
            ctx.resolve(ctx.client.remove_category(id).await)?;
            eprintln!("Removed category {}", id);
            Ok(())
        }
        CategoriesCommand::Export(args) => export_categories(args, ctx).await,
    }
}

fn with_kind(query: CategoryQuery, kind: Option<&str>) -> Result<CategoryQuery> {
    Ok(match kind {
        Some(kind) => query.with_kind(validation::validate_category_kind(kind)?),
        None => query,
    })
}

async fn list(args: &ListCategoriesArgs, ctx: &Context) -> Result<()> {
    let query = args.list.build_query(CategoryQuery::default(), SORT_FIELDS)?;
    let query = with_kind(query, args.kind.as_deref())?;

    let page = ctx.resolve(ctx.client.list_categories(&query).await)?;
    print_page(&args.list, ctx, "categories", page, build_category_rows)
}

async fn create(args: &CreateCategoryArgs, ctx: &Context) -> Result<()> {
    let payload = CreateCategory {
        name: validation::validate_name(&args.name)?,
        kind: validation::validate_category_kind(&args.kind)?,
        color: args.color.as_deref().map(validation::validate_color).transpose()?,
        description: args
            .description
            .as_deref()
            .map(validation::validate_description)
            .transpose()?,
    };
    let category = ctx.resolve(ctx.client.create_category(&payload).await)?;
    let items = std::slice::from_ref(&category);
    emit(&ctx.format, items, build_category_rows(items, ctx.locale))
}

async fn update(args: &UpdateCategoryArgs, ctx: &Context) -> Result<()> {
    let payload = UpdateCategory {
        name: args.name.as_deref().map(validation::validate_name).transpose()?,
        kind: args
            .kind
            .as_deref()
            .map(validation::validate_category_kind)
            .transpose()?,
        color: args.color.as_deref().map(validation::validate_color).transpose()?,
        description: args
            .description
            .as_deref()
            .map(validation::validate_description)
            .transpose()?,
    };
    let category = ctx.resolve(ctx.client.update_category(&args.id, &payload).await)?;
    let items = std::slice::from_ref(&category);
    emit(&ctx.format, items, build_category_rows(items, ctx.locale))
}

async fn export_categories(args: &ExportCategoriesArgs, ctx: &Context) -> Result<()> {
    let base = with_kind(CategoryQuery::default(), args.kind.as_deref())?;
    let sort_field = args
        .export
        .sort_by
        .as_deref()
        .map(|field| parse_sort_field::<CategorySortBy>(field, SORT_FIELDS))
        .transpose()?;
    let defaults = ExportDefaults {
        rows_quantity: 20,
        sort_field: Some(CategorySortBy::Name),
        sort_direction: SortDirection::Desc,
    };
    let client = &ctx.client;
    export::run(&args.export, ctx, "categories", "Categories", defaults, sort_field, |req| {
        let query = req.apply(base.clone());
        async move { client.list_categories(&query).await }
    })
    .await
}
