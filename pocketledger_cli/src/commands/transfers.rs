use anyhow::Result;
use clap::{Args, Subcommand};
use pocketledger_lib::export::ExportDefaults;
use pocketledger_lib::types::{CreateTransfer, UpdateTransfer};
use pocketledger_lib::validation;
use pocketledger_lib::{SortDirection, TransferQuery, TransferSortBy};

use super::export::{self, ExportArgs};
use super::{parse_sort_field, print_page, Context, ListArgs};
use crate::output::{build_transfer_rows, emit};

const SORT_FIELDS: &str = "date, amount";

#[derive(Subcommand)]
pub enum TransfersCommand {
    /// List transfers
    List(ListTransfersArgs),
    /// Move money between two accounts
    Create(CreateTransferArgs),
    /// Change a transfer's amount, date or description
    Update(UpdateTransferArgs),
    /// Delete a transfer
    Remove {
        /// Transfer ID
        id: String,
    },
    /// Export transfers to XLSX or a printable document
    Export(ExportTransfersArgs),
}

#[derive(Args)]
pub struct ListTransfersArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Only transfers touching this account ID
    #[arg(long)]
    pub account: Option<String>,
}

#[derive(Args)]
pub struct CreateTransferArgs {
    /// Source account ID
    #[arg(long)]
    pub from: String,

    /// Destination account ID
    #[arg(long)]
    pub to: String,

    /// Amount, e.g. 250.00
    #[arg(long)]
    pub amount: String,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct UpdateTransferArgs {
    /// Transfer ID
    pub id: String,

    #[arg(long)]
    pub amount: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ExportTransfersArgs {
    #[command(flatten)]
    pub export: ExportArgs,

    /// Only transfers touching this account ID
    #[arg(long)]
    pub account: Option<String>,

    /// Only transfers on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Only transfers on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,
}

pub async fn run(cmd: &TransfersCommand, ctx: &Context) -> Result<()> {
    match cmd {
        TransfersCommand::List(args) => list(args, ctx).await,
        TransfersCommand::Create(args) => create(args, ctx).await,
        TransfersCommand::Update(args) => update(args, ctx).await,
        TransfersCommand::Remove { id } => {
            ctx.resolve(ctx.client.remove_transfer(id).await)?;
            eprintln!("Removed transfer {}", id);
            Ok(())
        }
        TransfersCommand::Export(args) => export_transfers(args, ctx).await,
    }
}

async fn list(args: &ListTransfersArgs, ctx: &Context) -> Result<()> {
    let mut query = args.list.build_query(TransferQuery::default(), SORT_FIELDS)?;
    if let Some(ref account) = args.account {
        query = query.with_account_id(account.trim());
    }

    let page = ctx.resolve(ctx.client.list_transfers(&query).await)?;
    print_page(&args.list, ctx, "transfers", page, build_transfer_rows)
}

async fn create(args: &CreateTransferArgs, ctx: &Context) -> Result<()> {
    validation::validate_transfer_accounts(&args.from, &args.to)?;
    let date = match args.date {
        Some(ref date) => validation::validate_date(date)?,
        None => chrono::Local::now().date_naive(),
    };
    let payload = CreateTransfer {
        source_account_id: args.from.trim().to_string(),
        destination_account_id: args.to.trim().to_string(),
        amount: validation::validate_positive_amount(&args.amount)?,
        date,
        description: args
            .description
            .as_deref()
            .map(validation::validate_description)
            .transpose()?,
    };
    let transfer = ctx.resolve(ctx.client.create_transfer(&payload).await)?;
    let items = std::slice::from_ref(&transfer);
    emit(&ctx.format, items, build_transfer_rows(items, ctx.locale))
}

async fn update(args: &UpdateTransferArgs, ctx: &Context) -> Result<()> {
    let payload = UpdateTransfer {
        amount: args
            .amount
            .as_deref()
            .map(validation::validate_positive_amount)
            .transpose()?,
        date: args.date.as_deref().map(validation::validate_date).transpose()?,
        description: args
            .description
            .as_deref()
            .map(validation::validate_description)
            .transpose()?,
    };
    let transfer = ctx.resolve(ctx.client.update_transfer(&args.id, &payload).await)?;
    let items = std::slice::from_ref(&transfer);
    emit(&ctx.format, items, build_transfer_rows(items, ctx.locale))
}

async fn export_transfers(args: &ExportTransfersArgs, ctx: &Context) -> Result<()> {
    let mut base = TransferQuery::default();
    if let Some(ref account) = args.account {
        base = base.with_account_id(account.trim());
    }
    let since = args.since.as_deref().map(validation::validate_date).transpose()?;
    let until = args.until.as_deref().map(validation::validate_date).transpose()?;
    let (since, until) = validation::validate_date_range(since, until)?;
    base.common.start_date = since;
    base.common.end_date = until;

    let sort_field = args
        .export
        .sort_by
        .as_deref()
        .map(|field| parse_sort_field::<TransferSortBy>(field, SORT_FIELDS))
        .transpose()?;
    let defaults = ExportDefaults {
        rows_quantity: 20,
        sort_field: Some(TransferSortBy::Date),
        sort_direction: SortDirection::Desc,
    };
    let client = &ctx.client;
    export::run(&args.export, ctx, "transfers", "Transfers", defaults, sort_field, |req| {
        let query = req.apply(base.clone());
        async move { client.list_transfers(&query).await }
    })
    .await
}
