use anyhow::Result;
use clap::{Args, Subcommand};
use pocketledger_lib::export::ExportDefaults;
use pocketledger_lib::types::{CreateAccount, UpdateAccount};
use pocketledger_lib::validation;
use pocketledger_lib::{AccountQuery, AccountSortBy, SortDirection};

use super::export::{self, ExportArgs};
use super::{parse_sort_field, print_page, Context, ListArgs};
use crate::output::{build_account_rows, emit};

const SORT_FIELDS: &str = "name, balance, created";

#[derive(Subcommand)]
pub enum AccountsCommand {
    /// List accounts
    List(ListAccountsArgs),
    /// Open a new account
    Create(CreateAccountArgs),
    /// Change an account's details
    Update(UpdateAccountArgs),
    /// Delete an account
    Remove {
        /// Account ID
        id: String,
    },
    /// Export accounts to XLSX or a printable document
    Export(ExportAccountsArgs),
}

#[derive(Args)]
pub struct ListAccountsArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Filter by type: checking, savings, cash, credit_card, investment (comma-separated)
    #[arg(long = "type")]
    pub account_type: Option<String>,

    /// Filter by currency code
    #[arg(long)]
    pub currency: Option<String>,
}

#[derive(Args)]
pub struct CreateAccountArgs {
    #[arg(long)]
    pub name: String,

    /// checking, savings, cash, credit_card or investment
    #[arg(long = "type", default_value = "checking")]
    pub account_type: String,

    /// Opening balance, e.g. 1,250.00
    #[arg(long, default_value = "0")]
    pub balance: String,

    #[arg(long, default_value = "USD")]
    pub currency: String,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct UpdateAccountArgs {
    /// Account ID
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type")]
    pub account_type: Option<String>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ExportAccountsArgs {
    #[command(flatten)]
    pub export: ExportArgs,

    /// Filter by type before exporting
    #[arg(long = "type")]
    pub account_type: Option<String>,
}

pub async fn run(cmd: &AccountsCommand, ctx: &Context) -> Result<()> {
    match cmd {
        AccountsCommand::List(args) => list(args, ctx).await,
        AccountsCommand::Create(args) => create(args, ctx).await,
        AccountsCommand::Update(args) => update(args, ctx).await,
        AccountsCommand::Remove { id } => {
            ctx.resolve(ctx.client.remove_account(id).await)?;
            eprintln!("Removed account {}", id);
            Ok(())
        }
        AccountsCommand::Export(args) => export_accounts(args, ctx).await,
    }
}

fn with_types(mut query: AccountQuery, types: Option<&str>) -> Result<AccountQuery> {
    if let Some(types) = types {
        for value in types.split(',') {
            query = query.with_account_type(validation::validate_account_type(value)?);
        }
    }
    Ok(query)
}

async fn list(args: &ListAccountsArgs, ctx: &Context) -> Result<()> {
    let mut query = args.list.build_query(AccountQuery::default(), SORT_FIELDS)?;
    query = with_types(query, args.account_type.as_deref())?;
    if let Some(ref currency) = args.currency {
        query = query.with_currency(&validation::validate_currency(currency)?);
    }

    let page = ctx.resolve(ctx.client.list_accounts(&query).await)?;
    print_page(&args.list, ctx, "accounts", page, build_account_rows)
}

async fn create(args: &CreateAccountArgs, ctx: &Context) -> Result<()> {
    let payload = CreateAccount {
        name: validation::validate_name(&args.name)?,
        account_type: validation::validate_account_type(&args.account_type)?,
        balance: validation::parse_amount_to_cents(&args.balance)?,
        currency: validation::validate_currency(&args.currency)?,
        description: args
            .description
            .as_deref()
            .map(validation::validate_description)
            .transpose()?,
    };
    let account = ctx.resolve(ctx.client.create_account(&payload).await)?;
    emit(
        &ctx.format,
        std::slice::from_ref(&account),
        build_account_rows(std::slice::from_ref(&account), ctx.locale),
    )
}

async fn update(args: &UpdateAccountArgs, ctx: &Context) -> Result<()> {
    let payload = UpdateAccount {
        name: args.name.as_deref().map(validation::validate_name).transpose()?,
        account_type: args
            .account_type
            .as_deref()
            .map(validation::validate_account_type)
            .transpose()?,
        currency: args
            .currency
            .as_deref()
            .map(validation::validate_currency)
            .transpose()?,
        description: args
            .description
            .as_deref()
            .map(validation::validate_description)
            .transpose()?,
    };
    let account = ctx.resolve(ctx.client.update_account(&args.id, &payload).await)?;
    emit(
        &ctx.format,
        std::slice::from_ref(&account),
        build_account_rows(std::slice::from_ref(&account), ctx.locale),
    )
}

async fn export_accounts(args: &ExportAccountsArgs, ctx: &Context) -> Result<()> {
    let base = with_types(AccountQuery::default(), args.account_type.as_deref())?;
    let sort_field = args
        .export
        .sort_by
        .as_deref()
        .map(|field| parse_sort_field::<AccountSortBy>(field, SORT_FIELDS))
        .transpose()?;
    let defaults = ExportDefaults {
        rows_quantity: 20,
        sort_field: Some(AccountSortBy::CreatedAt),
        sort_direction: SortDirection::Desc,
    };
    let client = &ctx.client;
    export::run(&args.export, ctx, "accounts", "Accounts", defaults, sort_field, |req| {
        let query = req.apply(base.clone());
        async move { client.list_accounts(&query).await }
    })
    .await
}
