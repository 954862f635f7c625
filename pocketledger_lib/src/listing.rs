//! Client-side operations over an already-fetched page of items, and the
//! footer actions shown beneath a listing.

use pocketledger_api::types::Meta;
use pocketledger_api::SortDirection;

use crate::export::report::compare_sort_values;
use crate::export::Reportable;
use crate::format::Locale;

/// Keeps items where any formatted cell contains `needle`, ignoring case.
/// An empty needle keeps everything.
pub fn filter_items<T: Reportable + Clone>(items: &[T], needle: &str, locale: Locale) -> Vec<T> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.to_row(locale)
                .values()
                .any(|cell| cell.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Stable sort by the raw value behind `column_id`.
pub fn sort_items<T: Reportable>(items: &mut [T], column_id: &str, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ord = compare_sort_values(&a.sort_value(column_id), &b.sort_value(column_id));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// A footer action. The variant is fixed when the action is built, so
/// rendering never has to inspect which optional fields are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Link { label: String, href: String },
    Button { label: String, command: String },
}

impl Action {
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Action::Link {
            label: label.into(),
            href: href.into(),
        }
    }

    pub fn button(label: impl Into<String>, command: impl Into<String>) -> Self {
        Action::Button {
            label: label.into(),
            command: command.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::Link { label, .. } | Action::Button { label, .. } => label,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Action::Link { label, href } => format!("{}: {}", label, href),
            Action::Button { label, command } => format!("{}: run `{}`", label, command),
        }
    }
}

/// Footer actions for a listing of `resource` at the page described by
/// `meta`: previous/next page hints, the export command, and a link to the
/// raw page on the API at `api_url`.
pub fn pagination_actions(resource: &str, meta: &Meta, api_url: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    if meta.page > 1 {
        actions.push(Action::button(
            "Previous page",
            format!("pocketledger {} list --page {}", resource, meta.page - 1),
        ));
    }
    if !meta.is_last_page(meta.page) {
        actions.push(Action::button(
            "Next page",
            format!("pocketledger {} list --page {}", resource, meta.page + 1),
        ));
    }
    if meta.total > 0 {
        actions.push(Action::button(
            "Export",
            format!("pocketledger {} export --format xlsx", resource),
        ));
        actions.push(Action::link(
            "API",
            format!(
                "{}/{}?page={}&limit={}",
                api_url.trim_end_matches('/'),
                resource,
                meta.page,
                meta.limit
            ),
        ));
    }
    actions
}
