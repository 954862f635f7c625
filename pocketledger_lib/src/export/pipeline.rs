//! Page collection for exports.
//!
//! Pages are requested strictly one after another: page N+1 is only asked for
//! once page N has arrived, so at most one request is in flight and rows keep
//! the order the API returned them in.

use std::future::Future;

use futures_util::stream::{self, Stream, StreamExt};
use pocketledger_api::types::Paginated;
use pocketledger_api::{Query, SortDirection};
use tokio_util::sync::CancellationToken;

use super::config::{ExportConfig, FULL_DATA_PAGE_SIZE};
use super::error::ExportError;
use crate::action::ActionResult;

/// Arguments for one page fetch. Resource filters stay captured in the fetch
/// closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<K> {
    pub page: u32,
    pub limit: u32,
    pub sort_field: Option<K>,
    pub sort_direction: SortDirection,
}

impl<K: Copy> PageRequest<K> {
    /// Applies page, limit and ordering to a resource query, keeping its
    /// filters.
    pub fn apply<Q: Query<SortBy = K>>(&self, query: Q) -> Q {
        let query = query
            .with_page(i64::from(self.page))
            .with_limit(i64::from(self.limit))
            .with_sort_direction(self.sort_direction);
        match self.sort_field {
            Some(field) => query.with_sort_by(field),
            None => query,
        }
    }
}

struct StreamState<F, K> {
    fetch: F,
    next: Option<PageRequest<K>>,
    single_page: bool,
    cancel: CancellationToken,
}

/// Streams pages starting at `first`.
///
/// With `single_page` the stream ends after the first page. Otherwise it ends
/// once the page index reaches `meta.total_pages`. A failed fetch yields one
/// `PageFailed` item and ends the stream. A cancelled token yields `Cancelled`,
/// dropping any request still in flight.
pub fn page_stream<T, K, F, Fut>(
    fetch: F,
    first: PageRequest<K>,
    single_page: bool,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Paginated<T>, ExportError>>
where
    K: Copy,
    F: FnMut(PageRequest<K>) -> Fut,
    Fut: Future<Output = ActionResult<Paginated<T>>>,
{
    let state = StreamState {
        fetch,
        next: Some(first),
        single_page,
        cancel,
    };
    stream::unfold(state, |mut state| async move {
        let request = state.next.take()?;
        if state.cancel.is_cancelled() {
            return Some((Err(ExportError::Cancelled), state));
        }

        let fut = (state.fetch)(request);
        let result = tokio::select! {
            biased;
            _ = state.cancel.cancelled() => None,
            result = fut => Some(result),
        };

        match result {
            None => Some((Err(ExportError::Cancelled), state)),
            Some(ActionResult::Success { data }) => {
                tracing::debug!(
                    "Export page {}/{} ({} rows)",
                    request.page,
                    data.meta.total_pages,
                    data.data.len()
                );
                if !state.single_page && !data.meta.is_last_page(i64::from(request.page)) {
                    state.next = Some(PageRequest {
                        page: request.page + 1,
                        ..request
                    });
                }
                Some((Ok(data), state))
            }
            Some(ActionResult::Error { errors }) => Some((
                Err(ExportError::PageFailed {
                    page: request.page,
                    fetched_rows: 0,
                    errors,
                }),
                state,
            )),
        }
    })
}

/// Builds the export dataset for `config`.
///
/// Without `full_data` this is one fetch of `rows_quantity` rows at page 1.
/// With it, every page is fetched at [`FULL_DATA_PAGE_SIZE`] rows and rows are
/// accumulated in arrival order. Any failed page aborts the export.
pub async fn collect_dataset<T, K, F, Fut>(
    config: &ExportConfig<K>,
    fetch: F,
    cancel: CancellationToken,
) -> Result<Vec<T>, ExportError>
where
    K: Copy,
    F: FnMut(PageRequest<K>) -> Fut,
    Fut: Future<Output = ActionResult<Paginated<T>>>,
{
    let first = PageRequest {
        page: 1,
        limit: if config.full_data {
            FULL_DATA_PAGE_SIZE
        } else {
            config.rows_quantity()
        },
        sort_field: config.sort_field,
        sort_direction: config.sort_direction,
    };
    let pages = page_stream(fetch, first, !config.full_data, cancel);
    futures_util::pin_mut!(pages);

    let mut rows = Vec::new();
    while let Some(page) = pages.next().await {
        match page {
            Ok(page) => rows.extend(page.data),
            Err(ExportError::PageFailed { page, errors, .. }) => {
                tracing::warn!(
                    "Export aborted at page {} with {} rows collected",
                    page,
                    rows.len()
                );
                return Err(ExportError::PageFailed {
                    page,
                    fetched_rows: rows.len(),
                    errors,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pocketledger_api::types::Meta;

    use super::*;
    use crate::action::ErrorEntry;
    use crate::export::config::ExportDefaults;

    /// In-memory resource of `total` numbered rows.
    fn paged(total: usize, request: &PageRequest<()>) -> Paginated<usize> {
        let limit = request.limit as usize;
        let start = (request.page as usize - 1) * limit;
        let data: Vec<usize> = (start..total.min(start + limit)).collect();
        Paginated {
            data,
            meta: Meta {
                total_pages: Meta::expected_total_pages(total as i64, limit as i64),
                page: i64::from(request.page),
                limit: limit as i64,
                total: total as i64,
            },
        }
    }

    fn config(full_data: bool, rows: u32) -> ExportConfig<()> {
        let mut config = ExportConfig::from_defaults(&ExportDefaults {
            rows_quantity: rows,
            sort_field: None,
            sort_direction: SortDirection::Desc,
        });
        config.full_data = full_data;
        config
    }

    #[tokio::test]
    async fn full_data_fetches_every_page_in_order() {
        for total in [0usize, 1, 100, 101, 250, 1000] {
            let requests = Rc::new(RefCell::new(Vec::new()));
            let log = requests.clone();
            let rows = collect_dataset(
                &config(true, 10),
                |req| {
                    log.borrow_mut().push(req);
                    let page = paged(total, &req);
                    async move { ActionResult::success(page) }
                },
                CancellationToken::new(),
            )
            .await
            .unwrap();

            let expected_pages = Meta::expected_total_pages(total as i64, 100).max(1) as usize;
            let requests = requests.borrow();
            assert_eq!(requests.len(), expected_pages, "total {}", total);
            for (i, req) in requests.iter().enumerate() {
                assert_eq!(req.page as usize, i + 1);
                assert_eq!(req.limit, FULL_DATA_PAGE_SIZE);
            }
            assert_eq!(rows, (0..total).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn current_page_export_fetches_once_with_rows_quantity() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let log = requests.clone();
        let rows = collect_dataset(
            &config(false, 25),
            |req| {
                log.borrow_mut().push(req);
                let page = paged(500, &req);
                async move { ActionResult::success(page) }
            },
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let requests = requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, 1);
        assert_eq!(requests[0].limit, 25);
        assert_eq!(rows.len(), 25);
    }

    #[tokio::test]
    async fn sort_settings_reach_every_request() {
        let mut cfg = ExportConfig::from_defaults(&ExportDefaults {
            rows_quantity: 10,
            sort_field: Some("amount"),
            sort_direction: SortDirection::Asc,
        });
        cfg.full_data = true;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        collect_dataset(
            &cfg,
            |req: PageRequest<&str>| {
                log.borrow_mut().push((req.sort_field, req.sort_direction));
                let page = paged(
                    150,
                    &PageRequest {
                        page: req.page,
                        limit: req.limit,
                        sort_field: None,
                        sort_direction: req.sort_direction,
                    },
                );
                async move { ActionResult::success(page) }
            },
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (Some("amount"), SortDirection::Asc),
                (Some("amount"), SortDirection::Asc)
            ]
        );
    }

    #[tokio::test]
    async fn failed_page_aborts_with_partial_count() {
        let result = collect_dataset(
            &config(true, 10),
            |req| {
                let page = paged(350, &req);
                async move {
                    if req.page == 3 {
                        ActionResult::error(vec![ErrorEntry::new("Server error", "boom")])
                    } else {
                        ActionResult::success(page)
                    }
                }
            },
            CancellationToken::new(),
        )
        .await;

        match result {
            Err(ExportError::PageFailed {
                page,
                fetched_rows,
                errors,
            }) => {
                assert_eq!(page, 3);
                assert_eq!(fetched_rows, 200);
                assert_eq!(errors[0].title, "Server error");
            }
            other => panic!("expected PageFailed, got {:?}", other.map(|r| r.len())),
        }
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_fetching() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let result = collect_dataset(&config(true, 10), |req| {
            *counter.borrow_mut() += 1;
            let page = paged(10, &req);
            async move { ActionResult::success(page) }
        }, cancel)
        .await;
        assert!(matches!(result, Err(ExportError::Cancelled)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[tokio::test]
    async fn cancelling_mid_export_stops_the_loop() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let calls = Rc::new(RefCell::new(0u32));
        let counter = calls.clone();
        let result = collect_dataset(&config(true, 10), |req| {
            *counter.borrow_mut() += 1;
            if req.page == 2 {
                trigger.cancel();
            }
            let page = paged(1000, &req);
            async move { ActionResult::success(page) }
        }, cancel)
        .await;
        assert!(matches!(result, Err(ExportError::Cancelled)));
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn apply_keeps_filters_and_sets_paging() {
        use pocketledger_api::{TransferQuery, TransferSortBy};

        let base = TransferQuery::default()
            .with_account_id("acc-1")
            .with_search("rent");
        let request = PageRequest {
            page: 3,
            limit: 100,
            sort_field: Some(TransferSortBy::Amount),
            sort_direction: SortDirection::Asc,
        };
        let query = request.apply(base);
        assert_eq!(query.common.page, 3);
        assert_eq!(query.common.limit, Some(100));
        assert_eq!(query.common.order, SortDirection::Asc);
        assert_eq!(query.common.search.as_deref(), Some("rent"));
        assert_eq!(query.account_id.as_deref(), Some("acc-1"));
        assert_eq!(query.sort_by, Some(TransferSortBy::Amount));
    }

    #[tokio::test]
    async fn stream_yields_one_item_per_page() {
        let pages = page_stream(
            |req: PageRequest<()>| {
                let page = paged(230, &req);
                async move { ActionResult::success(page) }
            },
            PageRequest {
                page: 1,
                limit: 100,
                sort_field: None,
                sort_direction: SortDirection::Desc,
            },
            false,
            CancellationToken::new(),
        );
        let sizes: Vec<usize> = pages.map(|p| p.unwrap().data.len()).collect().await;
        assert_eq!(sizes, vec![100, 100, 30]);
    }
}
