//! Paginated fetch: a fetch handle plus a page cursor

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use opsdeck_domain::constants::DEFAULT_PAGE_LIMIT;
use opsdeck_domain::{Pagination, RoomsListResponse, ServersListResponse, UsersListResponse};
use parking_lot::Mutex;

use super::handle::{FetchHandle, FetchOptions, Fetcher};

/// Page coordinates passed to the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: DEFAULT_PAGE_LIMIT }
    }
}

/// List payloads that carry pagination metadata
pub trait Paged {
    fn pagination(&self) -> &Pagination;
}

impl Paged for UsersListResponse {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }
}

impl Paged for ServersListResponse {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }
}

impl Paged for RoomsListResponse {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }
}

/// Boxed page fetch operation
pub type PageFetcher<T, E> =
    Arc<dyn Fn(PageRequest) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Fetch handle that tracks the current page and limit
pub struct PaginatedFetch<T, E> {
    cursor: Arc<Mutex<PageRequest>>,
    /// Pagination of the last successful page; survives failed refreshes.
    known: Arc<Mutex<Option<Pagination>>>,
    fetch: FetchHandle<T, E>,
}

impl<T, E> Clone for PaginatedFetch<T, E> {
    fn clone(&self) -> Self {
        Self { cursor: self.cursor.clone(), known: self.known.clone(), fetch: self.fetch.clone() }
    }
}

impl<T, E> PaginatedFetch<T, E>
where
    T: Paged + Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial: PageRequest, fetcher: F, options: FetchOptions<T, E>) -> Self
    where
        F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let page_fetcher: PageFetcher<T, E> = Arc::new(move |req| fetcher(req).boxed());
        let cursor = Arc::new(Mutex::new(PageRequest { page: initial.page.max(1), ..initial }));

        let known = Arc::new(Mutex::new(None));

        let fetch_cursor = cursor.clone();
        let fetch_known = known.clone();
        let fetcher: Fetcher<T, E> = Arc::new(move || {
            let request = *fetch_cursor.lock();
            let page = page_fetcher(request);
            let known = fetch_known.clone();
            async move {
                let result = page.await;
                if let Ok(data) = &result {
                    *known.lock() = Some(*data.pagination());
                }
                result
            }
            .boxed()
        });

        Self { cursor, known, fetch: FetchHandle::from_fetcher(fetcher, options) }
    }

    pub fn page(&self) -> u32 {
        self.cursor.lock().page
    }

    pub fn limit(&self) -> u32 {
        self.cursor.lock().limit
    }

    pub fn handle(&self) -> &FetchHandle<T, E> {
        &self.fetch
    }

    /// Pagination of the last successful page, if any.
    pub fn pagination(&self) -> Option<Pagination> {
        *self.known.lock()
    }

    pub fn has_next(&self) -> bool {
        self.pagination().map_or(true, |p| p.has_next())
    }

    pub fn has_previous(&self) -> bool {
        self.page() > 1
    }

    /// Re-issue the fetch for the current page.
    pub async fn execute(&self) -> Result<T, E> {
        self.fetch.execute().await
    }

    /// Advance one page, never past the last known page.
    pub async fn next_page(&self) -> Result<T, E> {
        let last = self.pagination().map(|p| p.total_pages.max(1));
        {
            let mut cursor = self.cursor.lock();
            let next = cursor.page.saturating_add(1);
            cursor.page = last.map_or(next, |last| next.min(last));
        }
        self.fetch.execute().await
    }

    /// Go back one page, never below page 1.
    pub async fn previous_page(&self) -> Result<T, E> {
        {
            let mut cursor = self.cursor.lock();
            cursor.page = cursor.page.saturating_sub(1).max(1);
        }
        self.fetch.execute().await
    }

    pub async fn first_page(&self) -> Result<T, E> {
        self.go_to_page(1).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<T, E> {
        self.cursor.lock().page = page.max(1);
        self.fetch.execute().await
    }

    /// Change the page size and restart from page 1.
    pub async fn set_limit(&self, limit: u32) -> Result<T, E> {
        {
            let mut cursor = self.cursor.lock();
            cursor.limit = limit.max(1);
            cursor.page = 1;
        }
        self.fetch.execute().await
    }

    pub fn reset(&self) {
        self.fetch.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Page {
        request: PageRequest,
        pagination: Pagination,
    }

    impl Paged for Page {
        fn pagination(&self) -> &Pagination {
            &self.pagination
        }
    }

    fn three_pages() -> PaginatedFetch<Page, String> {
        PaginatedFetch::new(
            PageRequest { page: 1, limit: 10 },
            |request: PageRequest| async move {
                Ok(Page {
                    request,
                    pagination: Pagination {
                        page: request.page,
                        limit: request.limit,
                        total: 25,
                        total_pages: 3,
                    },
                })
            },
            FetchOptions::default(),
        )
    }

    #[tokio::test]
    async fn next_and_previous_move_the_cursor() {
        let pages = three_pages();
        assert_eq!(pages.execute().await.unwrap().request.page, 1);
        assert_eq!(pages.next_page().await.unwrap().request.page, 2);
        assert_eq!(pages.next_page().await.unwrap().request.page, 3);
        assert_eq!(pages.previous_page().await.unwrap().request.page, 2);
        assert_eq!(pages.first_page().await.unwrap().request.page, 1);
    }

    #[tokio::test]
    async fn cursor_is_clamped_at_both_ends() {
        let pages = three_pages();
        pages.previous_page().await.unwrap();
        assert_eq!(pages.page(), 1);

        pages.go_to_page(3).await.unwrap();
        assert!(!pages.has_next());
        pages.next_page().await.unwrap();
        assert_eq!(pages.page(), 3);
    }

    #[tokio::test]
    async fn set_limit_restarts_from_first_page() {
        let pages = three_pages();
        pages.go_to_page(2).await.unwrap();
        let page = pages.set_limit(50).await.unwrap();
        assert_eq!(page.request, PageRequest { page: 1, limit: 50 });
        assert_eq!(pages.limit(), 50);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_page_bound() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let failing = Arc::new(AtomicBool::new(false));
        let flag = failing.clone();
        let pages: PaginatedFetch<Page, String> = PaginatedFetch::new(
            PageRequest { page: 1, limit: 10 },
            move |request: PageRequest| {
                let fail = flag.load(Ordering::SeqCst);
                async move {
                    if fail {
                        return Err("backend down".to_string());
                    }
                    Ok(Page {
                        request,
                        pagination: Pagination {
                            page: request.page,
                            limit: request.limit,
                            total: 25,
                            total_pages: 3,
                        },
                    })
                }
            },
            FetchOptions::default(),
        );

        pages.go_to_page(3).await.unwrap();
        failing.store(true, Ordering::SeqCst);
        assert!(pages.execute().await.is_err());
        assert!(pages.handle().data().is_none());

        assert!(pages.next_page().await.is_err());
        assert_eq!(pages.page(), 3);
        assert!(!pages.has_next());
    }

    #[test]
    fn page_zero_is_normalised() {
        let pages: PaginatedFetch<Page, String> = PaginatedFetch::new(
            PageRequest { page: 0, limit: 5 },
            |_req: PageRequest| async { Err("unused".to_string()) },
            FetchOptions::default(),
        );
        assert_eq!(pages.page(), 1);
        assert!(!pages.has_previous());
    }
}
