mod api;
mod config;
mod detail;
mod error;
mod error_view;
mod fetcher;
pub mod http;
mod models;
mod retry;
mod route;
mod view_model;

pub use api::{HttpUserApi, UserApi};
pub use config::{
    ConfigError, DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, DirectoryConfig, RawConfig,
};
pub use detail::{AddressSection, CompanySection, ContactSection, UserDetail};
pub use error::{DirectoryError, DirectoryResult, ErrorKind};
pub use error_view::{ErrorAction, ErrorView};
pub use fetcher::{FetchResult, UserFetcher, user_key, users_key};
pub use models::{Address, Company, UserId, UserRecord};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use route::Route;
pub use view_model::{
    CompanyFilter, DirectoryState, DirectoryView, FilterState, PageState, compute_view,
    distinct_companies, total_pages,
};

pub use directory_states::{CachePolicy, QueryKey, QueryStatus};
