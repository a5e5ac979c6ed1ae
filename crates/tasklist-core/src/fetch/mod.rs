//! Fetch - タイムアウト付き JSON GET と、それを使ったヘルスチェック
//!
//! TaskListClient とは状態を共有しません。

pub mod bounded;
pub mod health;

pub use self::bounded::{BoundedJsonFetcher, FetchBody, FetchError, FetchResult};
pub use self::health::{HealthCheck, HealthReport, greet, item_count, todos_endpoint};
