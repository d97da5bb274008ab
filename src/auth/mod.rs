// Authentication module
// Token storage, reissue transport and the outbound auth pipeline

mod interceptor;
mod refresh;
mod store;

pub use interceptor::AuthInterceptor;
pub use refresh::{RefreshTransport, ReissueError, REISSUE_PATH};
pub use store::{MemoryTokenStore, SqliteTokenStore, TokenStore};
