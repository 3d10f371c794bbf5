//! Sky Souls Common Library
//!
//! CLIとWeb(WASM)で共有される型・一覧エンジン・表示状態の復元

pub mod display;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod forms;
pub mod listing;
pub mod palette;
pub mod scroll;
pub mod types;
pub mod view_state;

pub use endpoint::{ListRequest, Method, RequestTarget, ResponseShape, DEFAULT_PAGE_SIZE};
pub use envelope::{decode_data, http_error, FetchedPage, GENERIC_ERROR_MESSAGE};
pub use error::{Error, Result};
pub use filter::{FilterState, ListPage, ViewMode};
pub use listing::{ApplyOutcome, ListItem, LoadMode, LoadedRange, PageRequest, PagedItem, PagedList};
pub use scroll::{ObserverChange, ScrollTrigger, ROOT_MARGIN};
pub use types::{ImageRecord, ImageType, Season, Soul, TravelingVisit, VisitRecord};
pub use view_state::{
    FilterChange, MemoryStore, MountAction, NavigationType, PageCache, Phase, Restoration,
    RestoreSnapshot, ViewStateController, ViewStateStore,
};
