pub mod config;
pub mod explorer;
pub mod function;
pub mod icons;
pub mod navigation;
pub mod panel;
pub mod source;
pub mod tags;
pub mod topbar;

pub use config::{Config, ConfigError, DataConfig, ServerConfig};
pub use explorer::Explorer;
pub use function::Function;
pub use navigation::{DefPath, ItemPath, NaviItem, Navigation, NavigationError, SubNaviItem};
pub use panel::{Panel, PANELS};
pub use source::{DataSource, FileSource, RemoteSource, SourceError};
pub use tags::{Property, TagSpec, TagType, Tags};
pub use topbar::{DefPathKind, Kind, ViewType, ALL_VIEW_TYPES};
