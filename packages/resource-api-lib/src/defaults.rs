pub const LOG_LEVEL: &str = "info";
pub const VERBOSE_LOGGING: bool = false;

pub const PAGINATION_ENABLED: bool = true;
pub const PAGINATION_STYLE: &str = "cursor";
pub const ITEMS_PER_PAGE: u64 = 30;
