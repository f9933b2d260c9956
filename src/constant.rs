// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 960.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 640.0;
pub const DEFAULT_WINDOW_TITLE: &str = "Doc Shell";

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "DocShell";
pub const APP_NAME: &str = "Doc Shell";

/// Server defaults
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How long a notice stays on the files screen
pub const NOTICE_DURATION_SECS: u64 = 5;

/// Poll interval while background requests are outstanding
pub const PENDING_REPAINT_MILLIS: u64 = 100;
