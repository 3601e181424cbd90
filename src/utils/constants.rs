//! Constants Module - Single Source of Truth
//!
//! Protocol constants, defaults and file names shared across the crate.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "PX Wallet Validator";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for ledger requests
pub const USER_AGENT: &str = concat!("px-validator/", env!("CARGO_PKG_VERSION"));

// ============================================
// LEDGER RPC CONSTANTS
// ============================================

/// Public read-only JSON-RPC endpoints (mainnet), in priority order
pub const DEFAULT_LEDGER_ENDPOINTS: [&str; 2] = [
    "https://s1.ripple.com:51234/",
    "https://xrplcluster.com/",
];

/// Per-endpoint timeout (seconds)
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 6;

/// Drops per XRP
pub const DROPS_PER_XRP: f64 = 1_000_000.0;

/// Decimal places kept when converting drops to XRP
pub const XRP_DECIMALS: i32 = 6;

/// Ledger error codes that mean "answered, but no such funded account"
pub const UNFUNDED_ERROR_CODES: [&str; 3] = ["actNotFound", "actMalformed", "invalidParams"];

// ============================================
// ACCOUNT FLAGS (AccountRoot lsf*)
// ============================================

pub const LSF_GLOBAL_FREEZE: u32 = 0x0040_0000;
pub const LSF_DISALLOW_XRP: u32 = 0x0008_0000;
pub const LSF_REQUIRE_DEST_TAG: u32 = 0x0001_0000;
pub const LSF_DEFAULT_RIPPLE: u32 = 0x0002_0000;

// ============================================
// ADDRESS SANITIZATION
// ============================================

/// Classic addresses start with this character
pub const ADDRESS_PREFIX: char = 'r';

pub const ADDRESS_MIN_LEN: usize = 25;
pub const ADDRESS_MAX_LEN: usize = 35;

// ============================================
// METRICS STORE
// ============================================

pub const METRICS_FILE_NAME: &str = "metrics.json";
pub const UPTIME_FILE_NAME: &str = "uptime.txt";

/// Entries kept in the recent-history window
pub const RECENT_WINDOW_CAP: usize = 100;

/// Entries exposed by the summary
pub const SUMMARY_RECENT_COUNT: usize = 5;

/// Current on-disk metrics format version
pub const METRICS_FORMAT_VERSION: u32 = 2;

// ============================================
// RISK MODEL
// ============================================

/// Tag identifying the heuristic (non-ML) ruleset
pub const RISK_MODEL_TAG: &str = "heuristic-stub";
