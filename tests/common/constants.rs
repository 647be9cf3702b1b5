//! Shared constants for end-to-end tests

// ============================================================================
// Test User
// ============================================================================

pub const TEST_NAME: &str = "Test User";

pub const TEST_EMAIL: &str = "testuser@example.com";

pub const TEST_PASS: &str = "testpass123";

pub const TEST_AGE: u32 = 30;

// ============================================================================
// Test Catalog
// ============================================================================

/// Song recommended for calm moods
pub const CALM_SONG_ID: &str = "song-calm";
pub const CALM_SONG_TITLE: &str = "Weightless";

/// Song recommended for fearful moods
pub const FEAR_SONG_ID: &str = "song-fear";
pub const FEAR_SONG_TITLE: &str = "Breathe Me";

/// Song recommended for angry moods
pub const ANGRY_SONG_ID: &str = "song-angry";
pub const ANGRY_SONG_TITLE: &str = "Killing in the Name";

// ============================================================================
// Texts with a deterministic mood
// ============================================================================

pub const CALM_TEXT: &str = "Sitting by the lake, feeling so relaxed";

pub const FEAR_TEXT: &str = "I am so scared of tomorrow";

pub const ANGRY_TEXT: &str = "I am furious with my landlord";

/// Surprise has no song in the test catalog.
pub const SURPRISE_TEXT: &str = "What an unexpected day";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
