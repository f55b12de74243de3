/// Application name
pub const APP_NAME: &str = "SkillSwap";

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default bearer credential lifetime in seconds (1 hour)
pub const DEFAULT_CREDENTIAL_TTL_SECS: i64 = 3600;

/// Default directory page size when the client omits `limit`
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Upper bound for a directory page
pub const MAX_PAGE_SIZE: usize = 100;

/// Maximum length of a skill name in a swap request
pub const MAX_SKILL_LEN: usize = 100;

/// Maximum length of a swap request message
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Response time advertised for freshly registered users
pub const DEFAULT_RESPONSE_TIME: &str = "within a day";

/// Key derivation context (BLAKE3) for turning a passphrase into a
/// credential signing seed
pub const KDF_CONTEXT_CREDENTIAL_KEY: &str = "skillswap-credential-key-v1";
