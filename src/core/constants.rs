//! Fixed strings and defaults shared across the crate.
//!
//! Result messages are part of the user-visible contract and must not change
//! wording.

/// Messages returned in place of an explanation
pub mod messages {
    pub const NO_METHOD_FOUND: &str = "No method found";
    pub const GENERATION_FAILED: &str = "An error occurred during explanation generation";
}

/// Prompt wording used when the configuration does not override it
pub mod prompt {
    pub const INSTRUCTION_PREFIX: &str = "Explain the method ";
    pub const REFERENCES_HEADER: &str = "We have the following external references:";
    pub const INSTRUCTION_SUFFIX: &str =
        " in plain English. Ignore built-in Python methods from the external references.";
}

/// Chat-completions defaults
pub mod inference {
    pub const BASE_URL: &str = "https://api.openai.com/v1";
    pub const MODEL: &str = "gpt-3.5-turbo";
    pub const MAX_TOKENS: u32 = 150;
    pub const TEMPERATURE: f32 = 0.5;
    pub const SYSTEM_PROMPT: &str = "I explain Python Methods in Plain English.";
    pub const TIMEOUT_SECONDS: u64 = 30;
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
}

/// File and directory names
pub mod paths {
    pub const APP_DIR: &str = "explain-bridge";
    pub const CONFIG_FILE: &str = "config.toml";
    /// JSON key file holding `{"api_key": "..."}`
    pub const KEY_FILE: &str = "config.json";
    pub const CONFIG_DIR_ENV: &str = "EXPLAIN_BRIDGE_CONFIG_DIR";
}

pub mod limits {
    pub const MAX_FILE_SIZE_KB: u64 = 1024;
}
