//! PSN API collaborator for trophy-atlas.
//!
//! Handles NPSSO credential resolution, the OAuth token exchange, and the
//! paginated fetch of the two feeds the reconciliation core consumes: the
//! game-list play-duration feed and the trophy-title feed. Network concerns
//! (auth, pagination, rate limiting) live here and nowhere else.

pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::PsnClient;
pub use credentials::{
    CredentialSource, Credentials, config_path, credential_source, save_to_file,
};
pub use error::PsnError;
pub use types::{TitleStats, TrophyTitle};
