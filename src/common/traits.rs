//! Trait definitions for the collaborators the watch core depends on

use async_trait::async_trait;

use super::errors::Result;
use super::types::{FetchedDocument, OwnerId};

/// Retrieves raw page content for a watch
///
/// Implementations must follow redirects and report the host the
/// document was finally served from, and must bound every call by a
/// timeout. A timeout or transport failure is returned as an error; the
/// caller treats it as "price unknown" for the current cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the document at `url`
    async fn fetch(&self, url: &str) -> Result<FetchedDocument>;
}

/// Delivers a message to the owner of a watch
///
/// Delivery errors are logged by the caller and never affect watch
/// removal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `message` to `owner`
    async fn notify(&self, owner: &OwnerId, message: &str) -> Result<()>;
}
