//! ResourceFetcher trait - raw bytes from a URL
//!
//! Used for data-source documents, template images and font files. Mock
//! implementations keep tests off the network.

use bytes::Bytes;

use crate::ContractError;

#[trait_variant::make(ResourceFetcher: Send)]
pub trait LocalResourceFetcher {
    /// GET the resource at `url`
    ///
    /// # Errors
    /// `ContractError::Fetch` when the resource is unreachable or the status
    /// is not a success
    async fn fetch(&self, url: &str) -> Result<Bytes, ContractError>;
}
