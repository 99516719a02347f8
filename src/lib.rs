//! Typed client for the Global Tagging API: attach, detach, list and delete
//! tags on cloud resources within a billing account.

pub mod auth;
pub mod config;
pub mod error;
pub mod misc;
pub mod options;
mod request;
pub mod response;
pub mod service;

pub use auth::Authenticator;
pub use config::Config;
pub use error::{ApiError, Error};
pub use misc::hyper::Transport;
pub use options::{
    DeleteTagAllOptions, DeleteTagOptions, ListTagsOptions, OrderByName, Provider, TagRequest,
};
pub use response::DetailedResponse;
pub use schemas;
pub use service::GlobalTaggingV1;
