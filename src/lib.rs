pub mod api;
pub mod config;
pub mod consts;
pub mod contacts;
pub mod convert;
pub mod core_types;
pub mod error;
pub mod optimizer;
pub mod potential;
pub mod scorer;
pub mod search;
pub mod structure;

pub use api::{reconstruct, ReconstructRequest, Reconstruction};
pub use config::Config;
pub use core_types::CancelToken;
pub use error::{FoldError, FoldResult};
