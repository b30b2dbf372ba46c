pub mod cost;
pub mod drafts;
pub mod epoch;
pub mod error;
pub mod format;
pub mod models;
pub mod payload;
pub mod signature;
pub mod tiers;
pub mod web3;

pub use error::DeeployError;
