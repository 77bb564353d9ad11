pub mod context;
pub mod fetcher;
pub mod request;
pub mod retry;
pub mod transform;

pub use crate::domain::model::{BuybackContractsRep, BuybackContractsReq, Contract, HashCode};
pub use crate::domain::ports::{ConfigProvider, ConnectionProvider, ItemConfigurator};
pub use crate::utils::error::Result;
