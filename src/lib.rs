pub mod arrivals;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod output;
pub mod parser;
pub mod routes;
pub mod timestamp;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}

pub use arrivals::ArrivalIndex;
pub use config::Config;
pub use error::{Error, Result};
pub use fetch::FeedSelector;
pub use model::Feed;
pub use timestamp::Timestamp;
