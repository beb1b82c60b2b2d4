use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The input set was empty, so no single winner exists.
    #[error("Not enough data to rank {0}")]
    NoData(&'static str),
}
