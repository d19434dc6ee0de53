// Domain layer - Plain data types, no I/O
pub mod account;
pub mod air_quality;
pub mod dashboard;
pub mod trend;
pub mod widgets;
