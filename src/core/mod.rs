pub mod accumulator;
pub mod batch;
pub mod engine;
pub mod registry;
pub mod surcharge;
pub mod validator;

pub use crate::domain::model::{BillLineItem, BillResult, CustomerClass, RateSchedule};
pub use crate::domain::ports::ScheduleProvider;
pub use crate::utils::error::Result;
