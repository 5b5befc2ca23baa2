use crate::domain::model::{CustomerClass, RateSchedule};

/// Source of the one active schedule per customer class.
///
/// Implementations must be total over [`CustomerClass`]: the engine has no
/// failure path once consumption has been validated.
pub trait ScheduleProvider: Send + Sync {
    fn schedule(&self, customer_class: CustomerClass) -> &RateSchedule;
}

impl<P: ScheduleProvider + ?Sized> ScheduleProvider for &P {
    fn schedule(&self, customer_class: CustomerClass) -> &RateSchedule {
        (**self).schedule(customer_class)
    }
}
