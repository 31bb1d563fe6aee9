//! Alert/notification sink port trait.

pub trait AlertPort {
    fn notify(&self, symbol: &str, message: &str);
}
