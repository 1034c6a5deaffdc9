mod appointment;
mod availability;
mod role;

#[allow(unused)]
pub use appointment::*;
#[allow(unused)]
pub use availability::*;
#[allow(unused)]
pub use role::*;
