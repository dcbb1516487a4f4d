pub mod energy;
pub mod health;

#[allow(unused_imports)]
pub use energy::*;
#[allow(unused_imports)]
pub use health::*;
