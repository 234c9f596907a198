mod currency;
mod generation_outcome;
mod travel_request;

pub use currency::*;
pub use generation_outcome::*;
pub use travel_request::*;
