mod generate_travel_plan;
mod plan_session;
pub(crate) mod travel_prompt;

pub use generate_travel_plan::*;
pub use plan_session::*;
pub use travel_prompt::build_prompt;
