mod config;
pub use config::{DescriptionMerge, SessionConfig};

mod patch;
pub use patch::{compute_patch, Cause, Draft, Patch};

mod session;
pub use session::{CardEditSession, KeyResponse, SUBMIT_KEY};

mod store;
pub use store::{CardCloser, CardStore};

pub mod api {
    pub use cardboard_api::*;
}
