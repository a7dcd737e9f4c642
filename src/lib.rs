use pretty_env_logger;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn _setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

pub use batch::estimate_batch;
pub use errors::{MldError, MldOptionsError, ProfileError, ProfileReadError};
pub use metrics::{Candidate, CandidateTable, Metric};
pub use mld::{find_mld, find_mld_from_arrays, find_mld_with_eos, MldResult};
pub use options::{MldOptions, MldOptionsBuilder};
pub use profile::{EquationOfState, LinearEos, Profile, ProfileBuilder, Variable};
pub mod batch;
pub mod errors;
pub mod io;
pub mod metrics;
pub mod mld;
pub mod options;
pub mod profile;
pub mod selector;
