mod generate;
mod info;
mod pipeline;
mod profiles;

pub use generate::cmd_generate;
pub use info::cmd_info;
pub use pipeline::{PipelineStep, cmd_pipeline};
