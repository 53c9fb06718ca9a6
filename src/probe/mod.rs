pub mod driver;

pub use driver::{
    Infusable, ProbeDispatcher, ProbeDriver, ProbeInfo, ProbeLine, ProbeMode, ProbeTarget,
    StandardDriver, TextStyle,
};
