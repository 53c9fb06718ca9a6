/// Block inspection dispatch
///
/// Tiles opt into inspection through `ProbeTarget`. A target can supply its
/// own driver; otherwise the standard driver reports what it knows from the
/// target's optional capabilities.

use tracing::trace;

use crate::config::InventoryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    Normal,
    Extended,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Plain,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeLine {
    pub style: TextStyle,
    pub text: String,
}

/// Sink for inspection output
pub trait ProbeInfo {
    fn text(&mut self, style: TextStyle, text: String);
}

impl ProbeInfo for Vec<ProbeLine> {
    fn text(&mut self, style: TextStyle, text: String) {
        self.push(ProbeLine { style, text });
    }
}

/// Something that can describe a probed tile
pub trait ProbeDriver {
    fn add_probe_info(&self, mode: ProbeMode, info: &mut dyn ProbeInfo, target: &dyn ProbeTarget);
}

/// Tiles that can be infused report their current level
pub trait Infusable {
    fn infused(&self) -> u32;
}

/// A probed tile and the capabilities it exposes
pub trait ProbeTarget {
    /// Driver that replaces the standard one for this tile
    fn info_provider(&self) -> Option<&dyn ProbeDriver> {
        None
    }

    fn infusable(&self) -> Option<&dyn Infusable> {
        None
    }
}

/// Reports the capabilities every tile may share
#[derive(Debug, Clone)]
pub struct StandardDriver {
    max_infuse: u32,
}

impl StandardDriver {
    pub fn new(max_infuse: u32) -> Self {
        Self { max_infuse }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.max_infuse)
    }

    /// Infusion as a whole percentage of the configured maximum
    pub fn infused_percent(&self, infused: u32) -> u32 {
        if self.max_infuse == 0 {
            return 0;
        }
        (u64::from(infused) * 100 / u64::from(self.max_infuse)) as u32
    }
}

impl ProbeDriver for StandardDriver {
    fn add_probe_info(&self, _mode: ProbeMode, info: &mut dyn ProbeInfo, target: &dyn ProbeTarget) {
        if let Some(infusable) = target.infusable() {
            let pct = self.infused_percent(infusable.infused());
            info.text(TextStyle::Info, format!("Infused: {}%", pct));
        }
    }
}

/// Routes inspection requests to the right driver
pub struct ProbeDispatcher {
    standard: StandardDriver,
}

impl ProbeDispatcher {
    pub fn new(standard: StandardDriver) -> Self {
        Self { standard }
    }

    pub fn add_probe_info(&self, mode: ProbeMode, info: &mut dyn ProbeInfo, target: &dyn ProbeTarget) {
        match target.info_provider() {
            Some(driver) => {
                trace!("Probe handled by tile-supplied driver");
                driver.add_probe_info(mode, info, target);
            }
            None => self.standard.add_probe_info(mode, info, target),
        }
    }
}

impl Default for ProbeDispatcher {
    fn default() -> Self {
        Self::new(StandardDriver::from_config(&InventoryConfig::default()))
    }
}
