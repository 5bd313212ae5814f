use crate::bsp::Variant;

/// How the directory variant is chosen when reading a container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BspOptions {
    pub auto_detect_variant: bool,
    /// Required when `auto_detect_variant` is false, ignored otherwise
    pub forced_variant: Option<Variant>,
}

impl BspOptions {
    /// Read strictly as `variant`, failing if the layout does not fit
    pub fn forced(variant: Variant) -> Self {
        Self {
            auto_detect_variant: false,
            forced_variant: Some(variant),
        }
    }
}

impl Default for BspOptions {
    fn default() -> Self {
        Self {
            auto_detect_variant: true,
            forced_variant: None,
        }
    }
}
