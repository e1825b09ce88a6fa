// src/config/constants.rs
//! System-wide constants for stimulation parameters, safety limits and the
//! native module binding. Every range check in the crate reads from here.

/// Stimulation parameter domains and defaults
pub mod stimulus {
    /// Demand is expressed in 0.1 mA steps (24 = 2.4 mA)
    pub const DEMAND_UNIT_MILLIAMPS: f32 = 0.1;
    pub const MIN_DEMAND: i32 = 1;
    pub const MAX_DEMAND: i32 = 150;
    pub const DEFAULT_DEMAND: i32 = 20;

    // Below this the hardware may not reproduce the requested current
    pub const LOW_DEMAND_ADVISORY_MAX: i32 = 19;

    pub const MIN_PULSE_WIDTH_US: i32 = 50;
    pub const MAX_PULSE_WIDTH_US: i32 = 2000;
    pub const PULSE_WIDTH_STEP_US: i32 = 10;
    pub const DEFAULT_PULSE_WIDTH_US: i32 = 100;

    pub const MIN_DWELL_US: i32 = 1;
    pub const MAX_DWELL_US: i32 = 990;
    pub const DEFAULT_DWELL_US: i32 = 1;

    pub const MIN_RECOVERY_PERCENT: i32 = 10;
    pub const MAX_RECOVERY_PERCENT: i32 = 100;
    pub const DEFAULT_RECOVERY_PERCENT: i32 = 100;

    pub const DEFAULT_ENABLED: bool = true;
}

/// Safety interlock constants
pub mod safety {
    /// Highest demand `run` accepts without `force` (100 = 10.0 mA)
    pub const SAFE_DEMAND_LIMIT_RAW: i32 = 100;
    pub const MIN_CONFIGURABLE_LIMIT_RAW: i32 = super::stimulus::MIN_DEMAND;
    pub const MAX_CONFIGURABLE_LIMIT_RAW: i32 = super::stimulus::MAX_DEMAND;
}

/// Integer codes the native module uses for the enumerated fields
pub mod codes {
    pub const MODE_MONOPHASIC: i32 = 1;
    pub const MODE_BIPHASIC: i32 = 2;

    pub const POLARITY_POSITIVE: i32 = 1;
    pub const POLARITY_NEGATIVE: i32 = 2;
    pub const POLARITY_ALTERNATING: i32 = 3;

    pub const SOURCE_INTERNAL: i32 = 1;
    pub const SOURCE_EXTERNAL: i32 = 2;

    pub const DISABLED: i32 = 0;
    pub const ENABLED: i32 = 1;
}

/// Native module location and entry points
pub mod native {
    pub const DEFAULT_MODULE_FILE_NAME: &str = "D128RProxy.dll";
    pub const MODULE_PATH_ENV_VAR: &str = "DS8R_MODULE_PATH";

    pub const SET_SYMBOL: &str = "DGD128_Set";
    pub const GET_SYMBOL: &str = "DGD128_Get";
    pub const TRIGGER_SYMBOL: &str = "DGD128_Trigger";

    /// Number of `i32` fields exchanged by set/get
    pub const PARAMETER_FIELD_COUNT: usize = 8;
}
